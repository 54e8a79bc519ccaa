//! Streaming deflate pipe: filtered rows in, IDAT/fdAT-sized buffers out.

use flate2::{Compress, Compression, FlushCompress, Status};

use super::chunk::ImageSink;
use crate::error::PngError;

/// Fixed size of the deflate output buffer; a full buffer becomes one
/// image-data chunk.
pub(crate) const IOBUF_SIZE: usize = 4096;

/// Worst-case deflate output for `len` input bytes, including the zlib
/// wrapper (the classic compressBound formula).
pub(crate) fn deflate_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

/// A zlib-wrapped deflate stream feeding a fixed output buffer that drains
/// into image-data chunks whenever it fills.
///
/// The stream is reset, not recreated, between frames, so its internal
/// allocations are recycled.
pub(crate) struct DeflatePipe {
    z: Compress,
    buf: Vec<u8>,
    used: usize,
}

impl DeflatePipe {
    /// `level` 0..=9, or `None` for the library default.
    pub fn new(level: Option<u32>) -> Self {
        let level = level.map(Compression::new).unwrap_or_default();
        DeflatePipe {
            z: Compress::new(level, true),
            buf: vec![0; IOBUF_SIZE],
            used: 0,
        }
    }

    /// Compress one filtered row (filter byte plus payload), draining full
    /// buffers into the sink.
    pub fn write_row(&mut self, row: &[u8], sink: &mut ImageSink<'_>) -> Result<(), PngError> {
        let mut pos = 0;
        while pos < row.len() {
            if self.used == IOBUF_SIZE {
                sink.put(&self.buf)?;
                self.used = 0;
            }
            let in_before = self.z.total_in();
            let out_before = self.z.total_out();
            self.z
                .compress(&row[pos..], &mut self.buf[self.used..], FlushCompress::None)
                .map_err(|e| PngError::Deflate(e.to_string()))?;
            let consumed = (self.z.total_in() - in_before) as usize;
            let produced = (self.z.total_out() - out_before) as usize;
            pos += consumed;
            self.used += produced;
            if consumed == 0 && produced == 0 && self.used < IOBUF_SIZE {
                return Err(PngError::Deflate("deflate made no progress".into()));
            }
        }
        Ok(())
    }

    /// Finish the stream, flushing residual output as final chunks.
    pub fn finish(&mut self, sink: &mut ImageSink<'_>) -> Result<(), PngError> {
        loop {
            // The last row can leave the buffer exactly full.
            if self.used == IOBUF_SIZE {
                sink.put(&self.buf)?;
                self.used = 0;
            }
            let out_before = self.z.total_out();
            let status = self
                .z
                .compress(&[], &mut self.buf[self.used..], FlushCompress::Finish)
                .map_err(|e| PngError::Deflate(e.to_string()))?;
            let produced = (self.z.total_out() - out_before) as usize;
            self.used += produced;
            if self.used > 0 {
                sink.put(&self.buf[..self.used])?;
                self.used = 0;
            }
            match status {
                Status::StreamEnd => return Ok(()),
                Status::Ok => {}
                Status::BufError => {
                    if produced == 0 {
                        return Err(PngError::Deflate(
                            "deflate stalled before end of stream".into(),
                        ));
                    }
                }
            }
        }
    }

    /// Recycle the stream for the next frame.
    pub fn reset(&mut self) {
        self.z.reset();
        self.used = 0;
    }
}
