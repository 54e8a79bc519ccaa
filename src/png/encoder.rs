//! Still-image driver and the encoder core shared with the APNG driver.

use super::chunk::{write_chunk, ImageSink};
use super::deflate::{deflate_bound, DeflatePipe, IOBUF_SIZE};
use super::filter::choose_filter;
use super::headers::{write_headers, HeaderParams};
use super::interlace::{extract_row, pass_row_size, row_in_pass, PASSES};
use crate::color::{ColorPrimaries, TransferCharacteristic};
use crate::error::PngError;
use crate::frame::{Frame, PixelSource};
use crate::limits::Limits;
use crate::options::{FilterType, PngOptions, Stereo3d};
use crate::pixel::PixelLayout;

/// Fixed allowance for the signature and every pre-image chunk when sizing a
/// packet buffer.
pub(crate) const PACKET_HEADROOM: usize = 16384;

/// Derived per-instance encoding state shared by the PNG and APNG drivers.
pub(crate) struct EncoderCore {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub bit_depth: u8,
    pub color_type: u8,
    pub bits_per_pixel: usize,
    pub filter: FilterType,
    pub interlaced: bool,
    pub dpm: u32,
    pub sample_aspect_ratio: (u32, u32),
    pub primaries: ColorPrimaries,
    pub transfer: TransferCharacteristic,
    pub stereo: Option<Stereo3d>,
    pub limits: Limits,
    pipe: DeflatePipe,
}

impl EncoderCore {
    pub fn open(
        width: u32,
        height: u32,
        layout: PixelLayout,
        options: &PngOptions,
    ) -> Result<Self, PngError> {
        if width == 0 || height == 0 {
            return Err(PngError::InvalidOption(format!(
                "zero image dimensions: {width}x{height}"
            )));
        }
        options.limits.check_dimensions(width, height)?;
        let dpm = options.resolved_dpm()?;
        // 1-bit rows cannot reference whole previous pixels, so prediction
        // is pinned off for them.
        let filter = if layout == PixelLayout::Mono1 {
            FilterType::None
        } else {
            options.filter
        };
        Ok(EncoderCore {
            width,
            height,
            layout,
            bit_depth: layout.bit_depth(),
            color_type: layout.color_type(),
            bits_per_pixel: layout.bits_per_pixel(),
            filter,
            interlaced: options.interlaced,
            dpm,
            sample_aspect_ratio: options.sample_aspect_ratio.unwrap_or((0, 1)),
            primaries: options.primaries,
            transfer: options.transfer,
            stereo: options.stereo,
            limits: options.limits.clone(),
            pipe: DeflatePipe::new(options.resolved_compression()),
        })
    }

    /// Worst-case packet size: headroom for the headers plus, per row, the
    /// deflate bound and the chunk framing it can split into.
    /// `chunk_overhead` is 12 for IDAT framing, 16 for fdAT.
    pub fn max_packet_size(&self, chunk_overhead: usize) -> Result<usize, PngError> {
        let too_large = PngError::DimensionsTooLarge {
            width: self.width,
            height: self.height,
        };
        let bound = deflate_bound(self.layout.row_bytes(self.width));
        let chunks = (bound + IOBUF_SIZE - 1) / IOBUF_SIZE;
        let size = bound
            .checked_add(chunk_overhead * chunks)
            .and_then(|per_row| (self.height as usize).checked_mul(per_row))
            .and_then(|rows| rows.checked_add(PACKET_HEADROOM))
            .ok_or(too_large)?;
        if size > i32::MAX as usize {
            return Err(PngError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        self.limits.check_packet(size)?;
        Ok(size)
    }

    /// Emit the signature-less header chunk sequence.
    pub fn write_headers(
        &self,
        out: &mut Vec<u8>,
        capacity: usize,
        palette: Option<&[u32; 256]>,
    ) -> Result<(), PngError> {
        write_headers(
            out,
            capacity,
            &HeaderParams {
                width: self.width,
                height: self.height,
                bit_depth: self.bit_depth,
                color_type: self.color_type,
                interlaced: self.interlaced,
                dpm: self.dpm,
                sample_aspect_ratio: self.sample_aspect_ratio,
                primaries: self.primaries,
                transfer: self.transfer,
                stereo: self.stereo,
                palette: if self.layout == PixelLayout::Pal8 {
                    palette
                } else {
                    None
                },
            },
        )
    }

    /// Filter and compress every row of `src` into the sink. The deflate
    /// stream is finished and reset afterwards, error paths included.
    pub fn encode_image(
        &mut self,
        src: &PixelSource<'_>,
        sink: &mut ImageSink<'_>,
    ) -> Result<(), PngError> {
        let result = self.encode_image_rows(src, sink);
        self.pipe.reset();
        result
    }

    fn encode_image_rows(
        &mut self,
        src: &PixelSource<'_>,
        sink: &mut ImageSink<'_>,
    ) -> Result<(), PngError> {
        let row_size = self.layout.row_bytes(src.width);
        let bpp = self.bits_per_pixel >> 3;
        let width = src.width as usize;
        let height = src.height as usize;
        // Two slots so the adaptive selector can keep its current best while
        // trying the next filter.
        let mut filter_bufs = [vec![0u8; row_size + 1], vec![0u8; row_size + 1]];

        if self.interlaced {
            let mut cur = vec![0u8; row_size];
            let mut prev = vec![0u8; row_size];
            for pass in 0..PASSES {
                // A pass is omitted entirely when it selects no pixels.
                let pass_size = pass_row_size(pass, self.bits_per_pixel, width);
                if pass_size == 0 {
                    continue;
                }
                let mut have_top = false;
                for y in 0..height {
                    if !row_in_pass(pass, y) {
                        continue;
                    }
                    std::mem::swap(&mut cur, &mut prev);
                    let row = &src.data[y * src.stride..][..row_size];
                    extract_row(&mut cur[..pass_size], self.bits_per_pixel, pass, row, width);
                    let top = have_top.then(|| &prev[..pass_size]);
                    let crow = choose_filter(self.filter, &mut filter_bufs, &cur[..pass_size], top, bpp);
                    self.pipe.write_row(crow, sink)?;
                    have_top = true;
                }
            }
        } else {
            let mut top: Option<&[u8]> = None;
            for y in 0..height {
                let row = &src.data[y * src.stride..][..row_size];
                let crow = choose_filter(self.filter, &mut filter_bufs, row, top, bpp);
                self.pipe.write_row(crow, sink)?;
                top = Some(row);
            }
        }
        self.pipe.finish(sink)
    }
}

/// Still-image PNG encoder. One [`encode`](Self::encode) call produces one
/// self-contained PNG byte packet.
pub struct PngEncoder {
    core: EncoderCore,
}

impl PngEncoder {
    /// Open an encoder for `width` x `height` frames of `layout` pixels.
    pub fn new(
        width: u32,
        height: u32,
        layout: PixelLayout,
        options: PngOptions,
    ) -> Result<Self, PngError> {
        Ok(PngEncoder {
            core: EncoderCore::open(width, height, layout, &options)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.core.width
    }

    pub fn height(&self) -> u32 {
        self.core.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.core.layout
    }

    /// Encode one frame as a complete PNG file.
    pub fn encode(&mut self, frame: &Frame<'_>) -> Result<Vec<u8>, PngError> {
        frame.validate(self.core.width, self.core.height, self.core.layout)?;
        let capacity = self.core.max_packet_size(12)?;
        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(&crate::PNG_SIGNATURE);
        self.core.write_headers(&mut out, capacity, frame.palette())?;
        let src = PixelSource {
            data: frame.data(),
            stride: frame.stride(),
            width: self.core.width,
            height: self.core.height,
        };
        {
            let mut sink = ImageSink::idat(&mut out, capacity);
            self.core.encode_image(&src, &mut sink)?;
        }
        write_chunk(&mut out, capacity, b"IEND", &[])?;
        Ok(out)
    }
}
