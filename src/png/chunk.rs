//! Length/type/payload/CRC chunk framing.

use crate::error::PngError;

/// Append one `{length, type, payload, CRC32}` record, refusing to grow the
/// packet past `capacity`. The CRC covers type and payload.
pub(crate) fn write_chunk(
    out: &mut Vec<u8>,
    capacity: usize,
    tag: &[u8; 4],
    payload: &[u8],
) -> Result<(), PngError> {
    if out.len() + payload.len() + 12 > capacity {
        return Err(PngError::PacketOverflow { capacity });
    }
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    let mut crc = crc32fast::Hasher::new();
    crc.update(tag);
    crc.update(payload);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
    Ok(())
}

/// Append an fdAT chunk: like IDAT, but the payload is prefixed with the
/// frame sequence number, which participates in the CRC.
pub(crate) fn write_fdat(
    out: &mut Vec<u8>,
    capacity: usize,
    sequence: u32,
    payload: &[u8],
) -> Result<(), PngError> {
    if out.len() + payload.len() + 4 + 12 > capacity {
        return Err(PngError::PacketOverflow { capacity });
    }
    out.extend_from_slice(&((payload.len() + 4) as u32).to_be_bytes());
    let mut crc = crc32fast::Hasher::new();
    out.extend_from_slice(b"fdAT");
    crc.update(b"fdAT");
    out.extend_from_slice(&sequence.to_be_bytes());
    crc.update(&sequence.to_be_bytes());
    out.extend_from_slice(payload);
    crc.update(payload);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
    Ok(())
}

/// Routes compressed image-data buffers into IDAT chunks, or into fdAT
/// chunks numbered from a starting sequence.
pub(crate) struct ImageSink<'a> {
    out: &'a mut Vec<u8>,
    capacity: usize,
    sequence: Option<u32>,
}

impl<'a> ImageSink<'a> {
    pub fn idat(out: &'a mut Vec<u8>, capacity: usize) -> Self {
        ImageSink {
            out,
            capacity,
            sequence: None,
        }
    }

    pub fn fdat(out: &'a mut Vec<u8>, capacity: usize, sequence: u32) -> Self {
        ImageSink {
            out,
            capacity,
            sequence: Some(sequence),
        }
    }

    pub fn put(&mut self, data: &[u8]) -> Result<(), PngError> {
        match self.sequence {
            None => write_chunk(self.out, self.capacity, b"IDAT", data),
            Some(seq) => {
                write_fdat(self.out, self.capacity, seq, data)?;
                self.sequence = Some(seq + 1);
                Ok(())
            }
        }
    }

    /// The sequence number the next fdAT chunk would take (0 in IDAT mode).
    pub fn next_sequence(&self) -> u32 {
        self.sequence.unwrap_or(0)
    }
}
