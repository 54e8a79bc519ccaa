use crate::error::PngError;

/// Ceilings the encoder enforces before allocating anything.
///
/// PNG stores dimensions as 31-bit values and the worst-case packet bound
/// grows with `width * height`, so callers opening encoders for untrusted
/// sizes can cap geometry and the packet allocation here. Unset fields are
/// unlimited.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u32>,
    /// Maximum image height in pixels.
    pub max_height: Option<u32>,
    /// Maximum total pixel count.
    pub max_pixels: Option<u64>,
    /// Maximum size of one encoded packet buffer, in bytes. This bounds the
    /// worst-case estimate the packet is sized by, not the final output.
    pub max_packet_bytes: Option<usize>,
}

impl Limits {
    /// Reject geometry over any configured ceiling. Runs at open time,
    /// before the deflate stream or any frame storage exists.
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), PngError> {
        if let Some(max) = self.max_width {
            if width > max {
                return Err(PngError::LimitExceeded(format!(
                    "image width {width} over cap {max}"
                )));
            }
        }
        if let Some(max) = self.max_height {
            if height > max {
                return Err(PngError::LimitExceeded(format!(
                    "image height {height} over cap {max}"
                )));
            }
        }
        if let Some(max) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max {
                return Err(PngError::LimitExceeded(format!(
                    "{width}x{height} is {pixels} pixels, over cap {max}"
                )));
            }
        }
        Ok(())
    }

    /// Reject a packet buffer allocation over the configured ceiling.
    pub(crate) fn check_packet(&self, bytes: usize) -> Result<(), PngError> {
        match self.max_packet_bytes {
            Some(max) if bytes > max => Err(PngError::LimitExceeded(format!(
                "worst-case packet of {bytes} bytes over cap {max}"
            ))),
            _ => Ok(()),
        }
    }
}
