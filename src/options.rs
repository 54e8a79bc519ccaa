//! Encoder configuration.

use crate::color::{ColorPrimaries, TransferCharacteristic};
use crate::error::PngError;
use crate::limits::Limits;

/// Scanline prediction filter strategy.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FilterType {
    /// No prediction.
    #[default]
    None,
    /// Difference against the previous pixel in the scanline.
    Sub,
    /// Difference against the scanline above.
    Up,
    /// Difference against the average of left and above.
    Average,
    /// Paeth predictor over left, above, and above-left.
    Paeth,
    /// Try all five per scanline and keep the cheapest.
    Mixed,
}

/// Physical pixel density for the pHYs chunk.
///
/// Inches-basis and metres-basis density are alternatives of one value, so a
/// conflicting configuration cannot be expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelDensity {
    /// Dots per inch; converted to dots per metre at open.
    Dpi(u32),
    /// Dots per metre.
    Dpm(u32),
}

/// Stereoscopic packing of the input image.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StereoMode {
    /// Not stereoscopic.
    TwoD,
    /// Left/right views side by side. The only mode the sTER chunk can carry.
    SideBySide,
    /// Top/bottom packing.
    TopBottom,
    /// Alternating frames.
    FrameSequence,
}

/// Stereo3D tag for the sTER chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stereo3d {
    pub mode: StereoMode,
    /// Whether the view order is swapped (right view first).
    pub inverted: bool,
}

/// Open-time configuration for [`PngEncoder`](crate::PngEncoder) and
/// [`ApngEncoder`](crate::ApngEncoder).
#[derive(Clone, Debug, Default)]
pub struct PngOptions {
    /// Scanline filter strategy. `Mono1` input always uses `None`.
    pub filter: FilterType,
    /// Deflate level 0..=9; `None` uses the library default.
    pub compression: Option<u8>,
    /// Physical density; when unset, pHYs carries the sample aspect ratio.
    pub density: Option<PixelDensity>,
    /// Sample aspect ratio written to pHYs when no density is set.
    /// `None` encodes as unknown (0:1).
    pub sample_aspect_ratio: Option<(u32, u32)>,
    /// Emit Adam7 interlaced image data.
    pub interlaced: bool,
    /// Colour primaries of the input, for cHRM and sRGB detection.
    pub primaries: ColorPrimaries,
    /// Transfer characteristic of the input, for gAMA and sRGB detection.
    pub transfer: TransferCharacteristic,
    /// Stereoscopic tag; only side-by-side maps to sTER, other modes are
    /// dropped with a warning.
    pub stereo: Option<Stereo3d>,
    /// Resource limits applied at open and packet sizing.
    pub limits: Limits,
}

/// Density fields above this are out of the pHYs value range the encoder
/// accepts.
const MAX_DENSITY: u32 = 0x10000;

impl PngOptions {
    /// Resolved dots-per-metre value, or 0 when no density is configured.
    pub(crate) fn resolved_dpm(&self) -> Result<u32, PngError> {
        match self.density {
            None => Ok(0),
            Some(PixelDensity::Dpi(dpi)) => {
                if dpi > MAX_DENSITY {
                    return Err(PngError::InvalidOption(format!(
                        "dpi {dpi} out of range 0..={MAX_DENSITY}"
                    )));
                }
                Ok((u64::from(dpi) * 10000 / 254) as u32)
            }
            Some(PixelDensity::Dpm(dpm)) => {
                if dpm > MAX_DENSITY {
                    return Err(PngError::InvalidOption(format!(
                        "dpm {dpm} out of range 0..={MAX_DENSITY}"
                    )));
                }
                Ok(dpm)
            }
        }
    }

    /// Deflate level clamped to 0..=9, or `None` for the library default.
    pub(crate) fn resolved_compression(&self) -> Option<u32> {
        self.compression.map(|level| u32::from(level.min(9)))
    }
}
