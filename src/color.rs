//! Colour metadata carried into the sRGB / cHRM / gAMA identification chunks.

/// CIE chromaticity source for the cHRM chunk.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorPrimaries {
    #[default]
    Unspecified,
    /// ITU-R BT.709 / sRGB primaries.
    Bt709,
    /// ITU-R BT.470 System M.
    Bt470M,
    /// ITU-R BT.470 System B/G.
    Bt470Bg,
    /// SMPTE 170M.
    Smpte170M,
    /// SMPTE 240M (same primaries as 170M).
    Smpte240M,
    /// ITU-R BT.2020.
    Bt2020,
}

/// Transfer characteristic, used to derive the gAMA chunk and to detect
/// sRGB-tagged input.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransferCharacteristic {
    #[default]
    Unspecified,
    /// ITU-R BT.709 segmented curve.
    Bt709,
    /// Plain gamma 2.2.
    Gamma22,
    /// Plain gamma 2.8.
    Gamma28,
    /// SMPTE 170M (BT.709-compatible curve).
    Smpte170M,
    /// SMPTE 240M.
    Smpte240M,
    /// Linear light.
    Linear,
    /// IEC 61966-2-1 (sRGB).
    Srgb,
    /// ITU-R BT.1361.
    Bt1361,
    /// ITU-R BT.2020, 10-bit.
    Bt2020Ten,
    /// ITU-R BT.2020, 12-bit.
    Bt2020Twelve,
}

/// Chromaticities as (white, red, green, blue) xy pairs, or `None` when the
/// primaries carry no cHRM representation.
pub(crate) fn chromaticities(prim: ColorPrimaries) -> Option<[(f64, f64); 4]> {
    // D65 white point unless the system overrides it.
    let d65 = (0.3127, 0.3290);
    match prim {
        ColorPrimaries::Bt709 => Some([d65, (0.640, 0.330), (0.300, 0.600), (0.150, 0.060)]),
        ColorPrimaries::Bt470M => Some([
            (0.310, 0.316),
            (0.670, 0.330),
            (0.210, 0.710),
            (0.140, 0.080),
        ]),
        ColorPrimaries::Bt470Bg => Some([d65, (0.640, 0.330), (0.290, 0.600), (0.150, 0.060)]),
        ColorPrimaries::Smpte170M | ColorPrimaries::Smpte240M => {
            Some([d65, (0.630, 0.340), (0.310, 0.595), (0.155, 0.070)])
        }
        ColorPrimaries::Bt2020 => Some([d65, (0.708, 0.292), (0.170, 0.797), (0.131, 0.046)]),
        ColorPrimaries::Unspecified => None,
    }
}

impl TransferCharacteristic {
    /// Encoding gamma, or 0.0 when unknown (suppresses the gAMA chunk).
    ///
    /// The BT.709 family shares a segmented curve; 1.961 is the conventional
    /// single-gamma approximation for it.
    pub(crate) fn gamma(self) -> f64 {
        match self {
            Self::Bt709
            | Self::Smpte170M
            | Self::Smpte240M
            | Self::Bt1361
            | Self::Bt2020Ten
            | Self::Bt2020Twelve => 1.961,
            Self::Gamma22 | Self::Srgb => 2.2,
            Self::Gamma28 => 2.8,
            Self::Linear => 1.0,
            Self::Unspecified => 0.0,
        }
    }
}
