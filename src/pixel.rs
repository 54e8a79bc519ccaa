/// Pixel memory layout accepted by the encoder.
///
/// 16-bit layouts are big-endian byte order, matching the PNG wire format;
/// the encoder passes their bytes through untouched.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// Single channel, 16-bit grayscale (big endian).
    Gray16,
    /// 2 channels, 8-bit grayscale + alpha.
    GrayA8,
    /// 2 channels, 16-bit grayscale + alpha (big endian).
    GrayA16,
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 3 channels, 16-bit RGB (big endian).
    Rgb16,
    /// 4 channels, 8-bit RGBA.
    Rgba8,
    /// 4 channels, 16-bit RGBA (big endian).
    Rgba16,
    /// Single channel, 8-bit palette index into a 256-entry `0xAARRGGBB` table.
    Pal8,
    /// 1-bit monochrome, MSB first, 0 = black.
    Mono1,
}

/// PNG colour-type codes (IHDR byte 9).
pub(crate) mod color_type {
    pub const GRAY: u8 = 0;
    pub const RGB: u8 = 2;
    pub const PALETTE: u8 = 3;
    pub const GRAY_ALPHA: u8 = 4;
    pub const RGB_ALPHA: u8 = 6;
}

impl PixelLayout {
    /// Sample depth written to IHDR.
    pub fn bit_depth(&self) -> u8 {
        match self {
            Self::Mono1 => 1,
            Self::Gray8 | Self::GrayA8 | Self::Rgb8 | Self::Rgba8 | Self::Pal8 => 8,
            Self::Gray16 | Self::GrayA16 | Self::Rgb16 | Self::Rgba16 => 16,
        }
    }

    /// PNG colour type written to IHDR.
    pub(crate) fn color_type(&self) -> u8 {
        match self {
            Self::Gray8 | Self::Gray16 | Self::Mono1 => color_type::GRAY,
            Self::GrayA8 | Self::GrayA16 => color_type::GRAY_ALPHA,
            Self::Rgb8 | Self::Rgb16 => color_type::RGB,
            Self::Rgba8 | Self::Rgba16 => color_type::RGB_ALPHA,
            Self::Pal8 => color_type::PALETTE,
        }
    }

    /// Bits per pixel (channels x sample depth).
    pub fn bits_per_pixel(&self) -> usize {
        match self {
            Self::Mono1 => 1,
            Self::Gray8 | Self::Pal8 => 8,
            Self::Gray16 | Self::GrayA8 => 16,
            Self::Rgb8 => 24,
            Self::Rgba8 | Self::GrayA16 => 32,
            Self::Rgb16 => 48,
            Self::Rgba16 => 64,
        }
    }

    /// Whole bytes per pixel, rounded up (1 for sub-byte layouts).
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel() + 7) / 8
    }

    /// Packed row size in bytes for `width` pixels.
    pub fn row_bytes(&self, width: u32) -> usize {
        (width as usize * self.bits_per_pixel() + 7) / 8
    }

    /// Whether the layout carries an alpha channel usable for `Over` blending.
    ///
    /// `Pal8` counts: a fully transparent palette entry can stand in for
    /// per-pixel alpha.
    pub(crate) fn has_alpha(&self) -> bool {
        matches!(
            self,
            Self::GrayA8 | Self::GrayA16 | Self::Rgba8 | Self::Rgba16 | Self::Pal8
        )
    }
}

/// Typed pixels that can be handed to the `encode_png_pixels` helpers.
///
/// Only 8-bit pixel types are covered: the crate's 16-bit layouts are
/// big-endian bytes, while in-memory `rgb` 16-bit pixels are native endian.
pub trait EncodePixel: Copy {
    /// The matching [`PixelLayout`].
    fn layout() -> PixelLayout;
}

impl EncodePixel for rgb::RGB<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Rgb8
    }
}

impl EncodePixel for rgb::RGBA<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Rgba8
    }
}
