//! # zenpng
//!
//! PNG and APNG (animated PNG) encoder.
//!
//! A from-scratch encoder for still and animated PNG bitstreams: scanline
//! prediction filters with an adaptive per-row selector, optional Adam7
//! interlacing, streaming deflate into CRC-protected chunks, and an
//! inter-frame optimizer that searches dispose/blend combinations for the
//! smallest animated-PNG delta frames.
//!
//! ## Still images
//!
//! ```
//! use zenpng::{encode_png, PixelLayout};
//!
//! // 2x2 RGB checkerboard
//! let pixels = [
//!     255u8, 0, 0,    0, 255, 0,
//!     0, 255, 0,    255, 0, 0,
//! ];
//! let png = encode_png(&pixels, 2, 2, PixelLayout::Rgb8)?;
//! assert_eq!(&png[..8], &zenpng::PNG_SIGNATURE);
//! # Ok::<(), zenpng::PngError>(())
//! ```
//!
//! ## Animations
//!
//! [`ApngEncoder`] runs one frame behind: each call returns the previous
//! frame's packet, because that frame's dispose op is only decided while
//! optimizing the frame after it. The caller owns file assembly (acTL,
//! delays, IEND); the first packet carries the header block as
//! [`extra_data`](ApngPacket::extra_data).
//!
//! ```
//! use zenpng::{ApngEncoder, Frame, PixelLayout, PngOptions};
//!
//! let mut encoder = ApngEncoder::new(2, 2, PixelLayout::Rgba8, PngOptions::default())?;
//! let frame_a = [0u8; 16];
//! let mut frame_b = [0u8; 16];
//! frame_b[..4].copy_from_slice(&[255, 0, 0, 255]);
//!
//! assert!(encoder.encode(Some(&Frame::new(&frame_a, 8)))?.is_none());
//! let first = encoder.encode(Some(&Frame::new(&frame_b, 8)))?.unwrap();
//! assert!(first.extra_data.is_some());
//! let last = encoder.encode(None)?.unwrap();
//! assert!(last.extra_data.is_none());
//! # Ok::<(), zenpng::PngError>(())
//! ```

#![forbid(unsafe_code)]

use rgb::ComponentBytes as _;

mod apng;
mod color;
mod error;
mod frame;
mod limits;
mod options;
mod pixel;
mod png;

pub use apng::{ApngEncoder, ApngPacket, BlendOp, DisposeOp, FrameControl};
pub use color::{ColorPrimaries, TransferCharacteristic};
pub use error::PngError;
pub use frame::Frame;
pub use limits::Limits;
pub use options::{FilterType, PixelDensity, PngOptions, Stereo3d, StereoMode};
pub use pixel::{EncodePixel, PixelLayout};
pub use png::PngEncoder;

/// The eight bytes every PNG file starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

// Re-export rgb pixel types for convenience
/// 8-bit RGB pixel.
pub type RGB8 = rgb::RGB<u8>;
/// 8-bit RGBA pixel.
pub type RGBA8 = rgb::RGBA<u8>;

// ── One-shot still-image encoding ────────────────────────────────────

/// Encode packed pixels as a complete PNG file with default options.
pub fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
) -> Result<Vec<u8>, PngError> {
    encode_png_with(pixels, width, height, layout, &PngOptions::default())
}

/// Encode packed pixels as a complete PNG file.
pub fn encode_png_with(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    options: &PngOptions,
) -> Result<Vec<u8>, PngError> {
    let mut encoder = PngEncoder::new(width, height, layout, options.clone())?;
    encoder.encode(&Frame::new(pixels, layout.row_bytes(width)))
}

/// Encode palette indices as an indexed-colour PNG.
///
/// `palette` entries are `0xAARRGGBB`; a tRNS chunk is emitted when any
/// entry is not fully opaque.
pub fn encode_png_indexed(
    indices: &[u8],
    width: u32,
    height: u32,
    palette: &[u32; 256],
) -> Result<Vec<u8>, PngError> {
    encode_png_indexed_with(indices, width, height, palette, &PngOptions::default())
}

/// Encode palette indices as an indexed-colour PNG with explicit options.
pub fn encode_png_indexed_with(
    indices: &[u8],
    width: u32,
    height: u32,
    palette: &[u32; 256],
    options: &PngOptions,
) -> Result<Vec<u8>, PngError> {
    let layout = PixelLayout::Pal8;
    let mut encoder = PngEncoder::new(width, height, layout, options.clone())?;
    encoder.encode(&Frame::new(indices, layout.row_bytes(width)).with_palette(palette))
}

// ── Typed pixel encoding ─────────────────────────────────────────────

/// Encode typed pixels ([`rgb::RGB<u8>`] or [`rgb::RGBA<u8>`]) as PNG.
pub fn encode_png_pixels<P: EncodePixel>(
    pixels: &[P],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, PngError>
where
    [P]: rgb::ComponentBytes<u8>,
{
    encode_png(pixels.as_bytes(), width, height, P::layout())
}

/// Encode typed pixels as PNG with explicit options.
pub fn encode_png_pixels_with<P: EncodePixel>(
    pixels: &[P],
    width: u32,
    height: u32,
    options: &PngOptions,
) -> Result<Vec<u8>, PngError>
where
    [P]: rgb::ComponentBytes<u8>,
{
    encode_png_with(pixels.as_bytes(), width, height, P::layout(), options)
}
