//! Still-image PNG encoding: chunk framing, scanline filters, Adam7
//! interlacing, and the streaming deflate pipe.

pub(crate) mod chunk;
pub(crate) mod deflate;
pub(crate) mod filter;
pub(crate) mod headers;
pub(crate) mod interlace;

mod encoder;

pub use encoder::PngEncoder;
pub(crate) use encoder::{EncoderCore, PACKET_HEADROOM};
