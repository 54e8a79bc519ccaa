/// Errors from PNG/APNG encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PngError {
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("packet capacity exhausted ({capacity} bytes)")]
    PacketOverflow { capacity: usize },

    #[error("Pal8 frames require a 256-entry palette")]
    MissingPalette,

    #[error("palette changed after the first frame; APNG supports a single palette")]
    PaletteMismatch,

    #[error("deflate error: {0}")]
    Deflate(String),

    #[error("stream already flushed; open a new encoder for another animation")]
    Flushed,
}
