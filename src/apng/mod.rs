//! Animated-PNG encoding: frame-control metadata, the inter-frame
//! optimizer, and the one-frame-delay driver.

mod encoder;
mod optimizer;

pub use encoder::ApngEncoder;

/// What happens to a frame's region before the next frame is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisposeOp {
    /// Leave the canvas as rendered.
    #[default]
    None = 0,
    /// Clear the frame's region to fully transparent black.
    Background = 1,
    /// Revert the frame's region to the canvas before it was rendered.
    Previous = 2,
}

/// How a frame's pixels combine with the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendOp {
    /// Replace the region.
    #[default]
    Source = 0,
    /// Alpha-composite over the region.
    Over = 1,
}

/// The fcTL frame-control parameters: geometry, delay, and composition ops.
///
/// The delay fields are left 0/0 by the encoder; the muxer fills them in.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameControl {
    pub sequence_number: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub delay_num: u16,
    pub delay_den: u16,
    pub dispose_op: DisposeOp,
    pub blend_op: BlendOp,
}

impl FrameControl {
    /// The complete 38-byte fcTL chunk (framing, 26-byte payload, CRC).
    pub(crate) fn chunk_bytes(&self) -> [u8; 38] {
        let mut out = [0u8; 38];
        out[0..4].copy_from_slice(&26u32.to_be_bytes());
        out[4..8].copy_from_slice(b"fcTL");
        out[8..12].copy_from_slice(&self.sequence_number.to_be_bytes());
        out[12..16].copy_from_slice(&self.width.to_be_bytes());
        out[16..20].copy_from_slice(&self.height.to_be_bytes());
        out[20..24].copy_from_slice(&self.x_offset.to_be_bytes());
        out[24..28].copy_from_slice(&self.y_offset.to_be_bytes());
        out[28..30].copy_from_slice(&self.delay_num.to_be_bytes());
        out[30..32].copy_from_slice(&self.delay_den.to_be_bytes());
        out[32] = self.dispose_op as u8;
        out[33] = self.blend_op as u8;
        let mut crc = crc32fast::Hasher::new();
        crc.update(&out[4..34]);
        out[34..38].copy_from_slice(&crc.finalize().to_be_bytes());
        out
    }
}

/// One emitted APNG packet: an fcTL chunk followed by the frame's image
/// data (IDAT for the first frame, numbered fdAT afterwards).
#[derive(Clone, Debug)]
pub struct ApngPacket {
    pub data: Vec<u8>,
    /// Presentation timestamp of the frame this packet encodes.
    pub pts: Option<i64>,
    /// The global header block (signature through the last pre-image
    /// chunk), attached to the first packet only.
    pub extra_data: Option<Vec<u8>>,
}
