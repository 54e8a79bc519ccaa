//! One-frame-delay APNG driver.

use super::optimizer::encode_best_delta;
use super::{ApngPacket, BlendOp, DisposeOp, FrameControl};
use crate::error::PngError;
use crate::frame::{Canvas, Frame};
use crate::options::PngOptions;
use crate::pixel::PixelLayout;
use crate::png::chunk::ImageSink;
use crate::png::{EncoderCore, PACKET_HEADROOM};

/// Space reserved at the front of a buffered packet for the fcTL chunk that
/// is only finalized when the next frame arrives.
const FCTL_RESERVE: usize = 26 + 12;

fn palette_crc(palette: &[u32; 256]) -> u32 {
    let mut crc = crc32fast::Hasher::new();
    for entry in palette {
        crc.update(&entry.to_be_bytes());
    }
    crc.finalize()
}

/// Animated-PNG encoder.
///
/// Frames go in one at a time; each call returns the packet of the
/// *previous* frame, whose dispose op only becomes known once the current
/// frame has been optimized against it. Flush with `encode(None)` to obtain
/// the final frame's packet.
///
/// A packet is one fcTL chunk followed by the frame's image data. The
/// caller (muxer) assembles the file: the first packet's
/// [`extra_data`](ApngPacket::extra_data) holds the signature and header
/// chunks, the acTL chunk and the per-frame delays are the caller's to
/// supply, and an IEND chunk terminates the file.
pub struct ApngEncoder {
    core: EncoderCore,
    sequence_number: u32,
    frames_in: u64,
    flushed: bool,
    palette_checksum: Option<u32>,
    palette: Option<Box<[u32; 256]>>,
    extra_data: Option<Vec<u8>>,
    last_frame: Option<Canvas>,
    last_frame_pts: Option<i64>,
    last_fctl: FrameControl,
    last_packet: Vec<u8>,
    prev_frame: Option<Canvas>,
}

impl ApngEncoder {
    /// Open an encoder for `width` x `height` frames of `layout` pixels.
    pub fn new(
        width: u32,
        height: u32,
        layout: PixelLayout,
        options: PngOptions,
    ) -> Result<Self, PngError> {
        Ok(ApngEncoder {
            core: EncoderCore::open(width, height, layout, &options)?,
            sequence_number: 0,
            frames_in: 0,
            flushed: false,
            palette_checksum: None,
            palette: None,
            extra_data: None,
            last_frame: None,
            last_frame_pts: None,
            last_fctl: FrameControl::default(),
            last_packet: Vec::new(),
            prev_frame: None,
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

    /// Feed the next frame, or `None` to flush the stream.
    ///
    /// Returns the packet for the previously fed frame, if one is pending.
    /// Flushing is terminal; feeding frames afterwards is an error.
    pub fn encode(&mut self, frame: Option<&Frame<'_>>) -> Result<Option<ApngPacket>, PngError> {
        if self.flushed {
            return match frame {
                Some(_) => Err(PngError::Flushed),
                None => Ok(None),
            };
        }
        let (width, height, layout) = (self.core.width, self.core.height, self.core.layout);

        if let Some(frame) = frame {
            frame.validate(width, height, layout)?;
            if layout == PixelLayout::Pal8 {
                // validate() guarantees the palette is present.
                if let Some(palette) = frame.palette() {
                    let checksum = palette_crc(palette);
                    match self.palette_checksum {
                        None => {
                            self.palette_checksum = Some(checksum);
                            self.palette = Some(Box::new(*palette));
                        }
                        Some(pinned) if pinned != checksum => {
                            log::error!(
                                "input contains more than one unique palette; \
                                 APNG does not support multiple palettes"
                            );
                            return Err(PngError::PaletteMismatch);
                        }
                        Some(_) => {}
                    }
                }
            }
        } else if self.frames_in == 0 {
            // Nothing buffered, nothing to flush.
            return Ok(None);
        }

        let capacity = self.core.max_packet_size(4 + 12)?;

        if self.frames_in == 0 {
            let Some(frame) = frame else {
                return Ok(None);
            };
            let mut extra = Vec::with_capacity(PACKET_HEADROOM);
            extra.extend_from_slice(&crate::PNG_SIGNATURE);
            self.core
                .write_headers(&mut extra, PACKET_HEADROOM, frame.palette())?;
            self.extra_data = Some(extra);

            // The first frame is always a full-frame Source draw at the
            // origin; its image data goes to IDAT and consumes no sequence
            // numbers beyond the fcTL's.
            let fctl = FrameControl {
                sequence_number: self.sequence_number,
                width,
                height,
                x_offset: 0,
                y_offset: 0,
                delay_num: 0,
                delay_den: 0,
                dispose_op: DisposeOp::None,
                blend_op: BlendOp::Source,
            };
            self.sequence_number += 1;

            let canvas = Canvas::from_frame(frame, width, height, layout);
            self.last_packet.clear();
            self.last_packet.resize(FCTL_RESERVE, 0);
            {
                let mut sink = ImageSink::idat(&mut self.last_packet, capacity);
                self.core.encode_image(&canvas.source(width, height), &mut sink)?;
            }
            self.last_frame = Some(canvas);
            self.last_frame_pts = frame.pts();
            self.last_fctl = fctl;
            self.frames_in = 1;
            return Ok(None);
        }

        // The buffered packet goes out this call; copy it before the buffer
        // is reused for the incoming frame.
        let outgoing = self.last_frame.is_some().then(|| self.last_packet.clone());

        let mut incoming: Option<(Canvas, FrameControl, Option<i64>)> = None;
        if let Some(frame) = frame {
            let current = Canvas::from_frame(frame, width, height, layout);
            let fctl = FrameControl {
                sequence_number: self.sequence_number,
                delay_num: 0,
                delay_den: 0,
                ..FrameControl::default()
            };
            self.sequence_number += 1;

            self.last_packet.clear();
            self.last_packet.resize(FCTL_RESERVE, 0);
            let last_frame = match &self.last_frame {
                Some(last) => last,
                None => return Err(PngError::Flushed),
            };
            let outcome = encode_best_delta(
                &mut self.core,
                &current,
                last_frame,
                self.prev_frame.as_ref(),
                self.last_fctl,
                self.palette.as_deref(),
                &mut self.sequence_number,
                &mut self.last_packet,
                capacity,
                fctl,
            )?;
            // The search fixed the dispose op of the frame about to be
            // emitted, one frame late.
            self.last_fctl.dispose_op = outcome.prev_dispose;
            incoming = Some((current, outcome.fctl, frame.pts()));
        } else {
            // End of stream: nothing follows, so disposing is pointless.
            self.last_fctl.dispose_op = DisposeOp::None;
        }

        let packet = outgoing.map(|mut data| {
            data[..FCTL_RESERVE].copy_from_slice(&self.last_fctl.chunk_bytes());
            ApngPacket {
                data,
                pts: self.last_frame_pts,
                extra_data: self.extra_data.take(),
            }
        });

        match incoming {
            Some((current, fctl, pts)) => {
                // Maintain the dispose-to-previous target before replacing
                // the retained frame.
                if let Some(last) = &self.last_frame {
                    if self.last_fctl.dispose_op != DisposeOp::Previous {
                        let prev = self
                            .prev_frame
                            .get_or_insert_with(|| Canvas::blank(width, height, layout));
                        prev.copy_from(last);
                        if self.last_fctl.dispose_op == DisposeOp::Background {
                            prev.zero_rect(
                                self.last_fctl.x_offset,
                                self.last_fctl.y_offset,
                                self.last_fctl.width,
                                self.last_fctl.height,
                                layout.bytes_per_pixel(),
                            );
                        }
                    }
                }
                self.last_frame = Some(current);
                self.last_frame_pts = pts;
                self.last_fctl = fctl;
                self.frames_in += 1;
            }
            None => {
                self.last_frame = None;
                self.flushed = true;
            }
        }

        Ok(packet)
    }
}
