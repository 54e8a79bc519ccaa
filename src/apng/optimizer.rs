//! Inter-frame optimizer: inverse blending and the (dispose, blend) search.

use super::{BlendOp, DisposeOp, FrameControl};
use crate::error::PngError;
use crate::frame::{Canvas, PixelSource};
use crate::pixel::PixelLayout;
use crate::png::chunk::ImageSink;
use crate::png::EncoderCore;

/// Index of the first fully transparent palette entry, if any.
fn transparent_index(palette: &[u32; 256]) -> Option<u8> {
    palette
        .iter()
        .position(|&entry| entry >> 24 == 0)
        .map(|i| i as u8)
}

/// Rewrite `background` (the disposed previous canvas) into the minimal
/// sub-image that, composited back over it with `fctl.blend_op`, reproduces
/// `foreground` exactly. The sub-image lands in the top-left of
/// `background`'s storage; `fctl` receives the crop geometry.
///
/// Returns `false` when the requested blend cannot produce the required
/// pixels, which removes this candidate from the search.
fn inverse_blend(
    background: &mut Canvas,
    foreground: &Canvas,
    layout: PixelLayout,
    palette: Option<&[u32; 256]>,
    bpp: usize,
    fctl: &mut FrameControl,
) -> bool {
    let w = foreground.width as usize;
    let h = foreground.height as usize;

    // Tight bounding box of changed pixels.
    let mut left = w;
    let mut right = 0usize;
    let mut top = h;
    let mut bottom = 0usize;
    for y in 0..h {
        let frow = foreground.row(y);
        let brow = background.row(y);
        for x in 0..w {
            if frow[bpp * x..bpp * (x + 1)] != brow[bpp * x..bpp * (x + 1)] {
                if x < left {
                    left = x;
                }
                if x >= right {
                    right = x + 1;
                }
                if y < top {
                    top = y;
                }
                if y >= bottom {
                    bottom = y + 1;
                }
            }
        }
    }
    if left == w && right == 0 {
        // Identical frames; the format forbids empty frames, so emit 1x1.
        left = 0;
        top = 0;
        right = 1;
        bottom = 1;
    }

    match fctl.blend_op {
        BlendOp::Source => {
            for y in top..bottom {
                let src = y * foreground.stride + bpp * left;
                let dst = (y - top) * background.stride;
                let n = bpp * (right - left);
                background.data[dst..dst + n].copy_from_slice(&foreground.data[src..src + n]);
            }
        }
        BlendOp::Over => {
            if !layout.has_alpha() {
                return false;
            }
            let transparent = palette.and_then(transparent_index);
            for y in top..bottom {
                for x in left..right {
                    let f = y * foreground.stride + bpp * x;
                    let b = y * background.stride + bpp * x;
                    let d = (y - top) * background.stride + bpp * (x - left);
                    if foreground.data[f..f + bpp] == background.data[b..b + bpp] {
                        // Unchanged pixel: emit fully transparent.
                        match layout {
                            PixelLayout::Pal8 => match transparent {
                                Some(index) => background.data[d] = index,
                                // Needs a fully transparent entry, none exists.
                                None => return false,
                            },
                            _ => background.data[d..d + bpp].fill(0),
                        }
                        continue;
                    }
                    // Full inverse alpha-on-alpha blending is rarely possible
                    // and rarely smaller than Source; only the trivial alpha
                    // cases are kept.
                    let feasible = match layout {
                        PixelLayout::Rgba8 => {
                            foreground.data[f + 3] == 0xff || background.data[b + 3] == 0
                        }
                        PixelLayout::GrayA8 => {
                            foreground.data[f + 1] == 0xff || background.data[b + 1] == 0
                        }
                        PixelLayout::Rgba16 => {
                            foreground.data[f + 6..f + 8] == [0xff, 0xff]
                                || background.data[b + 6..b + 8] == [0, 0]
                        }
                        PixelLayout::GrayA16 => {
                            foreground.data[f + 2..f + 4] == [0xff, 0xff]
                                || background.data[b + 2..b + 4] == [0, 0]
                        }
                        PixelLayout::Pal8 => match palette {
                            Some(pal) => {
                                pal[foreground.data[f] as usize] >> 24 == 0xff
                                    || pal[background.data[b] as usize] >> 24 == 0
                            }
                            None => false,
                        },
                        _ => false,
                    };
                    if !feasible {
                        return false;
                    }
                    background.data[d..d + bpp]
                        .copy_from_slice(&foreground.data[f..f + bpp]);
                }
            }
        }
    }

    background.width = (right - left) as u32;
    background.height = (bottom - top) as u32;
    fctl.width = background.width;
    fctl.height = background.height;
    fctl.x_offset = left as u32;
    fctl.y_offset = top as u32;
    true
}

/// Result of the search: the emitted-next frame's control parameters and the
/// dispose op chosen for the frame *before* it.
pub(crate) struct SearchOutcome {
    pub fctl: FrameControl,
    pub prev_dispose: DisposeOp,
}

fn encode_trial(
    core: &mut EncoderCore,
    src: &PixelSource<'_>,
    sequence: u32,
    buf: &mut Vec<u8>,
    capacity: usize,
) -> Result<u32, PngError> {
    buf.clear();
    let mut sink = ImageSink::fdat(buf, capacity, sequence);
    core.encode_image(src, &mut sink)?;
    Ok(sink.next_sequence())
}

/// Try every (previous dispose, current blend) pair, encode each feasible
/// inverse-blended sub-image, and append the smallest to `out`.
///
/// Each trial restores the sequence counter; only the winner's end state is
/// kept. Two persistent buffers ping-pong so the result needs at most one
/// copy into the packet.
#[allow(clippy::too_many_arguments)]
pub(crate) fn encode_best_delta(
    core: &mut EncoderCore,
    current: &Canvas,
    last_frame: &Canvas,
    prev_frame: Option<&Canvas>,
    last_fctl: FrameControl,
    palette: Option<&[u32; 256]>,
    sequence_number: &mut u32,
    out: &mut Vec<u8>,
    capacity: usize,
    fctl: FrameControl,
) -> Result<SearchOutcome, PngError> {
    let layout = core.layout;
    let bpp = layout.bytes_per_pixel();
    let width = core.width;
    let height = core.height;
    let available = capacity.saturating_sub(out.len());
    let start_sequence = *sequence_number;

    // 1-bit rows cannot express byte-granular crops (the bounding-box scan
    // addresses one byte per pixel), so they always take the full frame.
    if layout == PixelLayout::Mono1 {
        let mut best_buf = Vec::new();
        let full = current.source(width, height);
        *sequence_number = encode_trial(core, &full, start_sequence, &mut best_buf, available)?;
        out.extend_from_slice(&best_buf);
        return Ok(SearchOutcome {
            fctl: FrameControl {
                width,
                height,
                x_offset: 0,
                y_offset: 0,
                blend_op: BlendOp::Source,
                ..fctl
            },
            prev_dispose: DisposeOp::None,
        });
    }

    let mut scratch = Canvas::blank(width, height, layout);
    let mut best_buf = Vec::new();
    let mut trial_buf = Vec::new();
    let mut best: Option<(SearchOutcome, u32)> = None;

    // (None, Source) runs first: Source inverse blending is always
    // feasible, so the search is seeded with a valid candidate before any
    // combination that may drop out.
    for dispose in [DisposeOp::None, DisposeOp::Background, DisposeOp::Previous] {
        for blend in [BlendOp::Source, BlendOp::Over] {
            // Reconstruct the canvas the decoder will composite onto.
            if dispose == DisposeOp::Previous {
                // No "two frames ago" exists on the second frame.
                let Some(prev) = prev_frame else { continue };
                scratch.copy_from(prev);
            } else {
                scratch.copy_from(last_frame);
                if dispose == DisposeOp::Background {
                    scratch.zero_rect(
                        last_fctl.x_offset,
                        last_fctl.y_offset,
                        last_fctl.width,
                        last_fctl.height,
                        bpp,
                    );
                }
            }
            let mut trial_fctl = FrameControl {
                blend_op: blend,
                ..fctl
            };
            if !inverse_blend(&mut scratch, current, layout, palette, bpp, &mut trial_fctl) {
                continue;
            }
            let sub = scratch.source(trial_fctl.width, trial_fctl.height);
            let sequence = encode_trial(core, &sub, start_sequence, &mut trial_buf, available)?;
            if best.is_none() || trial_buf.len() < best_buf.len() {
                std::mem::swap(&mut trial_buf, &mut best_buf);
                best = Some((
                    SearchOutcome {
                        fctl: trial_fctl,
                        prev_dispose: dispose,
                    },
                    sequence,
                ));
            }
        }
    }

    // The (None, Source) candidate above cannot drop out.
    let Some((best, best_sequence)) = best else {
        unreachable!("Source inverse blending is always feasible");
    };

    *sequence_number = best_sequence;
    out.extend_from_slice(&best_buf);
    Ok(best)
}
