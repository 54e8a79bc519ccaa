//! Pre-image header chunks: IHDR, pHYs, sTER, sRGB, cHRM, gAMA, PLTE, tRNS.

use super::chunk::write_chunk;
use crate::color::{chromaticities, ColorPrimaries, TransferCharacteristic};
use crate::error::PngError;
use crate::options::{Stereo3d, StereoMode};

pub(crate) struct HeaderParams<'a> {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub interlaced: bool,
    /// Dots per metre, 0 when unset (pHYs then carries the aspect ratio).
    pub dpm: u32,
    pub sample_aspect_ratio: (u32, u32),
    pub primaries: ColorPrimaries,
    pub transfer: TransferCharacteristic,
    pub stereo: Option<Stereo3d>,
    pub palette: Option<&'a [u32; 256]>,
}

fn png_fixed(v: f64) -> [u8; 4] {
    ((v * 100000.0).round() as u32).to_be_bytes()
}

/// Emit every header chunk in wire order.
pub(crate) fn write_headers(
    out: &mut Vec<u8>,
    capacity: usize,
    p: &HeaderParams<'_>,
) -> Result<(), PngError> {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&p.width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&p.height.to_be_bytes());
    ihdr[8] = p.bit_depth;
    ihdr[9] = p.color_type;
    ihdr[10] = 0; // compression method
    ihdr[11] = 0; // filter method
    ihdr[12] = u8::from(p.interlaced);
    write_chunk(out, capacity, b"IHDR", &ihdr)?;

    let mut phys = [0u8; 9];
    if p.dpm != 0 {
        phys[0..4].copy_from_slice(&p.dpm.to_be_bytes());
        phys[4..8].copy_from_slice(&p.dpm.to_be_bytes());
        phys[8] = 1; // unit is metre
    } else {
        let (num, den) = p.sample_aspect_ratio;
        phys[0..4].copy_from_slice(&num.to_be_bytes());
        phys[4..8].copy_from_slice(&den.to_be_bytes());
        phys[8] = 0; // unit unknown, fields carry the aspect ratio
    }
    write_chunk(out, capacity, b"pHYs", &phys)?;

    if let Some(stereo) = p.stereo {
        match stereo.mode {
            StereoMode::SideBySide => {
                let layout = [u8::from(!stereo.inverted)];
                write_chunk(out, capacity, b"sTER", &layout)?;
            }
            StereoMode::TwoD => {}
            mode => {
                log::warn!("only side-by-side stereo can be written to an sTER chunk, dropping {mode:?}");
            }
        }
    }

    if p.primaries == ColorPrimaries::Bt709 && p.transfer == TransferCharacteristic::Srgb {
        // rendering intent: relative colorimetric
        write_chunk(out, capacity, b"sRGB", &[1])?;
    }

    if let Some([white, red, green, blue]) = chromaticities(p.primaries) {
        let mut chrm = Vec::with_capacity(32);
        for (x, y) in [white, red, green, blue] {
            chrm.extend_from_slice(&png_fixed(x));
            chrm.extend_from_slice(&png_fixed(y));
        }
        write_chunk(out, capacity, b"cHRM", &chrm)?;
    }

    let gamma = p.transfer.gamma();
    if gamma > 1e-6 {
        write_chunk(out, capacity, b"gAMA", &png_fixed(1.0 / gamma))?;
    }

    if let Some(palette) = p.palette {
        let mut plte = Vec::with_capacity(256 * 3);
        let mut trns = Vec::with_capacity(256);
        let mut has_alpha = false;
        for &entry in palette.iter() {
            let alpha = (entry >> 24) as u8;
            if alpha != 0xff {
                has_alpha = true;
            }
            trns.push(alpha);
            plte.push((entry >> 16) as u8);
            plte.push((entry >> 8) as u8);
            plte.push(entry as u8);
        }
        write_chunk(out, capacity, b"PLTE", &plte)?;
        if has_alpha {
            write_chunk(out, capacity, b"tRNS", &trns)?;
        }
    }

    Ok(())
}
