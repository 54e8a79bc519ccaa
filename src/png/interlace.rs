//! Adam7 interlacing: pass geometry and per-pass row extraction.

pub(crate) const PASSES: usize = 7;

/// Per-pass pixel-column masks over `x mod 8`.
const XMASK: [u32; PASSES] = [0x80, 0x08, 0x88, 0x22, 0xaa, 0x55, 0xff];
/// Per-pass row masks over `y mod 8`.
const YMASK: [u32; PASSES] = [0x80, 0x80, 0x08, 0x88, 0x22, 0xaa, 0x55];
/// First column each pass samples.
const XMIN: [usize; PASSES] = [0, 4, 0, 2, 0, 1, 0];
/// Log2 of the column step of each pass.
const XSHIFT: [usize; PASSES] = [3, 3, 2, 2, 1, 1, 0];

/// Whether row `y` contributes to `pass`.
pub(crate) fn row_in_pass(pass: usize, y: usize) -> bool {
    (YMASK[pass] << (y & 7)) & 0x80 != 0
}

/// Packed byte length of one row of `pass`, 0 when the pass is empty.
pub(crate) fn pass_row_size(pass: usize, bits_per_pixel: usize, width: usize) -> usize {
    let xmin = XMIN[pass];
    if width <= xmin {
        return 0;
    }
    let shift = XSHIFT[pass];
    let pass_width = (width - xmin + (1 << shift) - 1) >> shift;
    (pass_width * bits_per_pixel + 7) >> 3
}

/// Pack the pixels of `pass` from a full source row into `dst`.
///
/// For byte-sized pixels this copies `bits_per_pixel / 8` bytes per selected
/// column; 1-bit data is repacked bit by bit.
pub(crate) fn extract_row(
    dst: &mut [u8],
    bits_per_pixel: usize,
    pass: usize,
    src: &[u8],
    width: usize,
) {
    let mask = XMASK[pass];
    if bits_per_pixel == 1 {
        dst.fill(0);
        let mut dst_x = 0;
        for x in 0..width {
            let j = x & 7;
            if (mask << j) & 0x80 != 0 {
                let bit = (src[x >> 3] >> (7 - j)) & 1;
                dst[dst_x >> 3] |= bit << (7 - (dst_x & 7));
                dst_x += 1;
            }
        }
    } else {
        let bpp = bits_per_pixel >> 3;
        let mut d = 0;
        for x in 0..width {
            if (mask << (x & 7)) & 0x80 != 0 {
                dst[d..d + bpp].copy_from_slice(&src[x * bpp..x * bpp + bpp]);
                d += bpp;
            }
        }
    }
}
