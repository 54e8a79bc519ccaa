//! Scanline prediction filters and the adaptive per-row selector.

use crate::options::FilterType;

/// Wire codes of the five scanline filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RowFilter {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

const ALL_FILTERS: [RowFilter; 5] = [
    RowFilter::None,
    RowFilter::Sub,
    RowFilter::Up,
    RowFilter::Average,
    RowFilter::Paeth,
];

/// `dst[i] = minuend[i] - subtrahend[i]` over whole slices, wrapping.
pub(crate) fn diff_bytes(dst: &mut [u8], minuend: &[u8], subtrahend: &[u8]) {
    for ((d, &m), &s) in dst.iter_mut().zip(minuend).zip(subtrahend) {
        *d = m.wrapping_sub(s);
    }
}

fn paeth_predict(a: i32, b: i32, c: i32) -> i32 {
    let p = b - c;
    let q = a - c;
    let pa = p.abs();
    let pb = q.abs();
    let pc = (p + q).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Apply one filter to a row. `top` is the previous row of the same pass,
/// treated as all zeroes when absent. `bpp` is whole bytes per pixel.
pub(crate) fn filter_row(
    dst: &mut [u8],
    filter: RowFilter,
    src: &[u8],
    top: Option<&[u8]>,
    bpp: usize,
) {
    let size = src.len();
    debug_assert!(bpp > 0 || filter == RowFilter::None);
    match filter {
        RowFilter::None => dst.copy_from_slice(src),
        RowFilter::Sub => {
            dst[..bpp].copy_from_slice(&src[..bpp]);
            diff_bytes(&mut dst[bpp..], &src[bpp..], &src[..size - bpp]);
        }
        RowFilter::Up => match top {
            Some(top) => diff_bytes(dst, src, top),
            None => dst.copy_from_slice(src),
        },
        RowFilter::Average => {
            for i in 0..size {
                let left = if i >= bpp { u16::from(src[i - bpp]) } else { 0 };
                let up = u16::from(top.map_or(0, |t| t[i]));
                dst[i] = src[i].wrapping_sub(((left + up) >> 1) as u8);
            }
        }
        RowFilter::Paeth => {
            for i in 0..size {
                let a = if i >= bpp { i32::from(src[i - bpp]) } else { 0 };
                let b = i32::from(top.map_or(0, |t| t[i]));
                let c = if i >= bpp {
                    i32::from(top.map_or(0, |t| t[i - bpp]))
                } else {
                    0
                };
                dst[i] = src[i].wrapping_sub(paeth_predict(a, b, c) as u8);
            }
        }
    }
}

/// Sum of absolute signed byte values over the filter byte and payload, the
/// standard proxy for post-deflate size.
fn row_cost(row: &[u8]) -> i64 {
    row.iter().map(|&b| i64::from((b as i8).unsigned_abs())).sum()
}

/// Filter one row into `bufs`, returning the chosen filtered row (filter
/// byte followed by `size` payload bytes).
///
/// With no previous row, any non-`None` strategy downgrades to `Sub`. In
/// `Mixed` mode all five filters are tried and the cheapest kept; ties keep
/// the earliest-tried filter.
pub(crate) fn choose_filter<'a>(
    strategy: FilterType,
    bufs: &'a mut [Vec<u8>; 2],
    src: &[u8],
    top: Option<&[u8]>,
    bpp: usize,
) -> &'a [u8] {
    let size = src.len();
    let strategy = if top.is_none() && strategy != FilterType::None {
        FilterType::Sub
    } else {
        strategy
    };

    if strategy == FilterType::Mixed {
        let (mut cur, mut best) = (0usize, 1usize);
        let mut best_cost = i64::MAX;
        for filter in ALL_FILTERS {
            let buf = &mut bufs[cur];
            buf[0] = filter as u8;
            filter_row(&mut buf[1..=size], filter, src, top, bpp);
            let cost = row_cost(&buf[..=size]);
            if cost < best_cost {
                best_cost = cost;
                std::mem::swap(&mut cur, &mut best);
            }
        }
        &bufs[best][..=size]
    } else {
        let filter = match strategy {
            FilterType::None => RowFilter::None,
            FilterType::Sub => RowFilter::Sub,
            FilterType::Up => RowFilter::Up,
            FilterType::Average => RowFilter::Average,
            FilterType::Paeth => RowFilter::Paeth,
            FilterType::Mixed => unreachable!(),
        };
        let buf = &mut bufs[0];
        buf[0] = filter as u8;
        filter_row(&mut buf[1..=size], filter, src, top, bpp);
        &bufs[0][..=size]
    }
}
