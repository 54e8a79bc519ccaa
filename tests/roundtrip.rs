use zenpng::*;

fn decode_identity(data: &[u8]) -> (Vec<u8>, png::OutputInfo) {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (buf, info)
}

fn noise(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let mut state: u32 = 0xDEAD_BEEF;
    for b in out.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *b = state as u8;
    }
    out
}

#[test]
fn rgb8_roundtrip_every_filter() {
    let (w, h) = (16u32, 8u32);
    let pixels = noise(w as usize * h as usize * 3);
    for filter in [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
        FilterType::Mixed,
    ] {
        let options = PngOptions {
            filter,
            ..Default::default()
        };
        let encoded = encode_png_with(&pixels, w, h, PixelLayout::Rgb8, &options).unwrap();
        let (decoded, info) = decode_identity(&encoded);
        assert_eq!(info.color_type, png::ColorType::Rgb, "{filter:?}");
        assert_eq!(info.bit_depth, png::BitDepth::Eight, "{filter:?}");
        assert_eq!(decoded, pixels, "{filter:?}");
    }
}

#[test]
fn rgba8_roundtrip_every_filter() {
    let (w, h) = (9u32, 7u32);
    let pixels = noise(w as usize * h as usize * 4);
    for filter in [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
        FilterType::Mixed,
    ] {
        let options = PngOptions {
            filter,
            ..Default::default()
        };
        let encoded = encode_png_with(&pixels, w, h, PixelLayout::Rgba8, &options).unwrap();
        let (decoded, info) = decode_identity(&encoded);
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(decoded, pixels, "{filter:?}");
    }
}

#[test]
fn gray_roundtrips() {
    let (w, h) = (13u32, 5u32);
    for (layout, color, depth, bpp) in [
        (PixelLayout::Gray8, png::ColorType::Grayscale, png::BitDepth::Eight, 1),
        (PixelLayout::Gray16, png::ColorType::Grayscale, png::BitDepth::Sixteen, 2),
        (PixelLayout::GrayA8, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, 2),
        (PixelLayout::GrayA16, png::ColorType::GrayscaleAlpha, png::BitDepth::Sixteen, 4),
    ] {
        let pixels = noise(w as usize * h as usize * bpp);
        let encoded = encode_png(&pixels, w, h, layout).unwrap();
        let (decoded, info) = decode_identity(&encoded);
        assert_eq!(info.color_type, color, "{layout:?}");
        assert_eq!(info.bit_depth, depth, "{layout:?}");
        assert_eq!(decoded, pixels, "{layout:?}");
    }
}

#[test]
fn deep_color_roundtrips() {
    let (w, h) = (6u32, 11u32);
    for (layout, color, bpp) in [
        (PixelLayout::Rgb16, png::ColorType::Rgb, 6),
        (PixelLayout::Rgba16, png::ColorType::Rgba, 8),
    ] {
        let pixels = noise(w as usize * h as usize * bpp);
        let options = PngOptions {
            filter: FilterType::Mixed,
            ..Default::default()
        };
        let encoded = encode_png_with(&pixels, w, h, layout, &options).unwrap();
        let (decoded, info) = decode_identity(&encoded);
        assert_eq!(info.color_type, color, "{layout:?}");
        assert_eq!(info.bit_depth, png::BitDepth::Sixteen, "{layout:?}");
        assert_eq!(decoded, pixels, "{layout:?}");
    }
}

#[test]
fn mono1_checkerboard_roundtrip() {
    // 8x8 checkerboard, one byte per packed row.
    let pixels: Vec<u8> = (0..8).map(|y| if y % 2 == 0 { 0xAA } else { 0x55 }).collect();
    // A prediction filter is requested but 1-bit data always encodes
    // unfiltered; the stream must still decode bit-exactly.
    let options = PngOptions {
        filter: FilterType::Paeth,
        ..Default::default()
    };
    let encoded = encode_png_with(&pixels, 8, 8, PixelLayout::Mono1, &options).unwrap();
    let (decoded, info) = decode_identity(&encoded);
    assert_eq!(info.color_type, png::ColorType::Grayscale);
    assert_eq!(info.bit_depth, png::BitDepth::One);
    assert_eq!(decoded, pixels);
}

#[test]
fn mono1_odd_width_roundtrip() {
    // 13 pixels per row: trailing bits of each row byte are padding.
    let (w, h) = (13u32, 9u32);
    let row_bytes = PixelLayout::Mono1.row_bytes(w);
    let pixels = noise(row_bytes * h as usize);
    let encoded = encode_png(&pixels, w, h, PixelLayout::Mono1).unwrap();
    let (decoded, _) = decode_identity(&encoded);
    assert_eq!(decoded, pixels);
}

#[test]
fn pal8_roundtrip() {
    let mut palette = [0u32; 256];
    for (i, entry) in palette.iter_mut().enumerate() {
        let i = i as u32;
        *entry = 0xff00_0000 | (i << 16) | ((255 - i) << 8) | (i / 2);
    }
    palette[0] = 0x0000_0000; // fully transparent entry
    let (w, h) = (10u32, 6u32);
    let indices = noise(w as usize * h as usize);
    let encoded = encode_png_indexed(&indices, w, h, &palette).unwrap();
    let (decoded, info) = decode_identity(&encoded);
    assert_eq!(info.color_type, png::ColorType::Indexed);
    assert_eq!(decoded, indices);
}

#[test]
fn interlaced_roundtrips() {
    for (layout, bpp_bytes, w, h) in [
        (PixelLayout::Rgb8, 3usize, 17u32, 10u32),
        (PixelLayout::Rgba8, 4, 7, 5),
        (PixelLayout::Gray16, 2, 9, 9),
        (PixelLayout::Rgba16, 8, 4, 3),
    ] {
        let pixels = noise(w as usize * h as usize * bpp_bytes);
        let options = PngOptions {
            interlaced: true,
            filter: FilterType::Mixed,
            ..Default::default()
        };
        let encoded = encode_png_with(&pixels, w, h, layout, &options).unwrap();
        let (decoded, _) = decode_identity(&encoded);
        assert_eq!(decoded, pixels, "{layout:?} {w}x{h}");
    }
}

#[test]
fn interlaced_mono1_roundtrip() {
    let (w, h) = (19u32, 11u32);
    let row_bytes = PixelLayout::Mono1.row_bytes(w);
    // Mask the padding bits so the comparison is meaningful bit-for-bit.
    let mut pixels = noise(row_bytes * h as usize);
    let pad = (row_bytes * 8 - w as usize) as u32;
    for row in pixels.chunks_exact_mut(row_bytes) {
        let last = row.last_mut().unwrap();
        *last &= 0xffu8 << pad;
    }
    let options = PngOptions {
        interlaced: true,
        ..Default::default()
    };
    let encoded = encode_png_with(&pixels, w, h, PixelLayout::Mono1, &options).unwrap();
    let (decoded, _) = decode_identity(&encoded);
    assert_eq!(decoded, pixels);
}

#[test]
fn one_pixel_black() {
    let encoded = encode_png(&[0, 0, 0], 1, 1, PixelLayout::Rgb8).unwrap();
    let (decoded, info) = decode_identity(&encoded);
    assert_eq!(info.width, 1);
    assert_eq!(info.height, 1);
    assert_eq!(decoded, [0, 0, 0]);
}

#[test]
fn rgba_transparency_preserved() {
    // One opaque black pixel, one fully transparent, two partial.
    let pixels = [
        0, 0, 0, 255, 255, 255, 255, 0, 10, 20, 30, 128, 200, 100, 50, 1,
    ];
    let encoded = encode_png(&pixels, 2, 2, PixelLayout::Rgba8).unwrap();
    let (decoded, _) = decode_identity(&encoded);
    assert_eq!(decoded, pixels);
}

#[test]
fn strided_frame_roundtrip() {
    // Rows padded to 64 bytes; the padding must not leak into the output.
    let (w, h) = (12u32, 4u32);
    let stride = 64usize;
    let data = noise(stride * h as usize);
    let mut encoder = PngEncoder::new(w, h, PixelLayout::Rgb8, PngOptions::default()).unwrap();
    let encoded = encoder.encode(&Frame::new(&data, stride)).unwrap();
    let (decoded, _) = decode_identity(&encoded);
    let mut expected = Vec::new();
    for y in 0..h as usize {
        expected.extend_from_slice(&data[y * stride..y * stride + w as usize * 3]);
    }
    assert_eq!(decoded, expected);
}

#[test]
fn typed_pixel_roundtrip() {
    let pixels: Vec<RGBA8> = (0u8..20)
        .map(|i| RGBA8 {
            r: i * 3,
            g: 255 - i,
            b: i,
            a: 200,
        })
        .collect();
    let encoded = encode_png_pixels(&pixels, 5, 4).unwrap();
    let (decoded, info) = decode_identity(&encoded);
    assert_eq!(info.color_type, png::ColorType::Rgba);
    let bytes: Vec<u8> = pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
    assert_eq!(decoded, bytes);
}

// ── Error cases ──────────────────────────────────────────────────────

#[test]
fn zero_dimensions_rejected() {
    let result = encode_png(&[], 0, 4, PixelLayout::Gray8);
    assert!(matches!(result, Err(PngError::InvalidOption(_))));
}

#[test]
fn short_buffer_rejected() {
    let result = encode_png(&[0u8; 10], 4, 4, PixelLayout::Rgb8);
    assert!(matches!(result, Err(PngError::BufferTooSmall { .. })));
}

#[test]
fn missing_palette_rejected() {
    let mut encoder = PngEncoder::new(2, 2, PixelLayout::Pal8, PngOptions::default()).unwrap();
    let result = encoder.encode(&Frame::new(&[0u8; 4], 2));
    assert!(matches!(result, Err(PngError::MissingPalette)));
}

#[test]
fn density_out_of_range_rejected() {
    let options = PngOptions {
        density: Some(PixelDensity::Dpi(0x10001)),
        ..Default::default()
    };
    let result = PngEncoder::new(2, 2, PixelLayout::Gray8, options);
    assert!(matches!(result, Err(PngError::InvalidOption(_))));
}

#[test]
fn limits_reject_large() {
    let options = PngOptions {
        limits: Limits {
            max_pixels: Some(8),
            ..Default::default()
        },
        ..Default::default()
    };
    let result = PngEncoder::new(4, 4, PixelLayout::Gray8, options);
    assert!(matches!(result, Err(PngError::LimitExceeded(_))));
}
