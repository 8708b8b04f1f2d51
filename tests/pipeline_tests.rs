use image::{Rgba, RgbaImage};
use lsb_mark::{
    EncodeOptions, StegoError, Steganographer,
    bits::{pack, unpack},
    codec::{ImageCodec, PngCodec},
    decode, encode,
    steganography::{capacity, embed, extract, max_message_len},
    watermark::{Footprint, Watermark, WatermarkStyle},
};
use rand::RngCore;

/// 生成带随机 RGB 像素的不透明图像
fn random_image(width: u32, height: u32) -> RgbaImage {
    let mut raw = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw);
    RgbaImage::from_fn(width, height, |x, y| {
        let i = ((y * width + x) * 4) as usize;
        Rgba([raw[i], raw[i + 1], raw[i + 2], 255])
    })
}

fn gray_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([100, 100, 100, 255]))
}

const LENIENT: EncodeOptions = EncodeOptions { strict: false };
const STRICT: EncodeOptions = EncodeOptions { strict: true };

#[test]
fn small_image_round_trip() -> anyhow::Result<()> {
    let encoded = encode(random_image(10, 10), "Hi", "wm", LENIENT)?;
    assert_eq!(encoded.bits_written, 32);
    assert!(!encoded.is_truncated());
    assert_eq!(decode(&encoded.image), "Hi");
    Ok(())
}

#[test]
fn single_pixel_yields_empty_message() -> anyhow::Result<()> {
    let encoded = encode(random_image(1, 1), "A", "wm", LENIENT)?;
    assert_eq!(encoded.bits_written, 1);
    assert_eq!(encoded.bits_required, 24);
    assert!(encoded.is_truncated());
    assert_eq!(decode(&encoded.image), "");
    Ok(())
}

#[test]
fn empty_message_decodes_to_empty() -> anyhow::Result<()> {
    let encoded = encode(random_image(64, 64), "", "wm", LENIENT)?;
    assert_eq!(encoded.bits_written, 16);
    assert_eq!(decode(&encoded.image), "");
    Ok(())
}

#[test]
fn embedded_nul_terminates_early() -> anyhow::Result<()> {
    let encoded = encode(random_image(64, 64), "A\0B", "wm", LENIENT)?;
    assert_eq!(decode(&encoded.image), "A");
    Ok(())
}

#[test]
fn bit_i_lands_in_red_lsb_of_pixel_i() {
    let original = random_image(8, 8);
    let mut pix = original.clone();
    let bits = pack("ok");
    embed(&mut pix, &bits);

    for (i, (before, after)) in original.pixels().zip(pix.pixels()).enumerate() {
        assert_eq!(before.0[1..], after.0[1..], "only red may change");
        if i < bits.len() {
            assert_eq!((after.0[0] & 1) != 0, bits[i]);
            assert_eq!(before.0[0] & 0xFE, after.0[0] & 0xFE);
        } else {
            assert_eq!(before.0[0], after.0[0]);
        }
    }
    assert_eq!(extract(&pix).len(), capacity(&pix));
}

#[test]
fn capacity_boundary() -> anyhow::Result<()> {
    // 10x4 = 40 像素，最多 3 个字符加结束标记
    let carrier = random_image(10, 4);
    assert_eq!(max_message_len(&carrier), 3);

    let fits = encode(carrier.clone(), "abc", "wm", STRICT)?;
    assert!(!fits.is_truncated());
    assert_eq!(decode(&fits.image), "abc");

    // 多一个字符时只丢掉第二个结束字节，读取仍在第一个零字节处停止
    let over = encode(carrier.clone(), "abcd", "wm", LENIENT)?;
    assert_eq!(over.bits_written, 40);
    assert!(over.is_truncated());
    assert_eq!(decode(&over.image), "abcd");
    assert!(matches!(
        encode(carrier.clone(), "abcd", "wm", STRICT),
        Err(StegoError::CapacityExceeded {
            required: 48,
            available: 40
        })
    ));

    // 截断落在字符中间时，只能恢复完整的前缀
    let cut = encode(random_image(7, 4), "abcd", "wm", LENIENT)?;
    assert_eq!(cut.bits_written, 28);
    assert_eq!(decode(&cut.image), "abc");

    Ok(())
}

#[test]
fn decode_is_idempotent() -> anyhow::Result<()> {
    let encoded = encode(random_image(40, 40), "same every time", "wm", LENIENT)?;
    let snapshot = encoded.image.clone();

    let first = decode(&encoded.image);
    let second = decode(&encoded.image);
    assert_eq!(first, second);
    assert_eq!(first, "same every time");
    assert_eq!(snapshot, encoded.image);
    Ok(())
}

#[test]
fn watermark_text_is_not_part_of_payload() -> anyhow::Result<()> {
    let encoded = encode(random_image(300, 200), "Hi", "SECRET", STRICT)?;
    let message = decode(&encoded.image);
    assert_eq!(message, "Hi");
    assert!(!message.contains("SECRET"));
    Ok(())
}

#[test]
fn watermark_placement_and_blending() {
    let original = gray_image(200, 100);
    let mut pix = original.clone();
    let mark = Watermark::new("WM");

    let footprint = mark.footprint(200, 100).expect("watermark should be visible");
    assert_eq!(
        footprint,
        Footprint {
            x: 175,
            y: 79,
            width: 15,
            height: 11
        }
    );

    mark.draw(&mut pix);

    // 字形外侧的描边：黑色 0.5 混合
    assert_eq!(pix.get_pixel(175, 80).0, [50, 50, 50, 255]);
    // 字形边缘：先描边再填充
    assert_eq!(pix.get_pixel(176, 80).0, [214, 214, 214, 255]);

    let mut changed = 0;
    for (x, y, px) in pix.enumerate_pixels() {
        if px != original.get_pixel(x, y) {
            changed += 1;
            assert!(x >= footprint.x && x < footprint.x + footprint.width);
            assert!(y >= footprint.y && y < footprint.y + footprint.height);
        }
    }
    assert!(changed > 0);
}

#[test]
fn watermark_shape_ignores_pixel_contents() {
    let mark = Watermark::new("abc 123");
    let changed = |original: &RgbaImage| {
        let mut pix = original.clone();
        mark.draw(&mut pix);
        original
            .enumerate_pixels()
            .zip(pix.pixels())
            .filter(|((_, _, before), after)| before != after)
            .map(|((x, y, _), _)| (x, y))
            .collect::<Vec<_>>()
    };

    let plain = gray_image(400, 120);
    let mut with_payload = plain.clone();
    embed(&mut with_payload, &pack(&"\u{ff}".repeat(4000)));

    assert_eq!(changed(&plain), changed(&with_payload));
}

#[test]
fn watermark_is_clipped_on_tiny_images() {
    assert_eq!(Watermark::new("wm").footprint(10, 10), None);
    assert_eq!(Watermark::new("wm").footprint(1, 1), None);

    let original = random_image(10, 10);
    let mut pix = original.clone();
    Watermark::new("wm").draw(&mut pix);
    assert_eq!(pix, original);
}

#[test]
fn narrow_image_gets_no_watermark() -> anyhow::Result<()> {
    // 宽度 19 时字号为 0，什么都不画
    let original = gray_image(19, 40);
    let mut pix = original.clone();
    Watermark::new("W").draw(&mut pix);
    assert_eq!(pix, original);
    assert_eq!(Watermark::new("WWW").footprint(19, 40), None);

    // 载荷铺满整幅图像也能完整恢复
    let message = "x".repeat(max_message_len(&original));
    assert_eq!(message.len(), 93);
    let encoded = encode(original.clone(), &message, "WWW", LENIENT)?;
    assert!(!encoded.is_truncated());
    assert_eq!(decode(&encoded.image), message);

    let strict = encode(original, &message, "WWW", STRICT)?;
    assert_eq!(decode(&strict.image), message);
    Ok(())
}

#[test]
fn custom_style_moves_and_recolours_watermark() {
    let original = gray_image(200, 100);
    let mut pix = original.clone();
    let style = WatermarkStyle {
        margin: 0,
        outline_width: 0,
        fill: [255, 0, 0],
        fill_opacity: 1.0,
        ..WatermarkStyle::default()
    };
    let mark = Watermark::with_style("W", style);

    // 没有边距和描边时，字形紧贴右下角
    assert_eq!(
        mark.footprint(200, 100),
        Some(Footprint {
            x: 193,
            y: 90,
            width: 6,
            height: 9
        })
    );

    mark.draw(&mut pix);
    assert_eq!(pix.get_pixel(193, 90).0, [255, 0, 0, 255]);
    assert!(
        pix.pixels()
            .all(|px| *px == Rgba([100, 100, 100, 255]) || *px == Rgba([255, 0, 0, 255]))
    );
    assert_ne!(pix, original);
}

#[test]
fn watermark_can_corrupt_payload() -> anyhow::Result<()> {
    // 载荷铺满整幅图像，水印区域内的比特会被改写
    let carrier = gray_image(200, 50);
    let message = "\u{ff}".repeat(max_message_len(&carrier));

    let encoded = encode(carrier.clone(), &message, "WM", LENIENT)?;
    assert!(!encoded.is_truncated());
    assert_ne!(decode(&encoded.image), message);

    match encode(carrier, &message, "WM", STRICT) {
        Err(StegoError::WatermarkOverlap {
            payload_end,
            watermark_start,
        }) => {
            assert_eq!(payload_end, 9999);
            assert_eq!(watermark_start, 29 * 200 + 175);
        }
        other => panic!("expected WatermarkOverlap, got {other:?}"),
    }
    Ok(())
}

#[test]
fn wide_characters_lenient_vs_strict() -> anyhow::Result<()> {
    let message = "a\u{3b1}b";

    let lenient = encode(random_image(32, 32), message, "wm", LENIENT)?;
    assert_eq!(lenient.bits_required, 8 + 10 + 8 + 16);
    assert_ne!(decode(&lenient.image), message);

    assert!(matches!(
        encode(random_image(32, 32), message, "wm", STRICT),
        Err(StegoError::UnencodableChar { ch: '\u{3b1}', index: 1 })
    ));
    Ok(())
}

#[test]
fn steganographer_round_trip_through_png() -> anyhow::Result<()> {
    let carrier = PngCodec.encode(&random_image(64, 48))?;
    let stego = Steganographer::new(PngCodec).strict(true);

    let (bytes, encoded) = stego.encode(&carrier, "through the codec", "lsb")?;
    assert!(!encoded.is_truncated());
    assert_eq!(PngCodec.decode(&bytes)?, encoded.image);
    assert_eq!(stego.decode(&bytes)?, "through the codec");

    assert!(matches!(
        stego.decode(b"definitely not an image"),
        Err(StegoError::Codec(_))
    ));
    Ok(())
}

#[test]
fn unpack_of_raw_extraction_matches_decode() {
    let pix = random_image(16, 16);
    assert_eq!(unpack(&extract(&pix)), decode(&pix));
}
