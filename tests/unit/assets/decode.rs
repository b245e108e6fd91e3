use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_pixels() {
    let buf = png_bytes(2, 1, vec![10, 20, 30, 255, 200, 100, 0, 255]);
    let pixels = decode_image(&buf).unwrap();
    assert_eq!((pixels.width(), pixels.height()), (2, 1));
    assert_eq!(pixels.as_bytes(), &[10, 20, 30, 255, 200, 100, 0, 255]);
}

#[test]
fn translucent_pixels_flatten_over_white() {
    let buf = png_bytes(2, 1, vec![0, 0, 0, 0, 0, 0, 0, 128]);
    let pixels = decode_image(&buf).unwrap();
    assert_eq!(pixels.as_bytes()[..4], [255, 255, 255, 255]);
    let half = ((255u16 * 127 + 127) / 255) as u8;
    assert_eq!(pixels.as_bytes()[4..], [half, half, half, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn media_kind_follows_extension() {
    assert_eq!(MediaKind::detect(Path::new("a/b.png")), MediaKind::Image);
    assert_eq!(MediaKind::detect(Path::new("photo.JPG")), MediaKind::Image);
    assert_eq!(MediaKind::detect(Path::new("clip.mp4")), MediaKind::Video);
    assert_eq!(MediaKind::detect(Path::new("noext")), MediaKind::Video);
}
