use std::io::Cursor;

use super::*;

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, vec![1u8, 2u8, 3u8, 255u8]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn encodes_and_decodes_base64_urls() {
    let url = encode_data_url("image/png", b"\x00\x01hello");
    assert!(url.starts_with("data:image/png;base64,"));
    let decoded = decode_data_url(&url).unwrap();
    assert_eq!(decoded.mime, "image/png");
    assert_eq!(decoded.bytes, b"\x00\x01hello");
}

#[test]
fn rejects_non_base64_forms() {
    assert!(decode_data_url("https://example.com/a.png").is_err());
    assert!(decode_data_url("data:text/plain,hello").is_err());
    assert!(decode_data_url("data:image/png;base64").is_err());
    assert!(decode_data_url("data:image/png;base64,@@@").is_err());
}

#[test]
fn sniffed_type_wins_over_declared() {
    let png = tiny_png();
    assert_eq!(sniff_image_mime(&png), Some("image/png"));
    let url = image_data_url(&png, Some("image/jpeg; charset=binary")).unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
}

#[test]
fn declared_image_type_is_used_when_sniffing_fails() {
    let url = image_data_url(b"opaque", Some("image/avif")).unwrap();
    assert!(url.starts_with("data:image/avif;base64,"));
}

#[test]
fn unknown_payloads_are_rejected() {
    assert!(image_data_url(b"<html></html>", Some("text/html")).is_err());
    assert!(image_data_url(b"", Some("image/png")).is_err());
}
