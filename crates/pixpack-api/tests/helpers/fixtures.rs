//! Test fixtures: PNG and JPEG images generated in memory.

use std::io::Cursor;

use axum_test::multipart::Part;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// PNG with an alpha channel and a gradient, so it is not trivially compressible.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 11 % 256) as u8, (y * 7 % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 5 % 256) as u8, (y * 3 % 256) as u8, 90])
    });
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// PNG signature followed by garbage: sniffs as PNG, fails to decode.
pub fn create_corrupt_png() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(b"definitely not an IHDR chunk");
    data
}

/// Minimal GIF89a header: sniffs as `image/gif`.
pub fn create_test_gif() -> Vec<u8> {
    let mut data = b"GIF89a".to_vec();
    data.extend_from_slice(&[1, 0, 1, 0, 0, 0, 0, 0x3B]);
    data
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode fixture");
    buf
}

/// File part with a client-declared type that the server ignores.
pub fn file_part(filename: &str, data: Vec<u8>) -> Part {
    Part::bytes(data)
        .file_name(filename.to_string())
        .mime_type("application/octet-stream")
}

pub fn dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).expect("Failed to decode image");
    (img.width(), img.height())
}
