//! In-memory fixtures shared by unit tests.
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("encode test image");
    out.into_inner()
}

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub(crate) fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::WebP)
}

/// A PNG signature followed by garbage: declared as an image, never decodes.
pub(crate) fn corrupt_png_bytes() -> Vec<u8> {
    let mut bytes = png_bytes(32, 32);
    bytes.truncate(40);
    bytes
}

/// A little-endian TIFF header with one ASCII field `tag` in IFD0, the
/// layout of a raw EXIF block.
pub(crate) fn exif_tiff(tag: u16) -> Vec<u8> {
    let mut tiff = b"II*\0".to_vec();
    tiff.extend(8u32.to_le_bytes());
    tiff.extend(1u16.to_le_bytes());
    tiff.extend(tag.to_le_bytes());
    tiff.extend(2u16.to_le_bytes());
    tiff.extend(4u32.to_le_bytes());
    tiff.extend(*b"Abc\0");
    tiff.extend(0u32.to_le_bytes());
    tiff
}

/// A JPEG with an APP1 EXIF segment holding [`exif_tiff`]`(tag)`.
pub(crate) fn jpeg_with_exif(width: u32, height: u32, tag: u16) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height);
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend(exif_tiff(tag));

    let mut out = jpeg[..2].to_vec();
    out.extend([0xFF, 0xE1]);
    out.extend(((payload.len() + 2) as u16).to_be_bytes());
    out.extend(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}
