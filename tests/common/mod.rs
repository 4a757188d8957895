#![allow(dead_code)]

use std::io::Cursor;

use brief_pdf::{ImageId, ImageRecord};
use image::{ImageFormat, Rgba, RgbaImage};

fn encode(img: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .write_to(&mut out, format)
            .expect("encode jpeg"),
        _ => img.write_to(&mut out, format).expect("encode image"),
    }
    out.into_inner()
}

fn gradient(width: u32, height: u32, alpha: u8) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, alpha])
    })
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height, 255), ImageFormat::Png)
}

pub fn translucent_png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height, 96), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height, 255), ImageFormat::Jpeg)
}

pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height, 255), ImageFormat::WebP)
}

/// Record built directly, bypassing decode; layout never reads the pixels.
pub fn record(id: u64, width: u32, height: u32, caption: &str) -> ImageRecord {
    ImageRecord {
        id: ImageId(id),
        mime_type: "image/png".to_string(),
        data: Vec::new(),
        display_name: format!("shot-{id}.png"),
        caption: caption.to_string(),
        pixel_width: width,
        pixel_height: height,
    }
}

/// Number of page objects in a serialized PDF.
pub fn pdf_page_count(pdf: &[u8]) -> usize {
    let text = String::from_utf8_lossy(pdf);
    text.matches("/Type /Page").count() - text.matches("/Type /Pages").count()
}

pub fn pdf_contains(pdf: &[u8], needle: &str) -> bool {
    String::from_utf8_lossy(pdf).contains(needle)
}

/// Deterministic xorshift generator for property sweeps.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1)
    }

    pub fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next() % (hi - lo)
    }
}
