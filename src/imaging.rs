use crate::model::ImageFormat;

/// A byte pattern that must appear at `offset` in the payload.
struct Magic {
    offset: usize,
    bytes: &'static [u8],
}

/// Payload signatures in match order; the first entry whose patterns all
/// match wins. Anything unmatched embeds as the default format.
const SIGNATURES: &[(&[Magic], ImageFormat)] = &[
    (
        &[Magic {
            offset: 0,
            bytes: b"\x89PNG\r\n\x1a\n",
        }],
        ImageFormat::Png,
    ),
    (
        &[
            Magic {
                offset: 0,
                bytes: b"RIFF",
            },
            Magic {
                offset: 8,
                bytes: b"WEBP",
            },
        ],
        ImageFormat::Webp,
    ),
];

pub const DEFAULT_FORMAT: ImageFormat = ImageFormat::Jpeg;

fn magic_matches(data: &[u8], magic: &Magic) -> bool {
    data.get(magic.offset..magic.offset + magic.bytes.len()) == Some(magic.bytes)
}

/// Embedding format inferred from the payload signature.
pub fn detect_format(data: &[u8]) -> ImageFormat {
    SIGNATURES
        .iter()
        .find(|(magics, _)| magics.iter().all(|m| magic_matches(data, m)))
        .map(|&(_, format)| format)
        .unwrap_or(DEFAULT_FORMAT)
}

pub(crate) fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

/// Number of colour components declared by a baseline/progressive JPEG frame header.
pub(crate) fn jpeg_components(data: &[u8]) -> Option<u8> {
    if !is_jpeg(data) {
        return None;
    }
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        if marker == 0xD9 || marker == 0xDA {
            break;
        }
        let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if (marker == 0xC0 || marker == 0xC1 || marker == 0xC2) && i + 9 < data.len() {
            return Some(data[i + 9]);
        }
        i += 2 + len;
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledSize {
    pub width: f32,
    pub height: f32,
}

/// Fit an image to `target_width`, keeping its aspect ratio. Zero natural
/// dimensions are replaced by the matching `fallback` dimension.
pub fn scale(
    natural_width: u32,
    natural_height: u32,
    target_width: f32,
    fallback: (u32, u32),
) -> ScaledSize {
    let w = if natural_width == 0 { fallback.0 } else { natural_width };
    let h = if natural_height == 0 { fallback.1 } else { natural_height };
    // a zero fallback would divide by zero; treat the image as square
    let ratio = if w == 0 { 1.0 } else { h as f64 / w as f64 };
    ScaledSize {
        width: target_width,
        height: (target_width as f64 * ratio).round() as f32,
    }
}
