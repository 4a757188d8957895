use std::fmt;

/// Stable identity of an uploaded image. Allocated from a per-store counter,
/// never reused within one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Webp => "WEBP",
        }
    }
}

#[derive(Clone)]
pub struct ImageRecord {
    pub id: ImageId,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub display_name: String,
    pub caption: String,
    pub pixel_width: u32,  // always > 0 once published
    pub pixel_height: u32, // always > 0 once published
}

impl fmt::Debug for ImageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRecord")
            .field("id", &self.id)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .field("display_name", &self.display_name)
            .field("caption", &self.caption)
            .field("pixel_width", &self.pixel_width)
            .field("pixel_height", &self.pixel_height)
            .finish()
    }
}

pub type Rgb = [u8; 3];

pub const HEADING_COLOR: Rgb = [44, 62, 80];
pub const MUTED_COLOR: Rgb = [100, 100, 100];
pub const BODY_COLOR: Rgb = [0, 0, 0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Rgb,
    /// Distance between consecutive baselines when the text wraps.
    pub leading: f32,
}

impl TextStyle {
    pub const fn new(font_size: f32, color: Rgb, leading: f32) -> Self {
        Self {
            font_size,
            color,
            leading,
        }
    }
}

/// One atomic unit of brief content. Built fresh for every export.
#[derive(Clone, Debug)]
pub enum Block<'a> {
    Title { title: String, subtitle: String },
    Section { title: String },
    Field { label: String, value: String },
    Image { record: &'a ImageRecord },
}

impl Block<'_> {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Title { .. } => BlockKind::Title,
            Block::Section { .. } => BlockKind::Section,
            Block::Field { .. } => BlockKind::Field,
            Block::Image { record } => BlockKind::Image(record.id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    Section,
    Field,
    Image(ImageId),
}

/// True when a value would render nothing (empty or whitespace-only).
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
