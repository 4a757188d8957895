mod cursor;
mod text;

pub use cursor::{LayoutState, PageCursor};
pub use text::{MeasuredText, TextMeasurer, wrap_text};

use crate::imaging::{self, ScaledSize};
use crate::model::{
    BODY_COLOR, Block, BlockKind, HEADING_COLOR, ImageFormat, ImageId, ImageRecord, MUTED_COLOR,
    TextStyle, is_blank,
};
use crate::options::BriefOptions;

pub const TITLE_STYLE: TextStyle = TextStyle::new(20.0, HEADING_COLOR, 18.0);
pub const SUBTITLE_STYLE: TextStyle = TextStyle::new(11.0, MUTED_COLOR, 24.0);
pub const SECTION_STYLE: TextStyle = TextStyle::new(14.0, HEADING_COLOR, 14.0);
pub const FIELD_STYLE: TextStyle = TextStyle::new(11.0, BODY_COLOR, 14.0);
pub const IMAGE_NAME_STYLE: TextStyle = TextStyle::new(10.0, MUTED_COLOR, 14.0);
pub const CAPTION_STYLE: TextStyle = TextStyle::new(10.0, BODY_COLOR, 12.0);

/// Space a section header reserves so it is never stranded at the page foot.
const SECTION_RESERVE: f32 = 26.0;
const FIELD_PADDING: f32 = 8.0;
/// Gap from the bottom edge of an image to the display-name baseline.
const IMAGE_NAME_GAP: f32 = 12.0;
const CAPTION_PADDING: f32 = 8.0;

/// A drawing instruction in top-down page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawItem {
    Text {
        x: f32,
        baseline: f32,
        style: TextStyle,
        text: String,
    },
    Image {
        id: ImageId,
        format: ImageFormat,
        x: f32,
        top: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageContent {
    pub items: Vec<DrawItem>,
}

impl PageContent {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Text { text, .. } => Some(text.as_str()),
            DrawItem::Image { .. } => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawItem> {
        self.items
            .iter()
            .filter(|item| matches!(item, DrawItem::Image { .. }))
    }
}

/// Where a rendered block landed. `height` is the space reserved for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockPlacement {
    pub kind: BlockKind,
    pub page: usize,
    pub top: f32,
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct LaidOutDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub bottom_limit: f32,
    pub pages: Vec<PageContent>,
    pub placements: Vec<BlockPlacement>,
}

/// Renders blocks one at a time: measure, reserve, emit, advance.
pub struct BlockRenderer<'m, M: TextMeasurer + ?Sized> {
    measurer: &'m M,
    cursor: PageCursor,
    margin_left: f32,
    content_width: f32,
    image_width: f32,
    fallback_image_size: (u32, u32),
    placements: Vec<BlockPlacement>,
}

impl<'m, M: TextMeasurer + ?Sized> BlockRenderer<'m, M> {
    pub fn new(measurer: &'m M, options: &BriefOptions) -> Self {
        let (_, page_height) = options.page_size();
        Self {
            measurer,
            cursor: PageCursor::new(
                page_height,
                options.margins.top,
                options.margins.bottom,
                options.first_baseline,
            ),
            margin_left: options.margins.left,
            content_width: options.content_width(),
            image_width: options.image_width,
            fallback_image_size: options.fallback_image_size,
            placements: Vec::new(),
        }
    }

    pub fn state(&self) -> LayoutState {
        self.cursor.state()
    }

    /// Render one block. Returns `None` when the block produces no output.
    pub fn render(&mut self, block: &Block) -> Option<BlockPlacement> {
        let placement = match block {
            Block::Title { title, subtitle } => self.render_title(title, subtitle),
            Block::Section { title } => self.render_section(title),
            Block::Field { label, value } => self.render_field(label, value)?,
            Block::Image { record } => self.render_image(record),
        };
        self.placements.push(placement);
        Some(placement)
    }

    fn text(&mut self, baseline: f32, style: TextStyle, text: impl Into<String>) {
        self.cursor.emit(DrawItem::Text {
            x: self.margin_left,
            baseline,
            style,
            text: text.into(),
        });
    }

    fn reserve(&mut self, kind: BlockKind, needed: f32) -> BlockPlacement {
        let top = self.cursor.ensure_space(needed);
        BlockPlacement {
            kind,
            page: self.cursor.page_index(),
            top,
            height: needed,
        }
    }

    fn render_title(&mut self, title: &str, subtitle: &str) -> BlockPlacement {
        let height = TITLE_STYLE.leading + SUBTITLE_STYLE.leading;
        let placement = self.reserve(BlockKind::Title, height);
        let y = placement.top;
        self.text(y, TITLE_STYLE, title);
        self.text(y + TITLE_STYLE.leading, SUBTITLE_STYLE, subtitle);
        self.cursor.advance(height);
        placement
    }

    fn render_section(&mut self, title: &str) -> BlockPlacement {
        let placement = self.reserve(BlockKind::Section, SECTION_RESERVE);
        self.text(placement.top, SECTION_STYLE, title);
        self.cursor.advance(SECTION_STYLE.leading);
        placement
    }

    fn render_field(&mut self, label: &str, value: &str) -> Option<BlockPlacement> {
        if is_blank(value) {
            return None;
        }
        let value = self
            .measurer
            .measure(value.trim(), &FIELD_STYLE, self.content_width);
        let height = FIELD_STYLE.leading + value.height() + FIELD_PADDING;

        let placement = self.reserve(BlockKind::Field, height);
        let y = placement.top;
        self.text(y, FIELD_STYLE, format!("{label}:"));
        for (i, line) in value.lines.into_iter().enumerate() {
            let baseline = y + FIELD_STYLE.leading + i as f32 * value.line_height;
            self.text(baseline, FIELD_STYLE, line);
        }
        self.cursor.advance(height);
        Some(placement)
    }

    fn scaled(&self, record: &ImageRecord) -> ScaledSize {
        imaging::scale(
            record.pixel_width,
            record.pixel_height,
            self.image_width,
            self.fallback_image_size,
        )
    }

    fn render_image(&mut self, record: &ImageRecord) -> BlockPlacement {
        let size = self.scaled(record);
        let caption = (!is_blank(&record.caption)).then(|| {
            self.measurer
                .measure(record.caption.trim(), &CAPTION_STYLE, self.content_width)
        });
        let caption_h = caption
            .as_ref()
            .map(|c| c.height() + CAPTION_PADDING)
            .unwrap_or(0.0);
        let height = size.height + IMAGE_NAME_GAP + IMAGE_NAME_STYLE.leading + caption_h;

        let placement = self.reserve(BlockKind::Image(record.id), height);
        let y = placement.top;
        self.cursor.emit(DrawItem::Image {
            id: record.id,
            format: imaging::detect_format(&record.data),
            x: self.margin_left,
            top: y,
            width: size.width,
            height: size.height,
        });
        let name_baseline = y + size.height + IMAGE_NAME_GAP;
        self.text(name_baseline, IMAGE_NAME_STYLE, record.display_name.as_str());
        if let Some(caption) = caption {
            let first = name_baseline + IMAGE_NAME_STYLE.leading;
            for (i, line) in caption.lines.into_iter().enumerate() {
                self.text(first + i as f32 * caption.line_height, CAPTION_STYLE, line);
            }
        }
        self.cursor.advance(height);
        placement
    }

    pub fn finish(self, page_width: f32) -> LaidOutDocument {
        let state = self.cursor.state();
        LaidOutDocument {
            page_width,
            page_height: state.page_height,
            bottom_limit: state.bottom_limit(),
            pages: self.cursor.into_pages(),
            placements: self.placements,
        }
    }
}

/// Lay out `blocks` in order onto fixed-size pages.
pub fn layout_blocks<M: TextMeasurer + ?Sized>(
    blocks: &[Block],
    measurer: &M,
    options: &BriefOptions,
) -> LaidOutDocument {
    let mut renderer = BlockRenderer::new(measurer, options);
    let mut skipped = 0usize;
    for block in blocks {
        if renderer.render(block).is_none() {
            skipped += 1;
        }
    }
    let (page_width, _) = options.page_size();
    let doc = renderer.finish(page_width);
    log::debug!(
        "layout: {} blocks ({} blank) → {} pages",
        blocks.len(),
        skipped,
        doc.pages.len()
    );
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontMetrics;

    #[test]
    fn placements_carry_their_block_kind() {
        let record = ImageRecord {
            id: ImageId(3),
            mime_type: "image/png".to_string(),
            data: Vec::new(),
            display_name: "still.png".to_string(),
            caption: "cooler".to_string(),
            pixel_width: 400,
            pixel_height: 300,
        };
        let blocks = [
            Block::Title {
                title: "Brief".to_string(),
                subtitle: "Generated: 1/1/2025".to_string(),
            },
            Block::Section {
                title: "Step 1".to_string(),
            },
            Block::Field {
                label: "Notes".to_string(),
                value: "warmer".to_string(),
            },
            Block::Image { record: &record },
        ];
        let font = FontMetrics::helvetica();
        let mut renderer = BlockRenderer::new(&font, &BriefOptions::default());

        for block in &blocks {
            let placement = renderer.render(block).unwrap();
            assert_eq!(placement.kind, block.kind());
        }
        let doc = renderer.finish(595.28);
        let kinds: Vec<BlockKind> = doc.placements.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Title,
                BlockKind::Section,
                BlockKind::Field,
                BlockKind::Image(ImageId(3)),
            ]
        );
    }
}
