mod images;

use std::collections::{HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{FontMetrics, register_font};
use crate::layout::{DrawItem, LaidOutDocument};
use crate::model::{ImageId, ImageRecord};
use crate::options::BriefOptions;

use images::embed_image;

const FONT_NAME: &str = "F1";

/// The document-drawing backend: font metrics for layout plus PDF serialization.
pub struct PdfBackend {
    metrics: FontMetrics,
}

impl PdfBackend {
    /// Prepare the backend. A configured font that cannot be loaded makes the
    /// backend unavailable; callers must not produce a partial document.
    pub fn new(options: &BriefOptions) -> Result<Self, Error> {
        let metrics = match &options.font_path {
            Some(path) => FontMetrics::load(path)?,
            None => FontMetrics::helvetica(),
        };
        log::debug!("PDF backend ready with font {}", metrics.name());
        Ok(Self { metrics })
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn render(&self, doc: &LaidOutDocument, images: &[ImageRecord]) -> Result<Vec<u8>, Error> {
        render(doc, images, &self.metrics)
    }
}

fn used_chars(doc: &LaidOutDocument) -> HashSet<char> {
    doc.pages
        .iter()
        .flat_map(|p| p.texts())
        .flat_map(|t| t.chars())
        .collect()
}

/// Serialize laid-out pages. Layout coordinates run top-down; PDF runs bottom-up.
fn render(
    doc: &LaidOutDocument,
    images: &[ImageRecord],
    metrics: &FontMetrics,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: font
    let font = register_font(
        &mut pdf,
        metrics,
        FONT_NAME.to_string(),
        &mut alloc,
        &used_chars(doc),
    );
    let t_fonts = t0.elapsed();

    // Phase 1b: embed each referenced image once
    let records: HashMap<ImageId, &ImageRecord> = images.iter().map(|r| (r.id, r)).collect();
    let mut image_pdf_names: HashMap<ImageId, String> = HashMap::new();
    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    for item in doc.pages.iter().flat_map(|p| p.items.iter()) {
        let DrawItem::Image { id, format, .. } = item else {
            continue;
        };
        if image_pdf_names.contains_key(id) {
            continue;
        }
        let Some(record) = records.get(id) else {
            log::warn!("Layout references unknown image {id}");
            continue;
        };
        let xobj_ref = alloc();
        if embed_image(&mut pdf, xobj_ref, record, *format, &mut alloc) {
            let pdf_name = format!("Im{}", image_xobjects.len() + 1);
            image_xobjects.push((pdf_name.clone(), xobj_ref));
            image_pdf_names.insert(*id, pdf_name);
        }
    }
    let t_images = t0.elapsed();

    // Phase 2: content streams
    let page_h = doc.page_height;
    let mut all_contents: Vec<Content> = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let mut content = Content::new();
        for item in &page.items {
            match item {
                DrawItem::Text {
                    x,
                    baseline,
                    style,
                    text,
                } => {
                    if text.is_empty() {
                        continue;
                    }
                    let [r, g, b] = style.color;
                    content
                        .set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
                        .begin_text()
                        .set_font(Name(font.pdf_name.as_bytes()), style.font_size)
                        .next_line(*x, page_h - baseline)
                        .show(Str(&font.encode(text)))
                        .end_text();
                }
                DrawItem::Image {
                    id,
                    x,
                    top,
                    width,
                    height,
                    ..
                } => {
                    let y_bottom = page_h - top - height;
                    if let Some(pdf_name) = image_pdf_names.get(id) {
                        content.save_state();
                        content.transform([*width, 0.0, 0.0, *height, *x, y_bottom]);
                        content.x_object(Name(pdf_name.as_bytes()));
                        content.restore_state();
                    } else {
                        content
                            .set_fill_gray(0.5)
                            .rect(*x, y_bottom, *width, *height)
                            .fill_nonzero()
                            .set_fill_gray(0.0);
                    }
                }
            }
        }
        all_contents.push(content);
    }
    let t_layout = t0.elapsed();

    // Phase 3: page tree
    let n = all_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, doc.page_width, doc.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        resources.fonts().pair(Name(font.pdf_name.as_bytes()), font.font_ref);
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let t_assembly = t0.elapsed();
    log::info!(
        "Render phases: font_embed={:.1}ms, images={:.1}ms, content={:.1}ms, assembly={:.1}ms",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_layout - t_images).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
