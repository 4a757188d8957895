mod common;

use std::path::PathBuf;

use brief_pdf::layout::DrawItem;
use brief_pdf::{
    BlockKind, BriefOptions, DocumentBuilder, Error, FONT_ENV, FontMetrics, FormState,
    ImageStore, PageFormat, UploadFile, export_brief,
};
use chrono::NaiveDate;

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A TrueType font on this machine, from the env override or a common install path.
fn system_font() -> Option<PathBuf> {
    std::env::var_os(FONT_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

fn builder(options: &BriefOptions) -> DocumentBuilder<'_> {
    DocumentBuilder::new(options).generated_on(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
}

async fn store_with(files: Vec<UploadFile>) -> ImageStore {
    let mut store = ImageStore::new();
    store.add_batch(files).await;
    store
}

#[tokio::test]
async fn single_scope_answer_and_captioned_image_fit_on_one_page() {
    let mut form = FormState::new();
    form.set("scope", "timeline");
    let mut store = store_with(vec![UploadFile::from_bytes(
        "grade.png",
        "image/png",
        common::png_bytes(400, 300),
    )])
    .await;
    let id = store.records()[0].id;
    store.update_caption(id, "too warm");

    let options = BriefOptions::default();
    let brief = builder(&options).build(&form, store.records()).unwrap();

    assert_eq!(brief.page_count(), 1);
    let page = &brief.layout.pages[0];
    let texts: Vec<&str> = page.texts().collect();
    assert_eq!(
        texts,
        vec![
            "Color Grading Brief",
            "Generated: 1/2/2025",
            "Step 1: Scope of Adjustment",
            "Adjustment Level:",
            "Timeline Level (Global Look)",
            "Step 2: Image Components",
            "Step 3: Additional Notes",
            "grade.png",
            "too warm",
        ]
    );

    let sizes: Vec<(f32, f32)> = page
        .images()
        .filter_map(|item| match item {
            DrawItem::Image { width, height, .. } => Some((*width, *height)),
            DrawItem::Text { .. } => None,
        })
        .collect();
    assert_eq!(sizes, vec![(240.0, 180.0)]);

    assert_eq!(common::pdf_page_count(&brief.pdf), 1);
    assert!(brief.pdf.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn images_follow_store_order_and_removed_ones_are_absent() {
    let mut store = store_with(vec![
        UploadFile::from_bytes("one.png", "image/png", common::png_bytes(20, 10)),
        UploadFile::from_bytes("two.png", "image/png", common::png_bytes(20, 10)),
        UploadFile::from_bytes("three.png", "image/png", common::png_bytes(20, 10)),
    ])
    .await;
    let removed = store.records()[1].id;
    assert!(store.remove(removed));

    let options = BriefOptions::default();
    let brief = builder(&options)
        .build(&FormState::new(), store.records())
        .unwrap();

    let image_kinds: Vec<BlockKind> = brief
        .layout
        .placements
        .iter()
        .map(|p| p.kind)
        .filter(|k| matches!(k, BlockKind::Image(_)))
        .collect();
    let expected: Vec<BlockKind> = store.records().iter().map(|r| BlockKind::Image(r.id)).collect();
    assert_eq!(image_kinds, expected);
    assert!(!image_kinds.contains(&BlockKind::Image(removed)));

    let names: Vec<&str> = brief
        .layout
        .pages
        .iter()
        .flat_map(|p| p.texts())
        .filter(|t| t.ends_with(".png"))
        .collect();
    assert_eq!(names, vec!["one.png", "three.png"]);
}

#[tokio::test]
async fn jpeg_passes_through_and_alpha_gets_soft_mask() {
    let store = store_with(vec![
        UploadFile::from_bytes("a.jpg", "image/jpeg", common::jpeg_bytes(64, 48)),
        UploadFile::from_bytes("b.png", "image/png", common::translucent_png_bytes(32, 32)),
        UploadFile::from_bytes("c.webp", "image/webp", common::webp_bytes(40, 20)),
    ])
    .await;
    assert_eq!(store.len(), 3);

    let options = BriefOptions::default();
    let brief = builder(&options)
        .build(&FormState::new(), store.records())
        .unwrap();

    assert!(common::pdf_contains(&brief.pdf, "/DCTDecode"));
    assert!(common::pdf_contains(&brief.pdf, "/SMask"));
    assert!(common::pdf_contains(&brief.pdf, "/Im3"));
}

#[tokio::test]
async fn pdf_page_count_matches_layout() {
    let files = (0..8)
        .map(|i| UploadFile::from_bytes(format!("frame-{i}.png"), "image/png", common::png_bytes(300, 400)))
        .collect();
    let store = store_with(files).await;
    let mut form = FormState::new();
    form.set("additional-notes", "Match the dailies. ".repeat(80));

    let options = BriefOptions {
        page: PageFormat::Letter,
        ..BriefOptions::default()
    };
    let brief = builder(&options).build(&form, store.records()).unwrap();

    assert!(brief.page_count() > 2);
    assert_eq!(common::pdf_page_count(&brief.pdf), brief.page_count());
    assert_eq!(brief.layout.page_width, 612.0);
}

#[tokio::test]
async fn unloadable_font_aborts_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("brief.pdf");
    let options = BriefOptions {
        font_path: Some(dir.path().join("missing.ttf")),
        ..BriefOptions::default()
    };

    let result = export_brief(&FormState::new(), &ImageStore::new(), &options, &output).await;

    assert!(matches!(result, Err(Error::Backend(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn export_writes_the_rendered_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("brief.pdf");
    let mut form = FormState::new();
    form.set("exposure", "Brighter");
    form.set("exposure-notes", "Lift the mids a touch.");

    let brief = export_brief(&form, &ImageStore::new(), &BriefOptions::default(), &output)
        .await
        .unwrap();

    let written = std::fs::read(&output).unwrap();
    assert_eq!(written, brief.pdf);
    let texts: Vec<&str> = brief.layout.pages[0].texts().collect();
    assert!(texts.contains(&"Exposure Preference:"));
    assert!(texts.contains(&"Lift the mids a touch."));
}

#[test]
fn truetype_font_is_subset_and_embedded() {
    let Some(font_path) = system_font() else {
        eprintln!("no TrueType font found; set {FONT_ENV} to run this test");
        return;
    };

    let font = FontMetrics::load(&font_path).unwrap();
    let helvetica = FontMetrics::helvetica();
    let width = font.text_width("Too warm", 11.0);
    assert!(width > 0.0);
    assert_ne!(width, helvetica.text_width("Too warm", 11.0));

    let mut form = FormState::new();
    form.set("scope", "clip");
    form.set("additional-notes", "Skin \u{2713} shadows \u{2014} keep the teal");
    let options = BriefOptions {
        font_path: Some(font_path),
        ..BriefOptions::default()
    };
    let brief = builder(&options).build(&form, &[]).unwrap();

    assert_eq!(brief.page_count(), 1);
    assert_eq!(common::pdf_page_count(&brief.pdf), 1);
    for key in ["/FontFile2", "/Type0", "/ToUnicode", "/Identity-H"] {
        assert!(common::pdf_contains(&brief.pdf, key), "missing {key}");
    }
    assert!(!common::pdf_contains(&brief.pdf, "/WinAnsiEncoding"));
}
