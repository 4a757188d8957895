mod brief;
mod error;
mod fonts;
pub mod imaging;
pub mod layout;
mod model;
mod options;
mod pdf;
pub mod session;
mod store;
pub mod view;

pub use brief::{DocumentBuilder, FormState, RenderedBrief};
pub use error::{Error, Result};
pub use fonts::FontMetrics;
pub use model::{Block, BlockKind, ImageFormat, ImageId, ImageRecord, Rgb, TextStyle, is_blank};
pub use options::{BriefOptions, FONT_ENV, Margins, PageFormat};
pub use pdf::PdfBackend;
pub use store::{DecodedUpload, ImageStore, UploadFile, UploadSource, decode_upload};

use std::path::Path;
use std::time::Instant;

/// Render the brief for `form` and `store` and write it to `output`.
pub async fn export_brief(
    form: &FormState,
    store: &ImageStore,
    options: &BriefOptions,
    output: &Path,
) -> Result<RenderedBrief> {
    let t0 = Instant::now();

    let brief = DocumentBuilder::new(options).build(form, store.records())?;
    let t_build = t0.elapsed();

    tokio::fs::write(output, &brief.pdf).await?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: build={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes, {} pages)",
        t_build.as_secs_f64() * 1000.0,
        (t_total - t_build).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        brief.pdf.len(),
        brief.page_count(),
    );

    Ok(brief)
}
