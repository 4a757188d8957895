use std::path::PathBuf;

/// Environment variable naming a TrueType/OpenType font to embed instead of
/// the built-in Helvetica.
pub const FONT_ENV: &str = "BRIEF_PDF_FONT";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageFormat {
    A4,
    Letter,
    Custom { width: f32, height: f32 },
}

impl PageFormat {
    /// Page size in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (595.28, 841.89),
            PageFormat::Letter => (612.0, 792.0),
            PageFormat::Custom { width, height } => (*width, *height),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "Letter",
            PageFormat::Custom { .. } => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 40.0,
            bottom: 40.0,
            left: 40.0,
            right: 40.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BriefOptions {
    pub page: PageFormat,
    pub margins: Margins,
    /// Baseline of the first line on page one (below the top margin).
    pub first_baseline: f32,
    pub image_width: f32,
    /// Substituted for a missing/zero natural width or height.
    pub fallback_image_size: (u32, u32),
    pub title: String,
    pub font_path: Option<PathBuf>,
}

impl Default for BriefOptions {
    fn default() -> Self {
        Self {
            page: PageFormat::A4,
            margins: Margins::default(),
            first_baseline: 60.0,
            image_width: 240.0,
            fallback_image_size: (240, 160),
            title: "Color Grading Brief".to_string(),
            font_path: None,
        }
    }
}

impl BriefOptions {
    /// Apply environment configuration. An explicitly set font path wins.
    pub fn with_env(mut self) -> Self {
        if self.font_path.is_none()
            && let Ok(val) = std::env::var(FONT_ENV)
        {
            let trimmed = val.trim();
            if !trimmed.is_empty() {
                self.font_path = Some(PathBuf::from(trimmed));
            }
        }
        self
    }

    pub fn page_size(&self) -> (f32, f32) {
        self.page.dimensions_pt()
    }

    /// Page width minus left and right margins; the wrapping width for text.
    pub fn content_width(&self) -> f32 {
        let (w, _) = self.page_size();
        w - self.margins.left - self.margins.right
    }
}
