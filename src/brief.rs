use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;
use crate::layout::{LaidOutDocument, layout_blocks};
use crate::model::{Block, ImageRecord};
use crate::options::BriefOptions;
use crate::pdf::PdfBackend;

/// Snapshot of the questionnaire: field or radio-group name → current value.
/// A `null` value (an unchecked radio group) reads the same as a missing one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "BTreeMap<String, Option<String>>")]
pub struct FormState {
    values: BTreeMap<String, String>,
}

impl From<BTreeMap<String, Option<String>>> for FormState {
    fn from(raw: BTreeMap<String, Option<String>>) -> Self {
        Self {
            values: raw
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v)))
                .collect(),
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value of `name`, or `""` when the field was never filled in.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }
}

enum FieldSource {
    Text(&'static str),
    /// Radio group whose raw value is printed as-is.
    Radio(&'static str),
    /// Radio group whose value is replaced by a display label; unknown values are blank.
    Choice {
        name: &'static str,
        labels: &'static [(&'static str, &'static str)],
    },
}

struct FieldSpec {
    label: &'static str,
    source: FieldSource,
}

impl FieldSpec {
    const fn text(label: &'static str, name: &'static str) -> Self {
        Self {
            label,
            source: FieldSource::Text(name),
        }
    }

    const fn radio(label: &'static str, name: &'static str) -> Self {
        Self {
            label,
            source: FieldSource::Radio(name),
        }
    }

    fn value(&self, form: &FormState) -> String {
        match &self.source {
            FieldSource::Text(name) | FieldSource::Radio(name) => form.get(name).to_string(),
            FieldSource::Choice { name, labels } => {
                let raw = form.get(name);
                labels
                    .iter()
                    .find(|(value, _)| *value == raw)
                    .map(|(_, label)| label.to_string())
                    .unwrap_or_default()
            }
        }
    }
}

struct StepSpec {
    title: &'static str,
    fields: &'static [FieldSpec],
}

const SCOPE_LABELS: &[(&str, &str)] = &[
    ("timeline", "Timeline Level (Global Look)"),
    ("group", "Group Level (Scene/Camera Consistency)"),
    ("clip", "Clip Level (Shot-Specific Look)"),
];

/// Questionnaire steps in document order.
const BRIEF_STEPS: &[StepSpec] = &[
    StepSpec {
        title: "Step 1: Scope of Adjustment",
        fields: &[
            FieldSpec {
                label: "Adjustment Level",
                source: FieldSource::Choice {
                    name: "scope",
                    labels: SCOPE_LABELS,
                },
            },
            FieldSpec::text("Scope Description", "scope-description"),
        ],
    },
    StepSpec {
        title: "Step 2: Image Components",
        fields: &[
            FieldSpec::radio("Exposure Preference", "exposure"),
            FieldSpec::text("Exposure Notes", "exposure-notes"),
            FieldSpec::radio("Tonal Contrast Preference", "tonal-contrast"),
            FieldSpec::text("Tonal Notes", "tonal-notes"),
            FieldSpec::text("Color Contrast Style", "color-contrast-style"),
            FieldSpec::text("Color Variety", "color-variety"),
            FieldSpec::radio("Color Balance Preference", "color-balance"),
            FieldSpec::text("Color Balance Notes", "color-balance-notes"),
            FieldSpec::radio("Saturation Preference", "saturation"),
            FieldSpec::text("Saturation Notes", "saturation-notes"),
        ],
    },
    StepSpec {
        title: "Step 3: Additional Notes",
        fields: &[FieldSpec::text("Additional Notes", "additional-notes")],
    },
];

/// The finished brief: its page layout and the serialized PDF.
#[derive(Debug, Clone)]
pub struct RenderedBrief {
    pub layout: LaidOutDocument,
    pub pdf: Vec<u8>,
}

impl RenderedBrief {
    pub fn page_count(&self) -> usize {
        self.layout.pages.len()
    }
}

pub struct DocumentBuilder<'o> {
    options: &'o BriefOptions,
    generated_on: NaiveDate,
}

impl<'o> DocumentBuilder<'o> {
    pub fn new(options: &'o BriefOptions) -> Self {
        Self {
            options,
            generated_on: chrono::Local::now().date_naive(),
        }
    }

    pub fn generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    /// Block sequence for one export: title, each step's section and fields,
    /// then one image block per record in store order.
    pub fn blocks<'r>(&self, form: &FormState, images: &'r [ImageRecord]) -> Vec<Block<'r>> {
        let mut blocks = vec![Block::Title {
            title: self.options.title.clone(),
            subtitle: format!("Generated: {}", self.generated_on.format("%-m/%-d/%Y")),
        }];
        for step in BRIEF_STEPS {
            blocks.push(Block::Section {
                title: step.title.to_string(),
            });
            for field in step.fields {
                blocks.push(Block::Field {
                    label: field.label.to_string(),
                    value: field.value(form),
                });
            }
        }
        blocks.extend(images.iter().map(|record| Block::Image { record }));
        blocks
    }

    /// Render the whole brief in one pass. Fails only when the PDF backend
    /// cannot be prepared, in which case nothing is produced.
    pub fn build(&self, form: &FormState, images: &[ImageRecord]) -> Result<RenderedBrief> {
        let t0 = Instant::now();

        let backend = PdfBackend::new(self.options)?;
        let t_backend = t0.elapsed();

        let blocks = self.blocks(form, images);
        let layout = layout_blocks(&blocks, backend.metrics(), self.options);
        let t_layout = t0.elapsed();

        let pdf = backend.render(&layout, images)?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing: backend={:.1}ms, layout={:.1}ms, pdf={:.1}ms, total={:.1}ms ({} blocks, {} images, {} pages, {} bytes)",
            t_backend.as_secs_f64() * 1000.0,
            (t_layout - t_backend).as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            blocks.len(),
            images.len(),
            layout.pages.len(),
            pdf.len(),
        );

        Ok(RenderedBrief { layout, pdf })
    }
}
