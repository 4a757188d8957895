use crate::fonts::FontMetrics;
use crate::model::TextStyle;

/// Text wrapped to a width, with the leading used between its baselines.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredText {
    pub lines: Vec<String>,
    pub line_height: f32,
}

impl MeasuredText {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

pub trait TextMeasurer {
    /// Advance width of `text` in points at `font_size`.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    fn measure(&self, text: &str, style: &TextStyle, max_width: f32) -> MeasuredText {
        MeasuredText {
            lines: wrap_text(self, text, style.font_size, max_width),
            line_height: style.leading,
        }
    }
}

impl TextMeasurer for FontMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        FontMetrics::text_width(self, text, font_size)
    }
}

/// Greedy word wrap. Explicit newlines start a new line (blank lines are kept);
/// a word wider than `max_width` on its own is broken between characters.
pub fn wrap_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let space_w = measurer.text_width(" ", font_size);

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_w: f32 = 0.0;

        for word in paragraph.split_whitespace() {
            let word_w = measurer.text_width(word, font_size);
            let proposed = if current.is_empty() {
                word_w
            } else {
                current_w + space_w + word_w
            };

            if proposed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_w = proposed;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_w = 0.0;
            }

            if word_w <= max_width {
                current.push_str(word);
                current_w = word_w;
                continue;
            }

            for ch in word.chars() {
                let mut buf = [0u8; 4];
                let ch_w = measurer.text_width(ch.encode_utf8(&mut buf), font_size);
                if !current.is_empty() && current_w + ch_w > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_w = 0.0;
                }
                current.push(ch);
                current_w += ch_w;
            }
        }

        lines.push(current);
    }

    lines
}
