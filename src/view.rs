//! Presentation of the uploaded image list, derived from store state only.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::model::ImageId;
use crate::store::ImageStore;

pub const NOTES_LABEL: &str = "Image notes:";
pub const CAPTION_PLACEHOLDER: &str = "What component of this image do you like or not like?";
pub const REMOVE_LABEL: &str = "Remove Image";

/// Everything a front end needs to draw one uploaded image card.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCardView {
    pub id: ImageId,
    pub display_name: String,
    /// `data:` URI of the original payload, usable as an `<img src>`.
    pub preview_src: String,
    pub caption: String,
    pub notes_label: &'static str,
    pub caption_placeholder: &'static str,
    pub remove_label: &'static str,
}

/// Re-run after every store mutation; never mutates anything itself.
pub fn image_cards(store: &ImageStore) -> Vec<ImageCardView> {
    store
        .records()
        .iter()
        .map(|record| ImageCardView {
            id: record.id,
            display_name: record.display_name.clone(),
            preview_src: format!(
                "data:{};base64,{}",
                record.mime_type,
                STANDARD.encode(&record.data)
            ),
            caption: record.caption.clone(),
            notes_label: NOTES_LABEL,
            caption_placeholder: CAPTION_PLACEHOLDER,
            remove_label: REMOVE_LABEL,
        })
        .collect()
}
