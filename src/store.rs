use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{ImageId, ImageRecord};

#[derive(Debug, Clone)]
pub enum UploadSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A user-selected file: its name, declared MIME type and readable content.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub source: UploadSource,
}

impl UploadFile {
    /// Path-backed upload; the MIME type is inferred from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mime_type = image::ImageFormat::from_path(path)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            mime_type,
            source: UploadSource::Path(path.to_path_buf()),
        }
    }

    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            source: UploadSource::Bytes(data),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// An upload that has been read and decoded but not yet published to a store.
#[derive(Debug, Clone)]
pub struct DecodedUpload {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Decodes the whole payload; a readable header alone does not prove the
/// image is usable.
fn probe_dimensions(name: &str, data: &[u8]) -> Result<(u32, u32)> {
    let decoded = image::load_from_memory(data).map_err(|source| Error::Decode {
        name: name.to_string(),
        source,
    })?;
    let (w, h) = (decoded.width(), decoded.height());
    if w == 0 || h == 0 {
        return Err(Error::Decode {
            name: name.to_string(),
            source: image::ImageError::Decoding(image::error::DecodingError::new(
                image::error::ImageFormatHint::Unknown,
                "image has no pixels",
            )),
        });
    }
    Ok((w, h))
}

/// Read and decode one upload. Non-image MIME types yield `Ok(None)`.
///
/// Two suspension points, in order: reading the payload, then decoding it on
/// the blocking pool to learn its natural size. Nothing is published here.
pub async fn decode_upload(file: UploadFile) -> Result<Option<DecodedUpload>> {
    if !file.is_image() {
        log::debug!("Skipping {} ({}): not an image", file.name, file.mime_type);
        return Ok(None);
    }

    let data = match file.source {
        UploadSource::Path(path) => tokio::fs::read(&path).await?,
        UploadSource::Bytes(data) => data,
    };

    let name = file.name;
    let (name, data, dims) = tokio::task::spawn_blocking(move || {
        let dims = probe_dimensions(&name, &data);
        (name, data, dims)
    })
    .await?;
    let (pixel_width, pixel_height) = dims?;

    Ok(Some(DecodedUpload {
        name,
        mime_type: file.mime_type,
        data,
        pixel_width,
        pixel_height,
    }))
}

/// Ordered collection of uploaded images; insertion order is document order.
#[derive(Debug, Default)]
pub struct ImageStore {
    records: Vec<ImageRecord>,
    next_id: u64,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append a decoded upload under a fresh id.
    pub fn publish(&mut self, upload: DecodedUpload) -> ImageId {
        self.next_id += 1;
        let id = ImageId(self.next_id);
        log::debug!(
            "Added {id} {} ({}x{}, {} bytes)",
            upload.name,
            upload.pixel_width,
            upload.pixel_height,
            upload.data.len()
        );
        self.records.push(ImageRecord {
            id,
            mime_type: upload.mime_type,
            data: upload.data,
            display_name: upload.name,
            caption: String::new(),
            pixel_width: upload.pixel_width,
            pixel_height: upload.pixel_height,
        });
        id
    }

    /// Decode `file` and append it. `Ok(None)` for non-image files.
    pub async fn add(&mut self, file: UploadFile) -> Result<Option<ImageId>> {
        Ok(decode_upload(file).await?.map(|upload| self.publish(upload)))
    }

    /// Add files in selection order. A file that fails to read or decode is
    /// logged and skipped; the rest of the batch still proceeds.
    pub async fn add_batch(&mut self, files: Vec<UploadFile>) -> Vec<ImageId> {
        let mut added = Vec::with_capacity(files.len());
        for file in files {
            let name = file.name.clone();
            match self.add(file).await {
                Ok(Some(id)) => added.push(id),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping upload {name}: {e}"),
            }
        }
        added
    }

    /// Remove the record with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: ImageId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before != self.records.len()
    }

    /// Replace the caption of `id` in place. Unknown ids are a no-op.
    pub fn update_caption(&mut self, id: ImageId, text: impl Into<String>) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.caption = text.into();
                true
            }
            None => false,
        }
    }
}
