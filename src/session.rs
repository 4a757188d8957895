use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::brief::FormState;
use crate::export_brief;
use crate::model::ImageId;
use crate::options::BriefOptions;
use crate::store::{ImageStore, UploadFile};
use crate::view::{ImageCardView, image_cards};

/// User-triggered events, processed strictly one at a time.
#[derive(Debug)]
pub enum BriefCommand {
    AddFiles { files: Vec<UploadFile> },
    SetField { name: String, value: String },
    CaptionChanged { id: ImageId, text: String },
    RemoveClicked { id: ImageId },
    Export { output_path: PathBuf },
}

/// Updates sent back to the front end.
#[derive(Debug, Clone)]
pub enum BriefUpdate {
    ImagesChanged { cards: Vec<ImageCardView> },
    ExportComplete { path: PathBuf, page_count: usize },
    Error { message: String },
}

/// Owns the image store and form snapshot for one editing session.
pub struct BriefSession {
    store: ImageStore,
    form: FormState,
    options: BriefOptions,
}

impl BriefSession {
    pub fn new(options: BriefOptions) -> Self {
        Self {
            store: ImageStore::new(),
            form: FormState::new(),
            options,
        }
    }

    pub fn with_form(mut self, form: FormState) -> Self {
        self.form = form;
        self
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Apply one command and return the updates it produces.
    pub async fn handle(&mut self, cmd: BriefCommand) -> Vec<BriefUpdate> {
        match cmd {
            BriefCommand::AddFiles { files } => {
                if self.store.add_batch(files).await.is_empty() {
                    return Vec::new();
                }
                vec![self.images_changed()]
            }
            BriefCommand::SetField { name, value } => {
                self.form.set(name, value);
                Vec::new()
            }
            BriefCommand::CaptionChanged { id, text } => {
                if self.store.update_caption(id, text) {
                    vec![self.images_changed()]
                } else {
                    Vec::new()
                }
            }
            BriefCommand::RemoveClicked { id } => {
                if self.store.remove(id) {
                    vec![self.images_changed()]
                } else {
                    Vec::new()
                }
            }
            BriefCommand::Export { output_path } => vec![self.export(output_path).await],
        }
    }

    fn images_changed(&self) -> BriefUpdate {
        BriefUpdate::ImagesChanged {
            cards: image_cards(&self.store),
        }
    }

    async fn export(&self, output_path: PathBuf) -> BriefUpdate {
        match export_brief(&self.form, &self.store, &self.options, &output_path).await {
            Ok(brief) => BriefUpdate::ExportComplete {
                path: output_path,
                page_count: brief.page_count(),
            },
            Err(e) => {
                log::error!("Export to {} failed: {e}", output_path.display());
                BriefUpdate::Error {
                    message: format!("Failed to create the PDF: {e}"),
                }
            }
        }
    }
}

/// Drain commands until the sender side closes, forwarding every update.
pub async fn worker_task(
    mut session: BriefSession,
    mut command_rx: mpsc::UnboundedReceiver<BriefCommand>,
    update_tx: mpsc::UnboundedSender<BriefUpdate>,
) -> BriefSession {
    while let Some(cmd) = command_rx.recv().await {
        for update in session.handle(cmd).await {
            if update_tx.send(update).is_err() {
                log::debug!("Update receiver dropped");
            }
        }
    }
    session
}
