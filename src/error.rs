use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode image {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    /// The document-drawing backend could not be prepared; no output is produced.
    #[error("PDF backend unavailable: {0}")]
    Backend(String),
    #[error("invalid form state: {0}")]
    Form(#[from] serde_json::Error),
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
