use thiserror::Error;

/// Failure of a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend rejected the operation: {0}")]
    Backend(String),
}

/// Reasons a map file is refused on import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid map file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid map file: node id {0:?} is used more than once")]
    DuplicateNodeId(String),
}

/// Reasons an `imageData` value cannot be turned into image bytes.
#[derive(Debug, Error)]
pub enum ImageDataError {
    #[error("not a data url")]
    NotDataUrl,

    #[error("data url is not base64 encoded")]
    NotBase64,

    #[error("data url holds {0:?}, not an image")]
    NotImage(String),

    #[error("bad base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
