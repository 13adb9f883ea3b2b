//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Batch-fatal errors. Per-job failures are reported through
/// [`crate::pipeline::JobError`] instead and never abort siblings.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Asset catalog error: {0}")]
    Asset(#[from] shorts_media::AssetError),

    #[error("Media tool error: {0}")]
    Ffmpeg(#[from] shorts_media::FfmpegError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
