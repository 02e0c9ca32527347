//! Error types for the diorama viewer

use thiserror::Error;

/// Main error type for the viewer
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Asset error: {path}: {reason}")]
    Asset { path: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Helper for loader failures that carry the offending path
    pub fn asset(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Error::Asset {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}
