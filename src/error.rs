use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlockError {
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Script error: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure reported by an item's playback capability.
///
/// The engine never propagates these; they are logged and arbitration
/// carries on as if the call had succeeded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("media not ready: {0}")]
    NotReady(String),

    #[error("player detached")]
    Detached,
}

pub type Result<T> = std::result::Result<T, FlockError>;
