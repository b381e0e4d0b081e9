//! Error types for sources

use thiserror::Error;

use crate::checkpoint::CheckpointError;

/// Errors that can occur while building or running a source
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Failed to build the per-cycle HTTP session
    #[error("failed to initialize source session: {0}")]
    Init(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single record could not be mapped to an event
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Source-specific configuration is unusable
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Unknown source type
    #[error("unknown source type: {0}")]
    UnknownSource(String),

    /// Checkpoint store failure
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

impl ConnectorError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }
}
