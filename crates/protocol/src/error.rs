//! Protocol error types
//!
//! Errors that can occur when building or decoding canonical events.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Timestamp string could not be resolved to an absolute instant
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Record was not a JSON object
    #[error("expected JSON object, got {0}")]
    NotAnObject(&'static str),

    /// JSON decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Create an invalid timestamp error
    #[inline]
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp(value.into())
    }

    /// Create a missing field error
    #[inline]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(field)
    }
}
