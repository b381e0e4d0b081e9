//! Tap entry and sink trait

use chrono::{DateTime, Utc};

/// Copy of one successfully delivered line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapEntry {
    /// When the write completed
    pub timestamp: DateTime<Utc>,
    /// Payload as written, without the trailing newline
    pub data: String,
}

impl TapEntry {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            data: data.into(),
        }
    }
}

/// Receiver of delivered lines
pub trait TapSink: Send + Sync {
    fn record(&self, entry: &TapEntry);
}
