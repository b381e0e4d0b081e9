//! Pipeline error types

use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every configured source was rejected at startup
    #[error("no valid sources configured")]
    NoValidSources,
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
