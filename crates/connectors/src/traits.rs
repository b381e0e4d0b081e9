//! Source trait definition

use chrono::{DateTime, Utc};
use siphon_protocol::{LogEvent, SourceKind};

use crate::error::ConnectorError;

/// Requested time range for one fetch
///
/// Both bounds are optional: a missing `end` means "now", a missing `start`
/// lets the source pick (checkpoint or initial lookback). Sources without a
/// time axis, such as the file tailer, ignore the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl FetchWindow {
    /// Everything new since the source's own checkpoint
    pub fn latest() -> Self {
        Self::default()
    }

    /// Explicit `[start, end)` range
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Trait for pull-based log sources
///
/// A source is polled once per cycle. Implementations keep their own resume
/// state (checkpoint, file offset) behind interior mutability so the same
/// instance can be shared with a spawned fetch task.
pub trait Source: Send + Sync {
    /// Configured instance name (e.g. "jira_cloud")
    fn name(&self) -> &str;

    /// Which kind of origin this source reads
    fn kind(&self) -> SourceKind;

    /// Whether the source is usable; invalid sources are excluded at startup
    fn validate(&self) -> bool;

    /// Retrieve new events in source order
    fn fetch(
        &self,
        window: FetchWindow,
    ) -> impl std::future::Future<Output = Result<Vec<LogEvent>, ConnectorError>> + Send;
}
