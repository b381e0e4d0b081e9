//! Canonical log event
//!
//! `LogEvent` is the normalized, source-agnostic record. Sources construct it
//! through `LogEventBuilder`; after `build()` it is read-only.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "timestamp": "2024-01-01T00:00:00.000000Z",
//!   "source": "file",
//!   "category": "auth",
//!   "severity": "error",
//!   "message": "login failed",
//!   "event_id": null,
//!   "user": null,
//!   "ip_address": null,
//!   "raw_data": {}
//! }
//! ```

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;
use crate::source::SourceKind;

/// Source-specific fields carried alongside the canonical ones
pub type RawData = serde_json::Map<String, serde_json::Value>;

/// Category used when a source does not provide one
const DEFAULT_CATEGORY: &str = "unknown";

/// Sub-second digits kept on event timestamps (the wire format carries micros)
const TIMESTAMP_DIGITS: u16 = 6;

/// Normalized audit/log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(with = "timestamp_serde")]
    timestamp: DateTime<Utc>,
    source: SourceKind,
    category: String,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    message: String,
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default)]
    raw_data: RawData,
}

impl LogEvent {
    /// Start building an event for the given source kind
    pub fn builder(source: SourceKind) -> LogEventBuilder {
        LogEventBuilder::new(source)
    }

    /// When the event happened
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Which kind of source produced the event
    #[inline]
    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Free-text category
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Canonical severity
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Human-readable message
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source-assigned identifier, if any
    #[inline]
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    /// Acting user, if known
    #[inline]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Remote network address, if known
    #[inline]
    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    /// Source-specific extension fields
    #[inline]
    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }
}

/// Builder for `LogEvent`
///
/// Unset timestamps default to the moment `build()` is called.
#[derive(Debug, Clone)]
pub struct LogEventBuilder {
    timestamp: Option<DateTime<Utc>>,
    source: SourceKind,
    category: String,
    severity: Severity,
    message: String,
    event_id: Option<String>,
    user: Option<String>,
    ip_address: Option<String>,
    raw_data: RawData,
}

impl LogEventBuilder {
    /// Create a builder with defaults (`unknown` category, `info` severity)
    pub fn new(source: SourceKind) -> Self {
        Self {
            timestamp: None,
            source,
            category: DEFAULT_CATEGORY.to_string(),
            severity: Severity::Info,
            message: String::new(),
            event_id: None,
            user: None,
            ip_address: None,
            raw_data: RawData::new(),
        }
    }

    #[must_use]
    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn event_id(mut self, id: Option<String>) -> Self {
        self.event_id = id;
        self
    }

    #[must_use]
    pub fn user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    #[must_use]
    pub fn ip_address(mut self, addr: Option<String>) -> Self {
        self.ip_address = addr;
        self
    }

    #[must_use]
    pub fn raw_data(mut self, raw: RawData) -> Self {
        self.raw_data = raw;
        self
    }

    /// Finish the event
    ///
    /// The timestamp is truncated to microseconds.
    pub fn build(self) -> LogEvent {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        LogEvent {
            timestamp: timestamp.trunc_subsecs(TIMESTAMP_DIGITS),
            source: self.source,
            category: self.category,
            severity: self.severity,
            message: self.message,
            event_id: self.event_id,
            user: self.user,
            ip_address: self.ip_address,
            raw_data: self.raw_data,
        }
    }
}

mod timestamp_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::time::{format_timestamp, parse_timestamp};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
