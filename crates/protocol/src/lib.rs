//! Siphon Protocol - Canonical event types
//!
//! This crate provides the types every other Siphon component agrees on:
//! - `LogEvent` - The normalized audit record produced by sources
//! - `Severity` - The five canonical severity levels
//! - `SourceKind` - Which kind of source produced an event
//! - `parse_timestamp` - Lenient ISO-8601 parsing into UTC instants
//!
//! # Design Principles
//!
//! - **Source-agnostic**: Sources normalize into `LogEvent`, renderers only see `LogEvent`
//! - **Always valid**: Timestamps are absolute instants, severity is always canonical
//! - **Immutable**: Events are built once by a source and never mutated afterwards

mod error;
mod event;
mod severity;
mod source;
mod time;

pub use error::ProtocolError;
pub use event::{LogEvent, LogEventBuilder, RawData};
pub use severity::Severity;
pub use source::SourceKind;
pub use time::{format_timestamp, parse_timestamp};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod event_test;
#[cfg(test)]
mod severity_test;
#[cfg(test)]
mod source_test;
