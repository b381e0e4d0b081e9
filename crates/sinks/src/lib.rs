//! Siphon - Sinks
//!
//! Outbound delivery for rendered payloads.
//!
//! ```text
//! [Orchestrator] --payload--> [DeliveryChannel] --"line\n"--> [Collector]
//!                                    │
//!                                    └──(on success)──> TapSink
//! ```
//!
//! The channel owns a single TCP connection, reconnects lazily on the next
//! send and never queues: a payload that cannot be written is reported back
//! to the caller as `false`.

/// Newline-delimited TCP delivery channel
pub mod forwarder;

pub use forwarder::{
    ChannelConfig, ChannelMetrics, ChannelState, DeliveryChannel, ForwarderError, MetricsSnapshot,
};
