//! Siphon Tap - observation hook for delivered lines
//!
//! The delivery channel hands a `TapEntry` to an attached `TapSink` after
//! every successful write. Nothing here can slow down or fail a delivery:
//! sinks are synchronous, infallible and called under the channel lock.
//!
//! ```text
//! DeliveryChannel.send() --ok--> TapPoint.record(&entry)
//!                                    │
//!                                    ├──→ last N lines (replayed at shutdown)
//!                                    └──→ tracing echo (debug)
//! ```

mod sink;
pub mod tap_point;

pub use sink::{TapEntry, TapSink};
pub use tap_point::TapPoint;
