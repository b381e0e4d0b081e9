//! Siphon - Pipeline
//!
//! The polling loop that connects sources to the delivery channel.
//!
//! # Architecture
//!
//! ```text
//! [Sources]                  [Orchestrator]                     [Channel]
//!    Jira ──┐                                                 
//!           ├──→ fetch (task + timeout) ──→ render ──→ pending ──→ TCP ──→ Collector
//!    File ──┘                                          (bounded)
//! ```
//!
//! # Key Design
//!
//! - **One cycle at a time**: sources are fetched one after another
//! - **Isolation**: each fetch runs in its own task; a panic, error or timeout
//!   only costs that source its turn
//! - **At-least-once, in memory**: payloads the channel refused are retried
//!   first on the next cycle, up to `max_pending`
//! - **Cooperative shutdown**: `CancellationToken` stops the loop between cycles
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(FileCheckpointStore::new(&config.checkpoint.path));
//! let sources = build_sources(&config, store)?;
//! let channel = DeliveryChannel::new(ChannelConfig::from(&config.forwarder));
//! let orchestrator = Orchestrator::new(
//!     sources,
//!     Renderer::from_config(&config.format),
//!     channel,
//!     config.pipeline.clone(),
//! );
//! orchestrator.run(cancel).await;
//! ```

mod builder;
mod error;
mod orchestrator;
mod report;

pub use builder::build_sources;
pub use error::{PipelineError, Result};
pub use orchestrator::Orchestrator;
pub use report::{CycleReport, SourceReport};
