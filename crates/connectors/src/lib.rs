//! Siphon - Connectors
//!
//! Pull-based sources that fetch audit/log records and normalize them into
//! `LogEvent`s for the forwarding pipeline.
//!
//! # Available Sources
//!
//! - **Jira** - Jira Cloud audit log (paginated, rate-limited, checkpointed)
//! - **File** - Local append-only log file (byte-offset tailing)
//!
//! # Design Principles
//!
//! - **Pull-based**: The pipeline polls each source once per cycle
//! - **Failures absorbed**: Remote errors are logged and partial results returned
//! - **Resumable**: Jira checkpoints persist across restarts via `CheckpointStore`
//! - **Simple interface**: Each source implements the `Source` trait
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use siphon_connectors::{FetchWindow, FileCheckpointStore, Source, SourceImpl};
//!
//! let store = Arc::new(FileCheckpointStore::new("state/checkpoints.json"));
//! let source = SourceImpl::from_config("jira", "jira", &raw_toml, store)?;
//! if source.validate() {
//!     let events = source.fetch(FetchWindow::latest()).await?;
//! }
//! ```

pub mod checkpoint;
pub mod config;
mod error;
mod file;
mod jira;
mod registry;
pub mod resilience;
mod traits;

// Re-exports
pub use checkpoint::{
    CheckpointError, CheckpointStore, FileCheckpointStore, MemoryCheckpointStore,
};
pub use config::{CategoryFilter, FileSourceConfig, JiraSourceConfig};
pub use error::ConnectorError;
pub use file::FileSource;
pub use jira::{JiraSource, severity_for_category};
pub use registry::{SourceImpl, available_sources};
pub use resilience::{ResilienceConfig, Sleeper, TokioSleeper};
pub use traits::{FetchWindow, Source};
