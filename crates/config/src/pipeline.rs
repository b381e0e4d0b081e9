//! Polling loop configuration
//!
//! # Example
//!
//! ```toml
//! [pipeline]
//! poll_interval = "60s"
//! error_backoff = "5s"
//! fetch_timeout = "5m"
//! max_pending = 10000
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Orchestrator cadence and limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Delay between the end of one cycle and the start of the next
    /// Default: 60s
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Delay after a cycle that failed outright
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub error_backoff: Duration,

    /// Upper bound on a single source fetch, backoff sleeps included
    /// Default: 5m
    #[serde(with = "humantime_serde")]
    pub fetch_timeout: Duration,

    /// Payloads kept in memory for redelivery after a failed send
    /// Default: 10000
    pub max_pending: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            error_backoff: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(300),
            max_pending: 10_000,
        }
    }
}
