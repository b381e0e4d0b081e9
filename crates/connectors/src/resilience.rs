//! Resilience utilities for sources
//!
//! Backoff computation and an injectable sleeper so retry cadence can be
//! observed in tests without waiting in real time.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default max retries for rate-limited or transient failures
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base delay for exponential backoff
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 2000;

/// Default upper bound of the random jitter added to every wait
pub const DEFAULT_JITTER_MAX_MS: u64 = 500;

/// Longest server-requested wait honoured before a retry
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

/// Resilience configuration for a source
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum retries per page (attempts = retries + 1)
    pub max_retries: u32,
    /// Base delay for exponential backoff (doubles each retry)
    pub retry_base_delay_ms: u64,
    /// Jitter drawn uniformly from `[0, jitter_max_ms]`
    pub jitter_max_ms: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            jitter_max_ms: DEFAULT_JITTER_MAX_MS,
        }
    }
}

impl ResilienceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Total attempts allowed for one request
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Get retry delay for retry N (exponential backoff, no jitter)
    pub fn retry_delay(&self, retry: u32) -> Duration {
        let delay_ms = self.retry_base_delay_ms.saturating_mul(1 << retry.min(6)); // cap at 64x
        Duration::from_millis(delay_ms)
    }

    /// Wait before retry N
    ///
    /// A server-provided `Retry-After` replaces the exponential delay; jitter
    /// is added in both cases.
    pub fn backoff_delay(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let base = retry_after.unwrap_or_else(|| self.retry_delay(retry));
        base + self.jitter()
    }

    fn jitter(&self) -> Duration {
        if self.jitter_max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::rng().random_range(0..=self.jitter_max_ms);
        Duration::from_millis(ms)
    }
}

/// Parse a numeric `Retry-After` header value (seconds, possibly fractional)
///
/// Values beyond `MAX_RETRY_AFTER`, including ones too large for a
/// `Duration`, are clamped to it.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    if secs.is_nan() || secs < 0.0 {
        return None;
    }
    let wait = Duration::try_from_secs_f64(secs).unwrap_or(MAX_RETRY_AFTER);
    Some(wait.min(MAX_RETRY_AFTER))
}

/// Something that can wait
///
/// Sources sleep through this trait between retries.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
