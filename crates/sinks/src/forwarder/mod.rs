//! Delivery Channel - newline-delimited TCP to a remote collector
//!
//! Owns one outbound connection to `host:port`. Every payload is written as a
//! single line (a `\n` is appended when missing).
//!
//! # Connection lifecycle
//!
//! ```text
//! Disconnected --connect ok--> Connected --write ok--> Connected
//!      ▲                           │
//!      └──── write error/timeout ──┘
//! ```
//!
//! A connect attempt is only made when at least `reconnect_interval` has
//! elapsed since the previous attempt. A send on a disconnected channel that
//! is throttled, or whose connect fails, returns `false` without writing.
//! There is no internal queue; retrying is the caller's business.
//!
//! # Example
//!
//! ```ignore
//! let channel = DeliveryChannel::new(ChannelConfig::new("siem.internal:514"));
//! channel.connect().await.ok();
//!
//! if !channel.send(b"CEF:0|...").await {
//!     // keep the payload and try again next cycle
//! }
//! channel.close().await;
//! ```

use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use siphon_config::ForwarderConfig;
use siphon_tap::{TapEntry, TapSink};
use socket2::{SockRef, TcpKeepalive};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::{Instant, timeout};

/// Runtime settings for the delivery channel
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Collector address (host:port)
    pub target: String,

    /// Connection timeout
    pub connection_timeout: Duration,

    /// Write timeout per payload
    pub write_timeout: Duration,

    /// Minimum time between two connect attempts
    pub reconnect_interval: Duration,

    /// TCP keep-alive enabled
    pub tcp_keepalive: bool,

    /// Idle time before keep-alive probes (only used if tcp_keepalive is true)
    pub tcp_keepalive_time: Duration,
}

impl ChannelConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            connection_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            reconnect_interval: Duration::from_secs(30),
            tcp_keepalive: true,
            tcp_keepalive_time: Duration::from_secs(60),
        }
    }

    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    #[must_use]
    pub fn with_tcp_keepalive(mut self, enabled: bool) -> Self {
        self.tcp_keepalive = enabled;
        self
    }

    #[must_use]
    pub fn with_tcp_keepalive_time(mut self, time: Duration) -> Self {
        self.tcp_keepalive_time = time;
        self
    }
}

impl From<&ForwarderConfig> for ChannelConfig {
    fn from(config: &ForwarderConfig) -> Self {
        Self::new(config.target.clone())
            .with_connection_timeout(config.connection_timeout)
            .with_write_timeout(config.write_timeout)
            .with_reconnect_interval(config.reconnect_interval)
            .with_tcp_keepalive(config.tcp_keepalive)
            .with_tcp_keepalive_time(config.tcp_keepalive_time)
    }
}

/// Counters for the delivery channel
#[derive(Debug, Default)]
pub struct ChannelMetrics {
    /// Payloads written successfully
    pub payloads_sent: AtomicU64,

    /// Payloads that could not be written
    pub payloads_failed: AtomicU64,

    /// Bytes written, newline included
    pub bytes_sent: AtomicU64,

    /// Connect attempts that passed the throttle
    pub connect_attempts: AtomicU64,

    /// Connect attempts that succeeded
    pub connects: AtomicU64,
}

impl ChannelMetrics {
    pub const fn new() -> Self {
        Self {
            payloads_sent: AtomicU64::new(0),
            payloads_failed: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            connect_attempts: AtomicU64::new(0),
            connects: AtomicU64::new(0),
        }
    }

    #[inline]
    fn record_sent(&self, byte_count: u64) {
        self.payloads_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    #[inline]
    fn record_failed(&self) {
        self.payloads_failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_connect_attempt(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_connect(&self) {
        self.connects.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            payloads_sent: self.payloads_sent.load(Ordering::Relaxed),
            payloads_failed: self.payloads_failed.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            connects: self.connects.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of channel metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub payloads_sent: u64,
    pub payloads_failed: u64,
    pub bytes_sent: u64,
    pub connect_attempts: u64,
    pub connects: u64,
}

/// Errors from the delivery channel
///
/// These stay inside the channel; `send` reports them as `false`.
#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    /// Connect attempt suppressed by the reconnect interval
    #[error("reconnect throttled for another {remaining:?}")]
    Throttled { remaining: Duration },

    /// Connection failed
    #[error("connection failed to {target}: {source}")]
    ConnectionFailed {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Write failed
    #[error("write failed: {0}")]
    WriteFailed(#[from] std::io::Error),

    /// Write did not complete in time
    #[error("write timed out")]
    Timeout,
}

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connected,
}

#[derive(Debug, Default)]
struct Connection {
    stream: Option<TcpStream>,
    last_attempt: Option<Instant>,
}

/// Outbound newline-delimited TCP channel
pub struct DeliveryChannel {
    config: ChannelConfig,

    /// Connection state; held across the write so sends serialize
    connection: Mutex<Connection>,

    metrics: Arc<ChannelMetrics>,

    /// Receives a copy of every line written
    tap: Option<Arc<dyn TapSink>>,
}

impl DeliveryChannel {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(Connection::default()),
            metrics: Arc::new(ChannelMetrics::new()),
            tap: None,
        }
    }

    /// Attach a tap that observes successfully written lines
    #[must_use]
    pub fn with_tap(mut self, tap: Arc<dyn TapSink>) -> Self {
        self.tap = Some(tap);
        self
    }

    pub fn target(&self) -> &str {
        &self.config.target
    }

    pub fn metrics(&self) -> &ChannelMetrics {
        &self.metrics
    }

    /// Shared handle to the counters, valid after the channel is dropped
    pub fn metrics_handle(&self) -> Arc<ChannelMetrics> {
        Arc::clone(&self.metrics)
    }

    pub async fn state(&self) -> ChannelState {
        if self.connection.lock().await.stream.is_some() {
            ChannelState::Connected
        } else {
            ChannelState::Disconnected
        }
    }

    /// Connect now if disconnected (subject to the reconnect throttle)
    pub async fn connect(&self) -> Result<(), ForwarderError> {
        let mut conn = self.connection.lock().await;
        if conn.stream.is_some() {
            return Ok(());
        }
        self.try_connect(&mut conn).await
    }

    /// Write one payload as a line
    ///
    /// Returns `true` only if the whole line was written.
    pub async fn send(&self, payload: &[u8]) -> bool {
        let mut conn = self.connection.lock().await;

        if conn.stream.is_none() {
            match self.try_connect(&mut conn).await {
                Ok(()) => {}
                Err(ForwarderError::Throttled { remaining }) => {
                    tracing::debug!(
                        target_addr = %self.config.target,
                        remaining_ms = remaining.as_millis() as u64,
                        "reconnect throttled, payload not sent"
                    );
                    self.metrics.record_failed();
                    return false;
                }
                Err(e) => {
                    tracing::warn!(
                        target_addr = %self.config.target,
                        error = %e,
                        "connect failed, payload not sent"
                    );
                    self.metrics.record_failed();
                    return false;
                }
            }
        }

        let line = as_line(payload);
        match self.write_line(&mut conn, &line).await {
            Ok(()) => {
                self.metrics.record_sent(line.len() as u64);
                if let Some(tap) = &self.tap {
                    let data = String::from_utf8_lossy(&line[..line.len() - 1]);
                    tap.record(&TapEntry::new(data));
                }
                true
            }
            Err(e) => {
                tracing::warn!(
                    target_addr = %self.config.target,
                    error = %e,
                    "write failed, connection dropped"
                );
                self.metrics.record_failed();
                false
            }
        }
    }

    /// Shut down the write half so the peer sees a clean end of stream
    pub async fn close(&self) {
        let mut conn = self.connection.lock().await;
        if let Some(mut stream) = conn.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!(error = %e, "error shutting down connection");
            }
        }

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            target_addr = %self.config.target,
            payloads_sent = snapshot.payloads_sent,
            payloads_failed = snapshot.payloads_failed,
            bytes_sent = snapshot.bytes_sent,
            connects = snapshot.connects,
            "delivery channel closed"
        );
    }

    async fn try_connect(&self, conn: &mut Connection) -> Result<(), ForwarderError> {
        let now = Instant::now();
        if let Some(last) = conn.last_attempt {
            let elapsed = now.duration_since(last);
            if elapsed < self.config.reconnect_interval {
                return Err(ForwarderError::Throttled {
                    remaining: self.config.reconnect_interval - elapsed,
                });
            }
        }
        conn.last_attempt = Some(now);
        self.metrics.record_connect_attempt();

        let stream = match timeout(
            self.config.connection_timeout,
            TcpStream::connect(&self.config.target),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(ForwarderError::ConnectionFailed {
                    target: self.config.target.clone(),
                    source: e,
                });
            }
            Err(_) => {
                return Err(ForwarderError::ConnectionFailed {
                    target: self.config.target.clone(),
                    source: std::io::Error::new(ErrorKind::TimedOut, "connection timed out"),
                });
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "failed to set TCP_NODELAY");
        }

        if self.config.tcp_keepalive {
            let keepalive = TcpKeepalive::new().with_time(self.config.tcp_keepalive_time);

            #[cfg(target_os = "linux")]
            let keepalive = keepalive.with_interval(self.config.tcp_keepalive_time);

            if let Err(e) = SockRef::from(&stream).set_tcp_keepalive(&keepalive) {
                tracing::debug!(error = %e, "failed to set TCP keep-alive");
            }
        }

        self.metrics.record_connect();
        tracing::info!(target_addr = %self.config.target, "connected to collector");

        conn.stream = Some(stream);
        Ok(())
    }

    /// Write with timeout; any failure drops the stream
    async fn write_line(&self, conn: &mut Connection, line: &[u8]) -> Result<(), ForwarderError> {
        let Some(stream) = conn.stream.as_mut() else {
            return Err(ForwarderError::WriteFailed(std::io::Error::new(
                ErrorKind::NotConnected,
                "no connection",
            )));
        };

        let result = timeout(self.config.write_timeout, async {
            stream.write_all(line).await?;
            stream.flush().await
        })
        .await;

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                conn.stream = None;
                Err(ForwarderError::WriteFailed(e))
            }
            Err(_) => {
                conn.stream = None;
                Err(ForwarderError::Timeout)
            }
        }
    }
}

/// Payload bytes terminated by exactly one trailing newline
fn as_line(payload: &[u8]) -> Vec<u8> {
    let mut line = Vec::with_capacity(payload.len() + 1);
    line.extend_from_slice(payload);
    if line.last() != Some(&b'\n') {
        line.push(b'\n');
    }
    line
}
