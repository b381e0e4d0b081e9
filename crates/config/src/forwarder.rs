//! Delivery channel configuration
//!
//! # Example
//!
//! ```toml
//! [forwarder]
//! target = "siem.internal:514"
//! connection_timeout = "5s"
//! write_timeout = "5s"
//! reconnect_interval = "30s"
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Outbound TCP connection to the collector
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Collector address (host:port)
    /// Required
    pub target: String,

    /// Connection timeout
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub connection_timeout: Duration,

    /// Write timeout per payload
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,

    /// Minimum time between two connection attempts
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub reconnect_interval: Duration,

    /// Enable TCP keep-alive probes
    /// Default: true
    pub tcp_keepalive: bool,

    /// Idle time before the first keep-alive probe
    /// Default: 60s
    #[serde(with = "humantime_serde")]
    pub tcp_keepalive_time: Duration,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            connection_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            reconnect_interval: Duration::from_secs(30),
            tcp_keepalive: true,
            tcp_keepalive_time: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForwarderConfig::default();
        assert!(config.target.is_empty());
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
        assert_eq!(config.write_timeout, Duration::from_secs(5));
        assert_eq!(config.reconnect_interval, Duration::from_secs(30));
        assert!(config.tcp_keepalive);
    }

    #[test]
    fn test_custom_values() {
        let toml = r#"
target = "10.0.0.5:6514"
reconnect_interval = "1m"
tcp_keepalive = false
"#;
        let config: ForwarderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.target, "10.0.0.5:6514");
        assert_eq!(config.reconnect_interval, Duration::from_secs(60));
        assert!(!config.tcp_keepalive);
        assert_eq!(config.write_timeout, Duration::from_secs(5));
    }
}
