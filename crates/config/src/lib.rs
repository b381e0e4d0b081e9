//! Siphon Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Only `[forwarder].target` and one source are required.
//!
//! # Parsing
//!
//! ```
//! use siphon_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str(
//!     "[forwarder]\ntarget = \"127.0.0.1:514\"\n[sources.app]\ntype = \"file\"\npath = \"/var/log/app.log\"",
//! )
//! .unwrap();
//! assert_eq!(config.enabled_sources(), vec!["app"]);
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [forwarder]
//! target = "siem.internal:514"
//!
//! [sources.app_log]
//! type = "file"
//! path = "/var/log/app/audit.log"
//! ```
//!
//! See `configs/example.toml` for all available options.

mod error;
mod format;
mod forwarder;
mod logging;
mod pipeline;
mod sources;
mod state;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use format::{FormatConfig, FormatType};
pub use forwarder::ForwarderConfig;
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use pipeline::PipelineConfig;
pub use sources::{RawSourceConfig, SourcesConfig};
pub use state::{CheckpointConfig, TapConfig};
pub use validation::KNOWN_SOURCE_TYPES;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Polling loop cadence
    pub pipeline: PipelineConfig,

    /// Wire format
    pub format: FormatConfig,

    /// Downstream collector connection
    pub forwarder: ForwarderConfig,

    /// Checkpoint persistence
    pub checkpoint: CheckpointConfig,

    /// Delivered-line observation hook
    pub tap: TapConfig,

    /// Named sources (Jira, file)
    pub sources: SourcesConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Names of enabled sources, sorted
    pub fn enabled_sources(&self) -> Vec<&str> {
        self.sources.enabled().map(|(name, _)| name.as_str()).collect()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const MINIMAL: &str = r#"
[forwarder]
target = "127.0.0.1:5140"

[sources.app]
type = "file"
path = "/var/log/app.log"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_str(MINIMAL).unwrap();
        assert_eq!(config.pipeline.poll_interval, Duration::from_secs(60));
        assert_eq!(config.format.format_type, FormatType::Json);
        assert_eq!(config.forwarder.reconnect_interval, Duration::from_secs(30));
        assert!(!config.tap.enabled);
        assert_eq!(config.enabled_sources(), vec!["app"]);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[log]
level = "debug"
format = "json"

[pipeline]
poll_interval = "30s"
max_pending = 100

[format]
type = "cef"
cef_vendor = "Acme"

[forwarder]
target = "siem.internal:514"
reconnect_interval = "10s"

[checkpoint]
path = "/tmp/siphon/checkpoints.json"

[tap]
enabled = true
echo = true

[sources.jira]
type = "jira"
api_url = "https://acme.atlassian.net"
username = "bot@acme.com"
api_token = "secret"

[sources.app]
type = "file"
path = "/var/log/app.log"

[sources.old]
type = "file"
enabled = false
path = "/var/log/old.log"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.pipeline.poll_interval, Duration::from_secs(30));
        assert_eq!(config.pipeline.max_pending, 100);
        assert_eq!(config.format.format_type, FormatType::Cef);
        assert_eq!(config.forwarder.target, "siem.internal:514");
        assert_eq!(
            config.checkpoint.path,
            Path::new("/tmp/siphon/checkpoints.json")
        );
        assert!(config.tap.echo);
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.enabled_sources(), vec!["app", "jira"]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_str("[forwarder\ntarget=").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.forwarder.target, "127.0.0.1:5140");
    }

    #[test]
    fn test_shipped_example_config() {
        let config = Config::from_str(include_str!("../../../configs/siphon.toml")).unwrap();
        assert_eq!(config.format.format_type, FormatType::Cef);
        assert_eq!(config.pipeline.fetch_timeout, Duration::from_secs(300));
        assert_eq!(config.enabled_sources(), vec!["app_log"]);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/siphon.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
