//! Checkpoint persistence and tap settings

use std::path::PathBuf;

use serde::Deserialize;

/// Where per-source fetch checkpoints are stored
///
/// ```toml
/// [checkpoint]
/// path = "/var/lib/siphon/checkpoints.json"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// JSON file holding source name -> timestamp
    /// Default: state/checkpoints.json
    pub path: PathBuf,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("state/checkpoints.json"),
        }
    }
}

/// Observation hook on successfully delivered lines
///
/// ```toml
/// [tap]
/// enabled = true
/// echo = false
/// capacity = 20
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TapConfig {
    /// Keep a copy of delivered lines
    /// Default: false
    pub enabled: bool,

    /// Echo each delivered line to the log at debug level
    /// Default: false
    pub echo: bool,

    /// Most recent delivered lines kept and replayed to the log on shutdown
    /// Default: 20
    pub capacity: usize,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            echo: false,
            capacity: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_default_path() {
        let config: CheckpointConfig = toml::from_str("").unwrap();
        assert_eq!(config.path, PathBuf::from("state/checkpoints.json"));
    }

    #[test]
    fn test_tap_defaults() {
        let config: TapConfig = toml::from_str("").unwrap();
        assert!(!config.enabled);
        assert!(!config.echo);
        assert_eq!(config.capacity, 20);
    }

    #[test]
    fn test_tap_enabled() {
        let config: TapConfig = toml::from_str("enabled = true\ncapacity = 50").unwrap();
        assert!(config.enabled);
        assert_eq!(config.capacity, 50);
    }
}
