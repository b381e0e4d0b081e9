//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A required setting is absent or empty
    #[error("{component} '{name}' is missing required field '{field}'")]
    MissingField {
        component: &'static str,
        name: String,
        field: &'static str,
    },

    /// A setting is present but unusable
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        component: &'static str,
        name: String,
        field: &'static str,
        message: String,
    },

    /// No sources enabled
    #[error("no sources are enabled; at least one source must be enabled")]
    NoSourcesEnabled,
}

impl ConfigError {
    pub fn missing_field(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
    ) -> Self {
        Self::MissingField {
            component,
            name: name.into(),
            field,
        }
    }

    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_error() {
        let err = ConfigError::missing_field("forwarder", "forwarder", "target");
        assert!(err.to_string().contains("forwarder"));
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value(
            "pipeline",
            "pipeline",
            "poll_interval",
            "must be greater than zero",
        );
        assert!(err.to_string().contains("poll_interval"));
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_no_sources_enabled() {
        let err = ConfigError::NoSourcesEnabled;
        assert!(err.to_string().contains("no sources"));
    }

    #[test]
    fn test_io_error_includes_path() {
        let err = ConfigError::IoError {
            path: "/etc/siphon.toml".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/etc/siphon.toml"));
    }
}
