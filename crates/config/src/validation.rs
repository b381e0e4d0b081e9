//! Configuration validation
//!
//! Checks made after parsing:
//! - Forwarder target is present and looks like host:port
//! - Cadence values and the pending queue bound are non-zero
//! - Tap capacity is non-zero when the tap is enabled
//! - At least one source is enabled
//! - Source types are known
//!
//! Type-specific source fields are checked by the connectors crate, which
//! excludes a bad source instead of rejecting the whole config.

use crate::Config;
use crate::error::{ConfigError, Result};

/// Source types understood by the connectors crate
pub const KNOWN_SOURCE_TYPES: &[&str] = &["jira", "file"];

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_forwarder(config)?;
    validate_pipeline(config)?;
    validate_tap(config)?;
    validate_sources(config)?;
    Ok(())
}

fn validate_forwarder(config: &Config) -> Result<()> {
    let target = config.forwarder.target.trim();
    if target.is_empty() {
        return Err(ConfigError::missing_field("forwarder", "forwarder", "target"));
    }

    match target.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
        _ => {
            return Err(ConfigError::invalid_value(
                "forwarder",
                "forwarder",
                "target",
                format!("expected host:port, got '{target}'"),
            ));
        }
    }

    if config.forwarder.connection_timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "forwarder",
            "forwarder",
            "connection_timeout",
            "must be greater than zero",
        ));
    }
    if config.forwarder.write_timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "forwarder",
            "forwarder",
            "write_timeout",
            "must be greater than zero",
        ));
    }
    Ok(())
}

fn validate_pipeline(config: &Config) -> Result<()> {
    let pipeline = &config.pipeline;
    for (field, value) in [
        ("poll_interval", pipeline.poll_interval),
        ("fetch_timeout", pipeline.fetch_timeout),
    ] {
        if value.is_zero() {
            return Err(ConfigError::invalid_value(
                "pipeline",
                "pipeline",
                field,
                "must be greater than zero",
            ));
        }
    }
    if pipeline.max_pending == 0 {
        return Err(ConfigError::invalid_value(
            "pipeline",
            "pipeline",
            "max_pending",
            "must be greater than zero",
        ));
    }
    Ok(())
}

fn validate_tap(config: &Config) -> Result<()> {
    if config.tap.enabled && config.tap.capacity == 0 {
        return Err(ConfigError::invalid_value(
            "tap",
            "tap",
            "capacity",
            "must be greater than zero when the tap is enabled",
        ));
    }
    Ok(())
}

fn validate_sources(config: &Config) -> Result<()> {
    for (name, source) in config.sources.iter() {
        if !KNOWN_SOURCE_TYPES.contains(&source.source_type.as_str()) {
            return Err(ConfigError::invalid_value(
                "source",
                name.clone(),
                "type",
                format!(
                    "unknown source type '{}' (expected one of: {})",
                    source.source_type,
                    KNOWN_SOURCE_TYPES.join(", ")
                ),
            ));
        }
    }

    if config.sources.enabled().next().is_none() {
        return Err(ConfigError::NoSourcesEnabled);
    }
    Ok(())
}
