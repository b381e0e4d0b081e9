//! Siphon - audit-log forwarder
//!
//! # Usage
//!
//! ```bash
//! # Run the forwarder (default)
//! siphon
//! siphon --config configs/siphon.toml
//!
//! # Fetch once from one source and print JSON lines
//! siphon pull jira_cloud
//!
//! # Validate configuration and list active sources
//! siphon check
//! ```

mod cmd;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use siphon_config::{Config, LogConfig, LogFormat, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Config files tried in order when `--config` is not given
const DEFAULT_CONFIG_PATHS: &[&str] = &["configs/siphon.toml", "siphon.toml"];

/// Siphon - forward audit logs to a SIEM collector
#[derive(Parser, Debug)]
#[command(name = "siphon")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the forwarder
    Serve,

    /// Fetch once from a configured source and print events as JSON lines
    Pull(cmd::pull::PullArgs),

    /// Validate configuration and list sources
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Pull(args)) => {
            // stdout carries the events
            init_logging(&config.log, cli.log_level.as_deref(), false)?;
            cmd::pull::run(&config, args).await
        }
        Some(Command::Check) => cmd::check::run(&config),
        Some(Command::Serve) | None => {
            init_logging(&config.log, cli.log_level.as_deref(), true)?;
            cmd::serve::run(config).await
        }
    }
}

/// Load the explicit config file, or the first default path that exists
fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()));
    }

    for candidate in DEFAULT_CONFIG_PATHS.iter().map(Path::new) {
        if candidate.exists() {
            return Config::from_file(candidate).with_context(|| {
                format!("failed to load configuration from {}", candidate.display())
            });
        }
    }

    anyhow::bail!(
        "no config file found (tried {}); pass one with --config",
        DEFAULT_CONFIG_PATHS.join(", ")
    )
}

/// Initialize the tracing subscriber
///
/// Level: CLI flag > config file > "info". When `stdout_allowed` is false,
/// stdout output is redirected to stderr.
fn init_logging(log: &LogConfig, cli_level: Option<&str>, stdout_allowed: bool) -> Result<()> {
    let level = cli_level.unwrap_or(log.level.as_str());
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let writer = match &log.output {
        LogOutput::Stdout if stdout_allowed => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stdout | LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => BoxMakeWriter::new(Mutex::new(open_log_file(Path::new(path))?)),
    };
    let ansi = log.output.file_path().is_none();

    let registry = tracing_subscriber::registry().with(filter);
    match log.format {
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .init(),
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["siphon"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["siphon", "pull", "jira_cloud", "--config", "x.toml", "-l", "debug"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Command::Pull(args)) => assert_eq!(args.source, "jira_cloud"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_load_config_missing_explicit_path() {
        let err = load_config(Some(Path::new("/nonexistent/siphon.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_load_config_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[forwarder]\ntarget = \"127.0.0.1:514\"\n\n[sources.app]\ntype = \"file\"\npath = \"/var/log/app.log\"\n"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.forwarder.target, "127.0.0.1:514");
        assert_eq!(config.enabled_sources(), vec!["app"]);
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/siphon.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
