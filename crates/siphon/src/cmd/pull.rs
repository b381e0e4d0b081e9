//! Pull command - one fetch from one source, printed as JSON lines
//!
//! Nothing is forwarded and no checkpoint is written: the source runs
//! against an in-memory checkpoint store.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use siphon_config::Config;
use siphon_connectors::{FetchWindow, MemoryCheckpointStore, Source, SourceImpl};
use siphon_format::{EventRenderer, JsonRenderer};
use siphon_protocol::parse_timestamp;

/// Pull command arguments
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Name of a `[sources.<name>]` entry
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Window start (RFC 3339); default: the source's initial lookback
    #[arg(long)]
    pub since: Option<String>,

    /// Window end (RFC 3339); default: now
    #[arg(long)]
    pub until: Option<String>,
}

/// Run the pull command
pub async fn run(config: &Config, args: PullArgs) -> Result<()> {
    let raw = config.sources.get(&args.source).with_context(|| {
        let known: Vec<_> = config.sources.iter().map(|(name, _)| name.as_str()).collect();
        format!("unknown source: {} (configured: {:?})", args.source, known)
    })?;

    let window = FetchWindow {
        start: args
            .since
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .context("invalid --since")?,
        end: args
            .until
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .context("invalid --until")?,
    };

    let source = SourceImpl::from_config(
        &args.source,
        &raw.source_type,
        &raw.config,
        Arc::new(MemoryCheckpointStore::new()),
    )
    .with_context(|| format!("failed to build source {}", args.source))?;

    if !source.validate() {
        anyhow::bail!("source {} failed validation", args.source);
    }

    tracing::info!(source = %args.source, source_type = %raw.source_type, "pulling");

    let events = source
        .fetch(window)
        .await
        .with_context(|| format!("failed to fetch from {}", args.source))?;

    let renderer = JsonRenderer::new();
    let mut stdout = std::io::stdout().lock();
    for event in &events {
        writeln!(stdout, "{}", renderer.render(event)?)?;
    }
    stdout.flush()?;

    tracing::info!(source = %args.source, count = events.len(), "pull complete");
    Ok(())
}
