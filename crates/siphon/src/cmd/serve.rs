//! Serve command - run the forwarder until SIGINT/SIGTERM

use std::sync::Arc;

use anyhow::{Context, Result};
use siphon_config::Config;
use siphon_connectors::{CheckpointStore, FileCheckpointStore};
use siphon_format::Renderer;
use siphon_pipeline::{Orchestrator, build_sources};
use siphon_sinks::{ChannelConfig, DeliveryChannel};
use siphon_tap::TapPoint;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the serve command
pub async fn run(config: Config) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        sources = ?config.enabled_sources(),
        format = config.format.format_type.as_str(),
        target_addr = %config.forwarder.target,
        "Siphon starting"
    );

    let checkpoints: Arc<dyn CheckpointStore> = Arc::new(
        FileCheckpointStore::open(&config.checkpoint.path)
            .context("checkpoint file is unusable; fix or remove it")?,
    );
    let sources = build_sources(&config, checkpoints).context("failed to start sources")?;

    let tap = TapPoint::from_config(&config.tap).map(Arc::new);
    let mut channel = DeliveryChannel::new(ChannelConfig::from(&config.forwarder));
    if let Some(tap) = &tap {
        info!(capacity = config.tap.capacity, echo = config.tap.echo, "tap enabled");
        channel = channel.with_tap(tap.clone());
    }

    let orchestrator = Orchestrator::new(
        sources,
        Renderer::from_config(&config.format),
        channel,
        config.pipeline.clone(),
    );

    let cancel = CancellationToken::new();
    let signal_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            wait_for_shutdown().await;
            info!("shutdown signal received, finishing current cycle");
            cancel.cancel();
        })
    };

    orchestrator.run(cancel).await;
    signal_task.abort();

    if let Some(tap) = tap {
        let replayed = tap.replay_to_log();
        info!(lines = tap.tap_count(), replayed, "tap summary");
    }
    info!("Siphon shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
