//! Orchestrator - the polling loop
//!
//! One cycle: fetch every source (each in its own task, bounded by
//! `fetch_timeout`), render the events, and push the payloads through the
//! delivery channel. Payloads the channel refuses stay in a bounded pending
//! queue and go out first on the next cycle.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use siphon_config::PipelineConfig;
use siphon_connectors::{FetchWindow, Source, SourceImpl};
use siphon_format::{EventRenderer, Renderer};
use siphon_protocol::LogEvent;
use siphon_sinks::DeliveryChannel;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::report::{CycleReport, SourceReport};

/// Drives sources, renderer and delivery channel
pub struct Orchestrator<S = SourceImpl> {
    sources: Vec<Arc<S>>,
    renderer: Renderer,
    channel: DeliveryChannel,
    config: PipelineConfig,

    /// Rendered payloads not yet accepted by the channel, oldest first
    pending: VecDeque<String>,
}

impl<S> Orchestrator<S>
where
    S: Source + 'static,
{
    pub fn new(
        sources: Vec<S>,
        renderer: Renderer,
        channel: DeliveryChannel,
        config: PipelineConfig,
    ) -> Self {
        let mut sources: Vec<Arc<S>> = sources.into_iter().map(Arc::new).collect();
        sources.sort_by(|a, b| a.name().cmp(b.name()));

        Self {
            sources,
            renderer,
            channel,
            config,
            pending: VecDeque::new(),
        }
    }

    pub fn channel(&self) -> &DeliveryChannel {
        &self.channel
    }

    /// Payloads waiting for the next delivery attempt
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Run one full cycle
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        if !self.pending.is_empty() {
            debug!(pending = self.pending.len(), "retrying pending payloads");
            report.delivered += self.flush().await;
        }

        let mut payloads = Vec::new();
        for source in &self.sources {
            let mut source_report = SourceReport {
                name: source.name().to_string(),
                ..Default::default()
            };

            let rendered_before = payloads.len();
            match self.fetch_source(source).await {
                Ok(events) => {
                    source_report.fetched = events.len();
                    for event in &events {
                        match self.renderer.render(event) {
                            Ok(line) => payloads.push(line),
                            Err(e) => {
                                warn!(
                                    source = %source.name(),
                                    format = self.renderer.name(),
                                    error = %e,
                                    "failed to render event, skipping"
                                );
                            }
                        }
                    }
                    source_report.rendered = payloads.len() - rendered_before;
                }
                Err(reason) => source_report.failure = Some(reason),
            }

            report.sources.push(source_report);
        }

        if !payloads.is_empty() {
            report.dropped = self.enqueue(payloads);
            report.delivered += self.flush().await;
        }

        report.pending = self.pending.len();
        report
    }

    /// Loop until cancelled, then close the channel
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            sources = self.sources.len(),
            format = self.renderer.name(),
            target_addr = %self.channel.target(),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "orchestrator starting"
        );

        if let Err(e) = self.channel.connect().await {
            warn!(error = %e, "initial connection failed, will retry on first send");
        }

        loop {
            let delay = match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
                Ok(report) => {
                    info!(
                        fetched = report.fetched(),
                        rendered = report.rendered(),
                        delivered = report.delivered,
                        pending = report.pending,
                        dropped = report.dropped,
                        failed_sources = report.failed_sources().len(),
                        "cycle complete"
                    );
                    self.config.poll_interval
                }
                Err(panic) => {
                    error!(
                        panic = %panic_message(panic.as_ref()),
                        backoff_secs = self.config.error_backoff.as_secs(),
                        "cycle panicked"
                    );
                    self.config.error_backoff
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if !self.pending.is_empty() {
            warn!(pending = self.pending.len(), "shutting down with undelivered payloads");
        }
        self.channel.close().await;
        info!("orchestrator stopped");
    }

    /// Fetch one source in its own task, bounded by `fetch_timeout`
    async fn fetch_source(&self, source: &Arc<S>) -> Result<Vec<LogEvent>, String> {
        let name = source.name().to_string();
        let task_source = Arc::clone(source);
        let handle =
            tokio::spawn(async move { task_source.fetch(FetchWindow::latest()).await });
        let abort = handle.abort_handle();

        match tokio::time::timeout(self.config.fetch_timeout, handle).await {
            Ok(Ok(Ok(events))) => {
                debug!(source = %name, count = events.len(), "fetched events");
                Ok(events)
            }
            Ok(Ok(Err(e))) => {
                error!(source = %name, error = %e, "fetch failed");
                Err(e.to_string())
            }
            Ok(Err(join_err)) if join_err.is_panic() => {
                let reason = panic_message(join_err.into_panic().as_ref());
                error!(source = %name, panic = %reason, "fetch panicked");
                Err(format!("panicked: {reason}"))
            }
            Ok(Err(join_err)) => {
                error!(source = %name, error = %join_err, "fetch task cancelled");
                Err(join_err.to_string())
            }
            Err(_) => {
                abort.abort();
                error!(
                    source = %name,
                    timeout_secs = self.config.fetch_timeout.as_secs(),
                    "fetch timed out"
                );
                Err("timed out".to_string())
            }
        }
    }

    /// Append new payloads, dropping the oldest beyond `max_pending`
    fn enqueue(&mut self, payloads: Vec<String>) -> usize {
        self.pending.extend(payloads);

        let overflow = self.pending.len().saturating_sub(self.config.max_pending);
        if overflow > 0 {
            self.pending.drain(..overflow);
            warn!(
                dropped = overflow,
                max_pending = self.config.max_pending,
                "pending queue full, dropped oldest payloads"
            );
        }
        overflow
    }

    /// Send pending payloads in order; stop at the first refusal
    async fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(payload) = self.pending.front() {
            if !self.channel.send(payload.as_bytes()).await {
                warn!(
                    remaining = self.pending.len(),
                    "delivery failed, keeping payloads for next cycle"
                );
                break;
            }
            self.pending.pop_front();
            delivered += 1;
        }
        delivered
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
