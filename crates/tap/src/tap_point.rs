//! TapPoint - the configured tap attached to the delivery channel
//!
//! Counts delivered lines, keeps the most recent ones so `serve` can replay
//! them to the log on shutdown, and optionally echoes each line at debug
//! level as it goes out.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use siphon_config::TapConfig;
use tracing::{debug, info};

use crate::sink::{TapEntry, TapSink};

#[derive(Debug)]
pub struct TapPoint {
    recent: Mutex<VecDeque<TapEntry>>,
    capacity: usize,
    echo: bool,
    tap_count: AtomicU64,
}

impl TapPoint {
    /// `capacity` is raised to at least one line
    pub fn new(capacity: usize, echo: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            echo,
            tap_count: AtomicU64::new(0),
        }
    }

    /// Build from config; `None` when the tap is disabled
    pub fn from_config(config: &TapConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.capacity, config.echo))
    }

    /// Retained entries, oldest first
    pub fn recent(&self) -> Vec<TapEntry> {
        self.recent.lock().iter().cloned().collect()
    }

    /// Total entries tapped since creation
    pub fn tap_count(&self) -> u64 {
        self.tap_count.load(Ordering::Relaxed)
    }

    /// Log every retained line, oldest first; returns how many were logged
    pub fn replay_to_log(&self) -> usize {
        let entries = self.recent();
        for entry in &entries {
            info!(delivered_at = %entry.timestamp, line = %entry.data, "last delivered line");
        }
        entries.len()
    }
}

impl TapSink for TapPoint {
    fn record(&self, entry: &TapEntry) {
        self.tap_count.fetch_add(1, Ordering::Relaxed);
        if self.echo {
            debug!(line = %entry.data, "tap");
        }

        let mut recent = self.recent.lock();
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(entry.clone());
    }
}

#[cfg(test)]
#[path = "tap_point_test.rs"]
mod tests;
