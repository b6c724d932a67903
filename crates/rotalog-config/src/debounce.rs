//! Debounce logic for config change events

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Trailing-edge debouncer: a path is ready once no event has been seen
/// for it during the quiet period
pub struct Debouncer {
    /// Quiet period required before a path is reported
    threshold: Duration,
    /// Last event time per path
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    /// Create a new debouncer
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            pending: HashMap::new(),
        }
    }

    /// Record an event for these paths
    pub fn record(&mut self, paths: &[PathBuf]) {
        self.record_at(paths, Instant::now());
    }

    pub fn record_at(&mut self, paths: &[PathBuf], now: Instant) {
        for path in paths {
            self.pending.insert(path.clone(), now);
        }
    }

    /// Take the paths whose quiet period has elapsed
    pub fn take_ready(&mut self) -> Vec<PathBuf> {
        self.take_ready_at(Instant::now())
    }

    pub fn take_ready_at(&mut self, now: Instant) -> Vec<PathBuf> {
        let threshold = self.threshold;
        let mut ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= threshold)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &ready {
            self.pending.remove(path);
        }

        ready.sort();
        ready
    }

    /// Time until the next pending path becomes ready, if any is pending
    pub fn time_until_ready(&self) -> Option<Duration> {
        self.time_until_ready_at(Instant::now())
    }

    pub fn time_until_ready_at(&self, now: Instant) -> Option<Duration> {
        self.pending
            .values()
            .map(|last| (*last + self.threshold).saturating_duration_since(now))
            .min()
    }
}
