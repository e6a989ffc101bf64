//! Controller metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

/// Controller activity counters.
#[derive(Debug, Default)]
pub struct ControllerMetrics {
    /// Total poll cycles run.
    pub ticks: AtomicU64,

    /// Successful snapshot extractions.
    pub snapshots: AtomicU64,

    /// Poll cycles skipped because extraction failed outright.
    pub extraction_failures: AtomicU64,

    /// Navigation clicks issued.
    pub navigations: AtomicU64,

    /// Navigation clicks suppressed by the duplicate guard.
    pub duplicate_navigations_skipped: AtomicU64,

    /// Video playback resumes.
    pub playback_resumes: AtomicU64,

    /// Self-healing cooldowns entered.
    pub cooldowns: AtomicU64,

    /// Snapshot broadcasts delivered to at least one subscriber.
    pub broadcasts: AtomicU64,

    /// Start time of the current run.
    start_time: parking_lot::RwLock<Option<Instant>>,
}

impl ControllerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a run.
    pub fn mark_start(&self) {
        *self.start_time.write() = Some(Instant::now());
    }

    /// Uptime of the current run in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time
            .read()
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_snapshot(&self) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_navigation(&self) {
        self.navigations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_skipped(&self) {
        self.duplicate_navigations_skipped
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_playback_resume(&self) {
        self.playback_resumes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cooldown(&self) {
        self.cooldowns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            snapshots: self.snapshots.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            navigations: self.navigations.load(Ordering::Relaxed),
            duplicate_navigations_skipped: self
                .duplicate_navigations_skipped
                .load(Ordering::Relaxed),
            playback_resumes: self.playback_resumes.load(Ordering::Relaxed),
            cooldowns: self.cooldowns.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            uptime_secs: self.uptime_secs(),
        }
    }
}

/// Serializable view of [`ControllerMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub snapshots: u64,
    pub extraction_failures: u64,
    pub navigations: u64,
    pub duplicate_navigations_skipped: u64,
    pub playback_resumes: u64,
    pub cooldowns: u64,
    pub broadcasts: u64,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = ControllerMetrics::new();
        metrics.record_tick();
        metrics.record_tick();
        metrics.record_navigation();
        metrics.record_cooldown();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.navigations, 1);
        assert_eq!(snapshot.cooldowns, 1);
        assert_eq!(snapshot.playback_resumes, 0);
    }

    #[test]
    fn test_uptime_zero_before_start() {
        let metrics = ControllerMetrics::new();
        assert_eq!(metrics.uptime_secs(), 0);
        metrics.mark_start();
        let _ = metrics.uptime_secs();
    }
}
