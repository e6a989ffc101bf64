//! Controller-owned progression state.
//!
//! Created empty at controller construction, mutated only by the poll loop
//! or explicit enable/disable calls, and reset on disable, unrecoverable
//! error, or teardown. Never persisted: only the enabled flag survives in
//! settings storage, and fresh state is derived from it on the next load.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Re-study bookkeeping.
///
/// Present only while re-visiting an already-completed lesson to accumulate
/// additional watch time (the fallback once no incomplete content remains).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReStudy {
    /// Display name of the lesson being re-studied.
    pub lesson_name: String,
    /// When the rotation started.
    pub started_at: DateTime<Utc>,
    /// Watch time to accumulate before exiting.
    pub target: Duration,
}

impl ReStudy {
    /// Start a rotation targeting the lesson's reported study time.
    pub fn new(lesson_name: impl Into<String>, started_at: DateTime<Utc>, target_secs: u32) -> Self {
        Self {
            lesson_name: lesson_name.into(),
            started_at,
            target: Duration::from_secs(u64::from(target_secs)),
        }
    }

    /// Time spent so far. Clock skew clamps to zero rather than underflowing.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the accumulated time has reached the target.
    pub fn is_fulfilled(&self, now: DateTime<Utc>) -> bool {
        self.elapsed(now) >= self.target
    }

    /// Time still to accumulate.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.target.saturating_sub(self.elapsed(now))
    }
}

/// Mutable state of one auto-learn session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionState {
    /// Whether auto-learn is currently on.
    pub enabled: bool,

    /// Last lesson the controller explicitly navigated to; guards against
    /// re-clicking the same target while waiting for its status to change.
    pub last_processed: Option<String>,

    /// Consecutive failed poll cycles; reset on any successful cycle.
    pub consecutive_errors: u32,

    /// Active re-study rotation, if any.
    pub re_study: Option<ReStudy>,

    /// Set when a re-study rotation just finished. Blocks immediate
    /// re-entry into re-study until the next manual enable.
    pub just_exited_re_study: bool,
}

impl ProgressionState {
    /// Fresh all-off state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all transient bookkeeping.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a failed cycle; returns the new consecutive count.
    pub fn record_error(&mut self) -> u32 {
        self.consecutive_errors += 1;
        self.consecutive_errors
    }

    /// A cycle succeeded; the error budget refills.
    pub fn clear_errors(&mut self) {
        self.consecutive_errors = 0;
    }
}
