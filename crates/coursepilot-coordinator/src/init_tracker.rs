//! Per-page initialization tracking.
//!
//! A page navigation storm can ask for initialization several times in
//! quick succession; the tracker collapses those into at most one run per
//! page within the cooldown window.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// Time a page must wait between initialization attempts.
pub const DEFAULT_INIT_COOLDOWN: Duration = Duration::from_secs(5);

/// Verdict for an initialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitDecision {
    /// No attempt in flight and the cooldown has passed; go ahead.
    Proceed,
    /// An attempt is currently running; await it instead of starting anew.
    AlreadyInFlight,
    /// A recent attempt finished inside the cooldown window; skip.
    CoolingDown,
}

struct InitRecord {
    in_flight: bool,
    last_attempt: Instant,
}

/// Dedup/cooldown bookkeeping, keyed by page instance.
pub struct InitTracker {
    cooldown: Duration,
    pages: DashMap<String, InitRecord>,
}

impl InitTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            pages: DashMap::new(),
        }
    }

    /// Register an initialization attempt for a page.
    pub fn begin(&self, page_id: &str) -> InitDecision {
        match self.pages.entry(page_id.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(InitRecord {
                    in_flight: true,
                    last_attempt: Instant::now(),
                });
                InitDecision::Proceed
            }
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                if record.in_flight {
                    debug!(page_id, "initialization already in flight");
                    InitDecision::AlreadyInFlight
                } else if record.last_attempt.elapsed() < self.cooldown {
                    debug!(page_id, "initialization inside cooldown window");
                    InitDecision::CoolingDown
                } else {
                    record.in_flight = true;
                    record.last_attempt = Instant::now();
                    InitDecision::Proceed
                }
            }
        }
    }

    /// Mark a page's attempt as finished; the cooldown window starts now.
    pub fn complete(&self, page_id: &str) {
        if let Some(mut record) = self.pages.get_mut(page_id) {
            record.in_flight = false;
            record.last_attempt = Instant::now();
        }
    }

    /// Drop all bookkeeping for a page (tab closed or navigated away).
    pub fn forget(&self, page_id: &str) {
        if self.pages.remove(page_id).is_some() {
            debug!(page_id, "initialization tracker entry dropped");
        }
    }

    /// Number of pages currently tracked.
    pub fn tracked(&self) -> usize {
        self.pages.len()
    }
}

impl Default for InitTracker {
    fn default() -> Self {
        Self::new(DEFAULT_INIT_COOLDOWN)
    }
}
