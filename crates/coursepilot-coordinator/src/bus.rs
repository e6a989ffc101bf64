//! Broadcast buses between the processes.
//!
//! Delivery is fan-out with bounded buffers: a subscriber that falls behind
//! observes a lag error on its own receiver, the publisher never blocks.

use tokio::sync::broadcast;

use coursepilot_protocols::{Feature, LessonRecord};

const DEFAULT_BUS_CAPACITY: usize = 32;

/// A feature toggle command on its way from the UI to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureToggle {
    pub feature: Feature,
    pub enabled: bool,
}

/// Toggle and snapshot channels shared by all processes.
pub struct CoordinatorBus {
    toggles: broadcast::Sender<FeatureToggle>,
    snapshots: broadcast::Sender<Vec<LessonRecord>>,
}

impl CoordinatorBus {
    pub fn new(capacity: usize) -> Self {
        let (toggles, _) = broadcast::channel(capacity);
        let (snapshots, _) = broadcast::channel(capacity);
        Self { toggles, snapshots }
    }

    /// Receive toggle commands (the page controller's enable/disable feed).
    pub fn subscribe_toggles(&self) -> broadcast::Receiver<FeatureToggle> {
        self.toggles.subscribe()
    }

    /// Publish a toggle command. Returns how many subscribers saw it.
    pub fn publish_toggle(&self, toggle: FeatureToggle) -> usize {
        self.toggles.send(toggle).unwrap_or(0)
    }

    /// Receive lesson snapshots (the UI's render feed).
    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<Vec<LessonRecord>> {
        self.snapshots.subscribe()
    }

    /// Publish a snapshot. Returns how many subscribers saw it.
    pub fn publish_snapshot(&self, lessons: Vec<LessonRecord>) -> usize {
        self.snapshots.send(lessons).unwrap_or(0)
    }
}

impl Default for CoordinatorBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}
