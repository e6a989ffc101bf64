//! Read-only event feed for the presentation layer.
//!
//! The controller publishes here after every successful extraction so the
//! UI can render without polling the page itself. Subscribers that fall
//! behind lose old snapshots, never block the loop.

use coursepilot_protocols::LessonRecord;

/// Why auto-learn switched itself off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Nothing in the course carries trackable study time.
    NoTrackableContent,
    /// The host page or process went away.
    ContextInvalidated,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::NoTrackableContent => write!(f, "no content left to auto-progress"),
            StopReason::ContextInvalidated => write!(f, "page context invalidated"),
        }
    }
}

/// Events published by the controller.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// A fresh snapshot was extracted.
    SnapshotUpdated(Vec<LessonRecord>),
    /// Auto-learn turned itself off; the UI toggle should follow, with a
    /// passive notification rather than an error dialog.
    AutoLearnStopped { reason: StopReason },
}
