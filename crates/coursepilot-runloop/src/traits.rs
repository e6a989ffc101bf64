//! Seams to the page.
//!
//! DOM scraping and click simulation are brittle, site-specific concerns that
//! live outside this crate. The controller only sees these traits and treats
//! every implementation as best-effort.

use async_trait::async_trait;

use coursepilot_protocols::LessonRecord;

use crate::error::ControllerResult;

/// Extracts the lesson list currently visible in the page.
///
/// Results are ephemeral: a snapshot is only valid until the next
/// navigation and must be re-extracted, never cached by callers (the
/// [`CachingSnapshotProvider`](crate::cache::CachingSnapshotProvider) owns
/// the one sanctioned cache and its invalidation). The list may be empty or
/// partial while the page is still rendering.
#[async_trait]
pub trait LessonSnapshotProvider: Send + Sync {
    async fn extract(&self) -> ControllerResult<Vec<LessonRecord>>;
}

/// Causes the page to navigate to a lesson via a simulated click cascade.
///
/// Completion time is not guaranteed; `Ok(false)` means the click ran but
/// had no observable effect, which the controller treats as try-again-next-tick.
#[async_trait]
pub trait NavigationActuator: Send + Sync {
    async fn navigate(&self, lesson: &LessonRecord) -> ControllerResult<bool>;
}

/// Drives the embedded video player.
#[async_trait]
pub trait PlaybackDriver: Send + Sync {
    /// Resume playback if the player is paused.
    async fn resume(&self) -> ControllerResult<()>;

    /// Request a playback rate; players that do not expose rate controls
    /// may ignore it.
    async fn set_rate(&self, rate: f32) -> ControllerResult<()>;
}
