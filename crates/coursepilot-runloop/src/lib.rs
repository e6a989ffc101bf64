//! # CoursePilot RunLoop
//!
//! The stateful driver around the progression engine: an enable/disable
//! lifecycle, a fixed-cadence poll loop, an error budget with self-healing
//! cooldown, and the seams to the page (snapshot provider, navigation
//! actuator, playback driver).
//!
//! ## Concurrency discipline
//!
//! One poll task per controller is the sole mutator of progression state;
//! ticks never overlap because the next sleep starts only after the previous
//! tick finished. Disable cancels the task's token - a mid-flight tick is
//! allowed to finish, but its action is discarded behind an enabled re-check
//! before any side effect lands.
//!
//! ## Key Components
//!
//! - [`AutoLearnController`]: lifecycle + poll loop
//! - [`LessonSnapshotProvider`] / [`NavigationActuator`] / [`PlaybackDriver`]:
//!   seams to the page
//! - [`CachingSnapshotProvider`]: get-or-refresh snapshot cache
//! - [`AutoLearnConfig`]: cadence, retry, and budget knobs
//! - [`ControllerEvent`]: read-only feed for the presentation layer

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod metrics;
pub mod retry;
pub mod traits;

pub use cache::CachingSnapshotProvider;
pub use config::{AutoLearnConfig, StartupConfig};
pub use controller::{AutoLearnController, ControllerState};
pub use error::{ControllerError, ControllerResult};
pub use events::{ControllerEvent, StopReason};
pub use metrics::{ControllerMetrics, MetricsSnapshot};
pub use retry::retry_with_delay;
pub use traits::{LessonSnapshotProvider, NavigationActuator, PlaybackDriver};

// Re-export CancellationToken for embedders wiring their own teardown.
pub use tokio_util::sync::CancellationToken;
