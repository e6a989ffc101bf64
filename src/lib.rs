//! # CoursePilot
//!
//! Auto-progression core for a course-player automation system: a pure
//! decision engine that picks the next lesson to study from a page snapshot,
//! an async controller that drives it on a poll cadence with an error
//! budget, and the coordination and persistence plumbing around them.
//!
//! The page itself (DOM scraping, click simulation, video element control)
//! and the UI are external collaborators reached through the traits in
//! [`coursepilot_runloop`].
//!
//! ## Crates
//!
//! - [`coursepilot_protocols`]: wire contracts between the processes
//! - [`coursepilot_core`]: the progression decision engine
//! - [`coursepilot_runloop`]: the poll-driven controller
//! - [`coursepilot_coordinator`]: message routing and init dedup
//! - [`coursepilot_settings`]: persisted settings storage

pub use coursepilot_coordinator::{
    Coordinator, CoordinatorBus, CoordinatorConfig, CoordinatorError, FeatureToggle, InitDecision,
    InitTracker, PageInitResult, SingleFlight,
};
pub use coursepilot_core::{Action, Clock, ProgressionEngine, ProgressionState, ReStudy, SnapshotView};
pub use coursepilot_protocols::{
    Feature, IncomingMessage, LessonRecord, LessonStatus, LessonType, PageEvent, PageRequest,
    PageResponse, ProtocolError, SessionState, parse_incoming,
};
pub use coursepilot_runloop::{
    AutoLearnConfig, AutoLearnController, CachingSnapshotProvider, ControllerError,
    ControllerEvent, ControllerMetrics, ControllerResult, ControllerState, LessonSnapshotProvider,
    MetricsSnapshot, NavigationActuator, PlaybackDriver, StartupConfig, StopReason,
};
pub use coursepilot_settings::{
    FileSettingsStore, MemorySettingsStore, MenuPosition, Settings, SettingsError, SettingsHandle,
    SettingsStore, keys,
};
