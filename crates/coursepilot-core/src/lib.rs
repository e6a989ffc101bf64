//! # CoursePilot Core
//!
//! The progression decision engine: given one snapshot of the page's lesson
//! list and the controller's mutable state, compute the next action. Pure
//! logic - no I/O, no timers, no DOM knowledge. The stateful driver lives in
//! `coursepilot-runloop`; this crate is what it consults every tick.
//!
//! ## Key Components
//!
//! - [`ProgressionEngine`]: the decision state machine
//! - [`Action`]: what the controller should do next
//! - [`ProgressionState`]: mutable per-session bookkeeping, including the
//!   re-study rotation
//! - [`SnapshotView`]: ordered queries over a lesson snapshot
//! - [`Clock`]: injectable time source for deterministic tests

pub mod clock;
pub mod engine;
pub mod snapshot;
pub mod state;

pub use clock::Clock;
pub use engine::{Action, ProgressionEngine};
pub use snapshot::SnapshotView;
pub use state::{ProgressionState, ReStudy};
