//! # CoursePilot Coordinator
//!
//! The relay between the three processes: routes bus messages to the page's
//! capabilities, fans toggle commands and lesson snapshots out to
//! subscribers, and keeps page initialization single-flight with a cooldown
//! so a page is never double-initialized.
//!
//! Message delivery guarantees are inherited from the underlying transport:
//! eventually delivered or explicitly failed, with no ordering promise
//! between popup and page traffic. Every failure this crate produces is a
//! structured response, never a process-fatal error.
//!
//! ## Key Components
//!
//! - [`Coordinator`]: message router + initialization guard
//! - [`CoordinatorBus`]: toggle and snapshot broadcast channels
//! - [`InitTracker`]: per-page dedup with cooldown
//! - [`SingleFlight`]: in-flight-future memoization

pub mod bus;
pub mod coordinator;
pub mod error;
pub mod init_tracker;
pub mod single_flight;

pub use bus::{CoordinatorBus, FeatureToggle};
pub use coordinator::{Coordinator, CoordinatorConfig, PageInitResult};
pub use error::CoordinatorError;
pub use init_tracker::{InitDecision, InitTracker};
pub use single_flight::SingleFlight;
