//! Error types for the coordinator.

use thiserror::Error;

use coursepilot_runloop::ControllerError;
use coursepilot_settings::SettingsError;

/// Errors raised by coordinator operations that are not message routing
/// (routing failures are answered in-band as structured responses).
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Settings storage failed.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// A page capability failed.
    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),
}
