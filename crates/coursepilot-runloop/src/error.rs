//! Error types for the controller.

use thiserror::Error;

use coursepilot_settings::SettingsError;

/// Errors that can occur while driving auto-learn.
///
/// Only context invalidation (and use-after-dispose) is fatal; everything
/// else is a this-tick problem the loop absorbs and retries.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Snapshot extraction returned nothing usable.
    #[error("Snapshot extraction failed: {0}")]
    Extraction(String),

    /// A simulated click had no observable effect.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Video playback could not be driven.
    #[error("Playback failed: {0}")]
    Playback(String),

    /// The host page or process was torn down mid-operation.
    #[error("Extension context invalidated")]
    ContextInvalidated,

    /// Settings storage failed.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// The controller was disposed and cannot be restarted.
    #[error("Controller has been disposed")]
    Disposed,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ControllerError {
    /// Fatal errors stop the loop immediately and are never retried within
    /// the same controller instance.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ControllerError::ContextInvalidated | ControllerError::Disposed
        )
    }
}

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;
