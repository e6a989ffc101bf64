//! Error types for settings storage.

use thiserror::Error;

/// Errors raised by settings stores.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A value did not (de)serialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
