//! Protocol error types.

use thiserror::Error;

use crate::message::PageResponse;

/// Errors raised while parsing bus messages.
///
/// These are coordinator-level failures: they are answered with a structured
/// failure response and never propagate as process-fatal errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The message carried an `action` the router does not understand.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The message was missing its `action` or carried a bad payload.
    #[error("Invalid message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ProtocolError {
    /// The failure response to send back to the caller.
    pub fn to_response(&self) -> PageResponse {
        PageResponse::failure(self.to_string())
    }
}
