//! Cross-process message definitions.
//!
//! Messages are routed by their `action` field, matching the shapes the
//! processes exchange over the browser message bus. Requests expect a
//! response; events are fire-and-forget broadcasts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::lesson::LessonRecord;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Toggleable features exposed to the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    AutoLearn,
    BackgroundBrowser,
}

impl Feature {
    /// Settings-storage key for this feature's persisted flag.
    pub fn key(&self) -> &'static str {
        match self {
            Feature::AutoLearn => "autoLearn",
            Feature::BackgroundBrowser => "backgroundBrowser",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Persisted feature flags handed to a page at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub auto_learn: bool,
    #[serde(default)]
    pub background_browser: bool,
}

/// Requests sent to a page (popup -> page, background -> page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageRequest {
    /// Ask the page for a fresh lesson snapshot.
    GetLessons,
    /// Ask the page to navigate to the given lesson.
    ClickLesson { lesson: LessonRecord },
    /// Toggle a feature on the page.
    UpdateState { feature: Feature, enabled: bool },
    /// Hand the persisted flags to a freshly loaded page.
    InitializeState { state: SessionState },
    /// Liveness probe keeping the background process awake.
    KeepAlive,
}

impl PageRequest {
    /// The wire `action` name of this request.
    pub fn action(&self) -> &'static str {
        match self {
            PageRequest::GetLessons => "getLessons",
            PageRequest::ClickLesson { .. } => "clickLesson",
            PageRequest::UpdateState { .. } => "updateState",
            PageRequest::InitializeState { .. } => "initializeState",
            PageRequest::KeepAlive => "keepAlive",
        }
    }
}

/// Broadcasts originated by a page (page -> popup, page -> background).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageEvent {
    /// The lesson list changed; carries the new snapshot.
    ContentChanged { lessons: Vec<LessonRecord> },
    /// The content script loaded and is ready for initialization.
    ContentScriptReady,
    /// The content script finished applying its initial state.
    ContentScriptInitialized,
}

/// Any message arriving on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncomingMessage {
    Request(PageRequest),
    Event(PageEvent),
}

/// Response shapes for [`PageRequest`]s.
///
/// Failures are structured data, never transport errors: an unknown or
/// malformed message yields `{success: false, error}` so the sender's
/// await resolves instead of timing out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageResponse {
    Lessons { lessons: Vec<LessonRecord> },
    Failure { success: bool, error: String },
    Ack { success: bool },
    Alive { status: String },
}

impl PageResponse {
    pub fn ok() -> Self {
        PageResponse::Ack { success: true }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        PageResponse::Failure {
            success: false,
            error: error.into(),
        }
    }

    pub fn lessons(lessons: Vec<LessonRecord>) -> Self {
        PageResponse::Lessons { lessons }
    }

    pub fn alive() -> Self {
        PageResponse::Alive {
            status: "alive".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            PageResponse::Lessons { .. } | PageResponse::Alive { .. } => true,
            PageResponse::Ack { success } => *success,
            PageResponse::Failure { .. } => false,
        }
    }
}

/// Actions understood by the router.
const KNOWN_ACTIONS: &[&str] = &[
    "getLessons",
    "clickLesson",
    "updateState",
    "initializeState",
    "keepAlive",
    "contentChanged",
    "contentScriptReady",
    "contentScriptInitialized",
];

/// Parse a raw bus message, distinguishing unknown actions from malformed
/// payloads so each maps to the right failure response.
pub fn parse_incoming(value: Value) -> Result<IncomingMessage, ProtocolError> {
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .map(str::to_owned);

    match serde_json::from_value::<IncomingMessage>(value) {
        Ok(message) => Ok(message),
        Err(err) => match action {
            Some(name) if !KNOWN_ACTIONS.contains(&name.as_str()) => {
                Err(ProtocolError::UnknownAction(name))
            }
            _ => Err(ProtocolError::Malformed(err)),
        },
    }
}
