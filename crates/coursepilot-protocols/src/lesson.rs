//! Lesson record definitions.
//!
//! A snapshot is one point-in-time extraction of the lesson list visible in
//! the page. Snapshot order is the course's canonical sequence; every
//! "first" in the selection rules means lowest snapshot index.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "lesson_tests.rs"]
mod tests;

/// Kind of a lesson entry in the course content list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    /// Video unit, playable in the embedded player.
    Video,
    /// Quiz or exam unit. The source platform labels these both ways.
    #[serde(alias = "test")]
    Quiz,
    /// Document or courseware unit.
    Document,
    /// Section header. Covers are never navigation targets.
    Cover,
}

/// Completion status as read from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LessonStatus {
    NotStarted,
    InProgress,
    /// The platform reports completion under several labels.
    #[serde(alias = "completed", alias = "finish", alias = "finished")]
    Complete,
    /// Not yet reachable (prerequisite gating).
    Locked,
}

impl LessonStatus {
    /// Whether this status counts as finished.
    pub fn is_complete(&self) -> bool {
        matches!(self, LessonStatus::Complete)
    }
}

impl std::fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonStatus::NotStarted => write!(f, "not-started"),
            LessonStatus::InProgress => write!(f, "in-progress"),
            LessonStatus::Complete => write!(f, "complete"),
            LessonStatus::Locked => write!(f, "locked"),
        }
    }
}

/// One entry of a lesson snapshot.
///
/// The display name is the de-facto identity key: the source page exposes no
/// stable numeric IDs. Records are immutable within a snapshot; after any
/// navigation a fresh snapshot must be extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    /// Human-readable title; the identity key within a snapshot.
    pub display_name: String,

    #[serde(rename = "type")]
    pub kind: LessonType,

    /// Expected duration in seconds. Absent on untracked units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_time: Option<u32>,

    pub status: LessonStatus,

    /// Whether this is the lesson currently displayed in the player.
    /// At most one record per snapshot should carry it; consumers treat
    /// duplicates defensively by picking the first.
    #[serde(default)]
    pub is_current: bool,
}

impl LessonRecord {
    /// Create a record with no study time, not current.
    pub fn new(display_name: impl Into<String>, kind: LessonType, status: LessonStatus) -> Self {
        Self {
            display_name: display_name.into(),
            kind,
            study_time: None,
            status,
            is_current: false,
        }
    }

    /// Set the expected study duration in seconds.
    pub fn with_study_time(mut self, seconds: u32) -> Self {
        self.study_time = Some(seconds);
        self
    }

    /// Mark this record as the currently displayed lesson.
    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    /// Whether the platform tracks watch time for this unit.
    ///
    /// Covers carry no trackable time even if the extractor scraped one.
    pub fn is_trackable(&self) -> bool {
        self.study_time.is_some() && self.kind != LessonType::Cover
    }

    /// Whether this lesson may be selected as a navigation target.
    pub fn is_study_target(&self) -> bool {
        self.is_trackable() && self.status != LessonStatus::Locked
    }

    /// A study target that still needs time.
    pub fn is_unfinished_target(&self) -> bool {
        self.is_study_target() && !self.status.is_complete()
    }
}
