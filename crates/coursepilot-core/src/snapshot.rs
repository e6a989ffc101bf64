//! Ordered queries over a lesson snapshot.
//!
//! Snapshot order is the course's canonical sequence, so every "first"
//! below means lowest index.

use coursepilot_protocols::LessonRecord;

/// Read-only view over one extracted snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotView<'a> {
    lessons: &'a [LessonRecord],
}

impl<'a> SnapshotView<'a> {
    pub fn new(lessons: &'a [LessonRecord]) -> Self {
        Self { lessons }
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// The currently displayed lesson, if any.
    ///
    /// A snapshot should carry at most one; extraction glitches that mark
    /// several are resolved by taking the first.
    pub fn current(&self) -> Option<(usize, &'a LessonRecord)> {
        self.lessons.iter().enumerate().find(|(_, l)| l.is_current)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&'a LessonRecord> {
        self.lessons.iter().find(|l| l.display_name == name)
    }

    /// Whether any unit carries trackable study time.
    pub fn has_trackable(&self) -> bool {
        self.lessons.iter().any(|l| l.is_trackable())
    }

    /// First unfinished study target at or after `start`, wrapping to the
    /// beginning. `None` for `start` scans the whole snapshot in order.
    pub fn next_unfinished_target_after(
        &self,
        start: Option<usize>,
    ) -> Option<(usize, &'a LessonRecord)> {
        let len = self.lessons.len();
        if len == 0 {
            return None;
        }
        let offset = start.map_or(0, |i| (i + 1) % len);
        (0..len)
            .map(|step| (offset + step) % len)
            .map(|i| (i, &self.lessons[i]))
            .find(|(_, l)| l.is_unfinished_target())
    }

    /// First unfinished study target in snapshot order.
    pub fn first_unfinished_target(&self) -> Option<&'a LessonRecord> {
        self.lessons.iter().find(|l| l.is_unfinished_target())
    }

    /// First completed study target; the re-study candidate.
    pub fn first_completed_target(&self) -> Option<&'a LessonRecord> {
        self.lessons
            .iter()
            .find(|l| l.is_study_target() && l.status.is_complete())
    }

    /// First study target regardless of completion.
    pub fn first_target(&self) -> Option<&'a LessonRecord> {
        self.lessons.iter().find(|l| l.is_study_target())
    }
}
