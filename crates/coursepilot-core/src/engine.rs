//! The progression decision engine.
//!
//! `decide` is consulted once per poll tick with a fresh snapshot. It is a
//! priority ladder: the first matching rule wins, and every navigation pick
//! honors snapshot order as the canonical course sequence.

use tracing::{debug, warn};

use coursepilot_protocols::{LessonRecord, LessonType};

use crate::clock::Clock;
use crate::snapshot::SnapshotView;
use crate::state::{ProgressionState, ReStudy};

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// What the controller should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Navigate the page to this lesson.
    NavigateTo(LessonRecord),
    /// Keep the current video playing.
    ResumePlayback(LessonRecord),
    /// Nothing to do this tick; wait for the page to make progress.
    NoOp,
    /// No content left to progress; auto-learn switches itself off.
    Stop,
}

impl Action {
    /// Target lesson name, for navigation and playback actions.
    pub fn target(&self) -> Option<&str> {
        match self {
            Action::NavigateTo(lesson) | Action::ResumePlayback(lesson) => {
                Some(&lesson.display_name)
            }
            Action::NoOp | Action::Stop => None,
        }
    }
}

/// The decision state machine.
///
/// Pure apart from reading its [`Clock`]: all side effects are the
/// controller's job, and all mutation happens on the `ProgressionState`
/// passed in.
#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    clock: Clock,
}

impl ProgressionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine reading time from the given clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    /// Compute the next action for this snapshot.
    ///
    /// Re-study entry and exit are recorded on `state` as part of the call;
    /// the returned action is already consistent with the updated state.
    pub fn decide(&self, lessons: &[LessonRecord], state: &mut ProgressionState) -> Action {
        let view = SnapshotView::new(lessons);

        // No trackable content anywhere: nothing to drive, whatever state
        // was carried in.
        if !view.has_trackable() {
            state.re_study = None;
            return Action::Stop;
        }

        let now = self.clock.now();

        if let Some(re_study) = state.re_study.clone() {
            match view.current() {
                Some((_, current)) if current.display_name == re_study.lesson_name => {
                    if re_study.is_fulfilled(now) {
                        debug!(lesson = %re_study.lesson_name, "re-study time fulfilled");
                        state.re_study = None;
                        state.just_exited_re_study = true;
                        // Fall through to linear selection; the flag keeps
                        // the pick below out of re-study.
                    } else if current.kind == LessonType::Video {
                        return Action::ResumePlayback(current.clone());
                    } else {
                        return Action::NoOp;
                    }
                }
                _ => {
                    // Off the tracked lesson: steer back before anything else.
                    if let Some(target) = view.find_by_name(&re_study.lesson_name) {
                        return Action::NavigateTo(target.clone());
                    }
                    warn!(
                        lesson = %re_study.lesson_name,
                        "re-study lesson missing from snapshot, abandoning rotation"
                    );
                    state.re_study = None;
                }
            }
        }

        if let Some(action) = self.pick_linear(&view) {
            return action;
        }

        // Every lesson with tracked time is finished.
        if state.just_exited_re_study {
            // Fresh out of re-study: restart linearly rather than rotating
            // again. The flag stays up until the next manual enable.
            return match view.first_target() {
                Some(target) => Action::NavigateTo(target.clone()),
                None => Action::Stop,
            };
        }

        if let Some(target) = view.first_completed_target() {
            let seconds = target.study_time.unwrap_or_default();
            debug!(lesson = %target.display_name, seconds, "entering re-study");
            state.re_study = Some(ReStudy::new(&target.display_name, now, seconds));
            return Action::NavigateTo(target.clone());
        }

        Action::Stop
    }

    /// Ordinary forward progression. `None` means nothing unfinished with
    /// tracked time remains anywhere in the snapshot.
    fn pick_linear(&self, view: &SnapshotView<'_>) -> Option<Action> {
        match view.current() {
            Some((index, current)) if current.status.is_complete() => view
                .next_unfinished_target_after(Some(index))
                .map(|(_, target)| Action::NavigateTo(target.clone())),
            Some((_, current)) => {
                if current.study_time.is_none() || current.kind == LessonType::Cover {
                    // Untracked unit: study-time lessons always take
                    // priority over riding it out.
                    view.first_unfinished_target()
                        .map(|target| Action::NavigateTo(target.clone()))
                } else if current.kind == LessonType::Video {
                    Some(Action::ResumePlayback(current.clone()))
                } else {
                    // Tracked quiz/document: page-side interaction drives
                    // it; hold position until the status changes.
                    Some(Action::NoOp)
                }
            }
            None => view
                .next_unfinished_target_after(None)
                .map(|(_, target)| Action::NavigateTo(target.clone())),
        }
    }
}
