use chrono::Duration as ChronoDuration;

use coursepilot_protocols::{LessonRecord, LessonStatus, LessonType};

use super::*;
use crate::clock::fixed_now;

fn video(name: &str, status: LessonStatus) -> LessonRecord {
    LessonRecord::new(name, LessonType::Video, status).with_study_time(120)
}

fn quiz(name: &str, status: LessonStatus) -> LessonRecord {
    LessonRecord::new(name, LessonType::Quiz, status).with_study_time(300)
}

fn doc_untracked(name: &str, status: LessonStatus) -> LessonRecord {
    LessonRecord::new(name, LessonType::Document, status)
}

fn cover(name: &str) -> LessonRecord {
    LessonRecord::new(name, LessonType::Cover, LessonStatus::NotStarted)
}

fn engine() -> ProgressionEngine {
    ProgressionEngine::with_clock(Clock::fixed(fixed_now()))
}

fn navigate_target(action: &Action) -> &str {
    match action {
        Action::NavigateTo(lesson) => &lesson.display_name,
        other => panic!("expected NavigateTo, got {other:?}"),
    }
}

#[test]
fn test_fresh_video_resumes_playback() {
    let lessons = vec![
        LessonRecord::new("Intro", LessonType::Video, LessonStatus::NotStarted)
            .with_study_time(120)
            .current(),
    ];
    let mut state = ProgressionState::new();

    match engine().decide(&lessons, &mut state) {
        Action::ResumePlayback(lesson) => assert_eq!(lesson.display_name, "Intro"),
        other => panic!("expected ResumePlayback, got {other:?}"),
    }
}

#[test]
fn test_tracked_quiz_waits_in_place() {
    let lessons = vec![quiz("Q1", LessonStatus::InProgress).current()];
    let mut state = ProgressionState::new();
    let eng = engine();

    // Page-side interaction drives quizzes; the engine holds position, and
    // keeps holding it on identical snapshots.
    for _ in 0..5 {
        assert_eq!(eng.decide(&lessons, &mut state), Action::NoOp);
    }
    assert_eq!(state.re_study, None);
    assert!(!state.just_exited_re_study);
}

#[test]
fn test_complete_current_advances_forward() {
    let lessons = vec![
        video("a", LessonStatus::Complete).current(),
        cover("ch2"),
        video("b", LessonStatus::NotStarted),
    ];
    let mut state = ProgressionState::new();
    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "b");
}

#[test]
fn test_forward_search_wraps_to_start() {
    let lessons = vec![
        video("a", LessonStatus::NotStarted),
        video("b", LessonStatus::Complete).current(),
    ];
    let mut state = ProgressionState::new();
    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "a");
}

#[test]
fn test_no_current_picks_first_unfinished() {
    let lessons = vec![
        cover("ch1"),
        video("a", LessonStatus::Complete),
        video("b", LessonStatus::InProgress),
    ];
    let mut state = ProgressionState::new();
    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "b");
}

#[test]
fn test_untracked_current_prefers_study_time_lesson() {
    // The stricter of the two source behaviors: a current unit without
    // tracked time never holds the loop while a tracked one is unfinished.
    let lessons = vec![
        doc_untracked("notes", LessonStatus::InProgress).current(),
        video("a", LessonStatus::NotStarted),
    ];
    let mut state = ProgressionState::new();
    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "a");
}

#[test]
fn test_locked_lessons_are_skipped() {
    let lessons = vec![
        video("locked", LessonStatus::Locked),
        video("open", LessonStatus::NotStarted),
    ];
    let mut state = ProgressionState::new();
    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "open");
}

#[test]
fn test_all_locked_stops() {
    let lessons = vec![
        video("a", LessonStatus::Locked),
        video("b", LessonStatus::Locked),
    ];
    let mut state = ProgressionState::new();
    assert_eq!(engine().decide(&lessons, &mut state), Action::Stop);
}

#[test]
fn test_termination_without_any_study_time() {
    let lessons = vec![
        cover("ch1"),
        doc_untracked("notes", LessonStatus::NotStarted).current(),
    ];

    // Regardless of carried state, including a stale re-study rotation.
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("gone", fixed_now(), 60));

    assert_eq!(engine().decide(&lessons, &mut state), Action::Stop);
    assert_eq!(state.re_study, None);
}

#[test]
fn test_empty_snapshot_stops() {
    let mut state = ProgressionState::new();
    assert_eq!(engine().decide(&[], &mut state), Action::Stop);
}

#[test]
fn test_re_study_entry_selects_first_completed() {
    let lessons = vec![
        video("L1", LessonStatus::Complete),
        video("L2", LessonStatus::Complete),
    ];
    let mut state = ProgressionState::new();
    let action = engine().decide(&lessons, &mut state);

    assert_eq!(navigate_target(&action), "L1");
    let re_study = state.re_study.as_ref().expect("re-study should be active");
    assert_eq!(re_study.lesson_name, "L1");
    assert_eq!(re_study.target, std::time::Duration::from_secs(120));
}

#[test]
fn test_re_study_selection_is_deterministic() {
    let lessons = vec![
        video("A", LessonStatus::Complete),
        video("B", LessonStatus::Complete),
        video("C", LessonStatus::Complete),
    ];
    for _ in 0..10 {
        let mut state = ProgressionState::new();
        let action = engine().decide(&lessons, &mut state);
        assert_eq!(navigate_target(&action), "A");
    }
}

#[test]
fn test_re_study_resumes_video_until_fulfilled() {
    let lessons = vec![video("L1", LessonStatus::Complete).current()];
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("L1", fixed_now(), 120));

    match engine().decide(&lessons, &mut state) {
        Action::ResumePlayback(lesson) => assert_eq!(lesson.display_name, "L1"),
        other => panic!("expected ResumePlayback, got {other:?}"),
    }
    assert!(state.re_study.is_some());
}

#[test]
fn test_re_study_non_video_waits() {
    let lessons = vec![quiz("Q1", LessonStatus::Complete).current()];
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("Q1", fixed_now(), 300));

    assert_eq!(engine().decide(&lessons, &mut state), Action::NoOp);
}

#[test]
fn test_re_study_off_track_steers_back() {
    let lessons = vec![
        video("L1", LessonStatus::Complete).current(),
        video("L2", LessonStatus::Complete),
    ];
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("L2", fixed_now(), 120));

    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "L2");
    assert!(state.re_study.is_some());
}

#[test]
fn test_re_study_missing_lesson_abandons_rotation() {
    let lessons = vec![
        video("a", LessonStatus::NotStarted),
        video("b", LessonStatus::Complete),
    ];
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("gone", fixed_now(), 60));

    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "a");
    assert_eq!(state.re_study, None);
}

#[test]
fn test_re_study_exit_on_fulfillment() {
    // Rotation started 61 seconds ago against a 60 second target.
    let started = fixed_now() - ChronoDuration::seconds(61);
    let lessons = vec![
        video("L1", LessonStatus::Complete).current(),
        video("L2", LessonStatus::Complete),
    ];
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("L1", started, 60));

    let action = engine().decide(&lessons, &mut state);

    // Exit produces the linear restart pick, not a fresh rotation.
    assert_eq!(navigate_target(&action), "L1");
    assert_eq!(state.re_study, None);
    assert!(state.just_exited_re_study);
}

#[test]
fn test_no_immediate_re_entry_after_exit() {
    let started = fixed_now() - ChronoDuration::seconds(61);
    let lessons = vec![
        video("L1", LessonStatus::Complete).current(),
        video("L2", LessonStatus::Complete),
    ];
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("L1", started, 60));

    let eng = engine();
    let _ = eng.decide(&lessons, &mut state);
    assert_eq!(state.re_study, None);

    // Every following tick keeps choosing linearly while the flag is up,
    // even though all lessons still read complete.
    for _ in 0..3 {
        let action = eng.decide(&lessons, &mut state);
        assert_eq!(navigate_target(&action), "L1");
        assert_eq!(state.re_study, None);
        assert!(state.just_exited_re_study);
    }
}

#[test]
fn test_re_study_exit_prefers_real_unfinished_content() {
    // New unfinished content appeared while re-studying; exit goes there.
    let started = fixed_now() - ChronoDuration::seconds(61);
    let lessons = vec![
        video("L1", LessonStatus::Complete).current(),
        video("new", LessonStatus::NotStarted),
    ];
    let mut state = ProgressionState::new();
    state.re_study = Some(ReStudy::new("L1", started, 60));

    let action = engine().decide(&lessons, &mut state);
    assert_eq!(navigate_target(&action), "new");
    assert_eq!(state.re_study, None);
}

#[test]
fn test_untracked_current_with_everything_done_enters_re_study() {
    let lessons = vec![
        doc_untracked("notes", LessonStatus::InProgress).current(),
        video("L1", LessonStatus::Complete),
    ];
    let mut state = ProgressionState::new();
    let action = engine().decide(&lessons, &mut state);

    assert_eq!(navigate_target(&action), "L1");
    assert!(state.re_study.is_some());
}

#[test]
fn test_duplicate_current_flags_use_first() {
    let lessons = vec![
        video("a", LessonStatus::InProgress).current(),
        video("b", LessonStatus::InProgress).current(),
    ];
    let mut state = ProgressionState::new();
    match engine().decide(&lessons, &mut state) {
        Action::ResumePlayback(lesson) => assert_eq!(lesson.display_name, "a"),
        other => panic!("expected ResumePlayback, got {other:?}"),
    }
}

#[test]
fn test_action_target_accessor() {
    let lesson = video("a", LessonStatus::NotStarted);
    assert_eq!(Action::NavigateTo(lesson.clone()).target(), Some("a"));
    assert_eq!(Action::ResumePlayback(lesson).target(), Some("a"));
    assert_eq!(Action::NoOp.target(), None);
    assert_eq!(Action::Stop.target(), None);
}
