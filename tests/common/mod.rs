#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use coursepilot::{
    AutoLearnConfig, ControllerResult, LessonRecord, LessonSnapshotProvider, LessonStatus,
    LessonType, NavigationActuator, PlaybackDriver, StartupConfig,
};

/// Scripted stand-in for the course page.
///
/// Navigation moves the current marker (and starts the lesson); resuming a
/// current video twice completes it, so the controller can drive a course
/// from start to finish at test speed.
pub struct SimulatedPage {
    lessons: Mutex<Vec<LessonRecord>>,
    resumes: Mutex<HashMap<String, u32>>,
    clicks: Mutex<Vec<String>>,
}

impl SimulatedPage {
    pub fn new(lessons: Vec<LessonRecord>) -> Arc<Self> {
        Arc::new(Self {
            lessons: Mutex::new(lessons),
            resumes: Mutex::new(HashMap::new()),
            clicks: Mutex::new(Vec::new()),
        })
    }

    pub fn snapshot(&self) -> Vec<LessonRecord> {
        self.lessons.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn status_of(&self, name: &str) -> Option<LessonStatus> {
        self.lessons
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.display_name == name)
            .map(|l| l.status)
    }
}

#[async_trait]
impl LessonSnapshotProvider for SimulatedPage {
    async fn extract(&self) -> ControllerResult<Vec<LessonRecord>> {
        Ok(self.snapshot())
    }
}

#[async_trait]
impl NavigationActuator for SimulatedPage {
    async fn navigate(&self, lesson: &LessonRecord) -> ControllerResult<bool> {
        let mut lessons = self.lessons.lock().unwrap();
        if !lessons.iter().any(|l| l.display_name == lesson.display_name) {
            return Ok(false);
        }
        for entry in lessons.iter_mut() {
            entry.is_current = entry.display_name == lesson.display_name;
            if entry.is_current && entry.status == LessonStatus::NotStarted {
                entry.status = LessonStatus::InProgress;
            }
        }
        self.clicks
            .lock()
            .unwrap()
            .push(lesson.display_name.clone());
        Ok(true)
    }
}

#[async_trait]
impl PlaybackDriver for SimulatedPage {
    async fn resume(&self) -> ControllerResult<()> {
        let mut lessons = self.lessons.lock().unwrap();
        if let Some(current) = lessons.iter_mut().find(|l| l.is_current) {
            if current.kind == LessonType::Video {
                let mut resumes = self.resumes.lock().unwrap();
                let count = resumes.entry(current.display_name.clone()).or_insert(0);
                *count += 1;
                if *count >= 2 {
                    current.status = LessonStatus::Complete;
                }
            }
        }
        Ok(())
    }

    async fn set_rate(&self, _rate: f32) -> ControllerResult<()> {
        Ok(())
    }
}

/// Controller config scaled down to test speed.
pub fn fast_config() -> AutoLearnConfig {
    AutoLearnConfig {
        poll_interval_ms: 10,
        extract_attempts: 2,
        extract_retry_delay_ms: 1,
        max_consecutive_errors: 3,
        error_cooldown_ms: 40,
        playback_rate: 2.0,
        snapshot_ttl_ms: 0,
        startup: StartupConfig {
            lesson_wait_timeout_ms: 200,
            lesson_wait_poll_ms: 5,
            max_init_retries: 2,
            init_retry_delay_ms: 5,
        },
    }
}

/// Poll a condition until it holds or the timeout elapses.
pub async fn wait_until<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

pub fn video(name: &str, seconds: u32) -> LessonRecord {
    LessonRecord::new(name, LessonType::Video, LessonStatus::NotStarted).with_study_time(seconds)
}

pub fn cover(name: &str) -> LessonRecord {
    LessonRecord::new(name, LessonType::Cover, LessonStatus::NotStarted)
}

pub fn untracked_doc(name: &str) -> LessonRecord {
    LessonRecord::new(name, LessonType::Document, LessonStatus::NotStarted)
}
