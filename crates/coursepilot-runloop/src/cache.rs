//! Snapshot caching.
//!
//! Extraction walks the page's lesson DOM and is the most expensive thing
//! the controller does, so reads inside a short freshness window are served
//! from the last result. The external page-change detector calls
//! [`CachingSnapshotProvider::invalidate`] whenever the lesson list mutates.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use coursepilot_protocols::LessonRecord;

use crate::error::ControllerResult;
use crate::traits::LessonSnapshotProvider;

struct CachedSnapshot {
    taken_at: Instant,
    lessons: Vec<LessonRecord>,
}

/// Get-or-refresh wrapper around a snapshot provider.
///
/// Empty extractions are never cached: an empty list usually means the page
/// is mid-render, and serving it for a whole window would starve the retry
/// path.
pub struct CachingSnapshotProvider {
    inner: Arc<dyn LessonSnapshotProvider>,
    ttl: Duration,
    slot: Mutex<Option<CachedSnapshot>>,
}

impl CachingSnapshotProvider {
    pub fn new(inner: Arc<dyn LessonSnapshotProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Drop the cached snapshot; the next read goes to the page.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock();
        if slot.take().is_some() {
            debug!("snapshot cache invalidated");
        }
    }

    fn cached(&self) -> Option<Vec<LessonRecord>> {
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|cached| cached.taken_at.elapsed() < self.ttl)
            .map(|cached| cached.lessons.clone())
    }
}

#[async_trait]
impl LessonSnapshotProvider for CachingSnapshotProvider {
    async fn extract(&self) -> ControllerResult<Vec<LessonRecord>> {
        if let Some(lessons) = self.cached() {
            return Ok(lessons);
        }

        let lessons = self.inner.extract().await?;
        if !lessons.is_empty() {
            let mut slot = self.slot.lock();
            *slot = Some(CachedSnapshot {
                taken_at: Instant::now(),
                lessons: lessons.clone(),
            });
        }
        Ok(lessons)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use coursepilot_protocols::{LessonStatus, LessonType};

    use super::*;

    struct CountingProvider {
        calls: AtomicU32,
    }

    impl CountingProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl LessonSnapshotProvider for CountingProvider {
        async fn extract(&self) -> ControllerResult<Vec<LessonRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                LessonRecord::new("L1", LessonType::Video, LessonStatus::NotStarted)
                    .with_study_time(60),
            ])
        }
    }

    struct EmptyProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl LessonSnapshotProvider for EmptyProvider {
        async fn extract(&self) -> ControllerResult<Vec<LessonRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fresh_reads_hit_cache() {
        let inner = CountingProvider::new();
        let cache = CachingSnapshotProvider::new(inner.clone(), Duration::from_secs(60));

        cache.extract().await.unwrap();
        cache.extract().await.unwrap();
        cache.extract().await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let inner = CountingProvider::new();
        let cache = CachingSnapshotProvider::new(inner.clone(), Duration::from_secs(60));

        cache.extract().await.unwrap();
        cache.invalidate();
        cache.extract().await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_window_refreshes() {
        let inner = CountingProvider::new();
        let cache = CachingSnapshotProvider::new(inner.clone(), Duration::from_millis(10));

        cache.extract().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.extract().await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_results_are_not_cached() {
        let inner = Arc::new(EmptyProvider {
            calls: AtomicU32::new(0),
        });
        let cache = CachingSnapshotProvider::new(inner.clone(), Duration::from_secs(60));

        assert!(cache.extract().await.unwrap().is_empty());
        assert!(cache.extract().await.unwrap().is_empty());

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
