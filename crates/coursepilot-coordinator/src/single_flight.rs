//! In-flight-future memoization.
//!
//! A load that is already in progress must be awaited by any concurrent
//! caller rather than started a second time. Once the run finishes the slot
//! clears, so a later call starts fresh.

use std::future::Future;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;

/// Shares one in-flight run among concurrent callers.
///
/// The result type must be `Clone` because every waiter receives it.
pub struct SingleFlight<T: Clone + Send + Sync + 'static> {
    slot: Mutex<Option<Shared<BoxFuture<'static, T>>>>,
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Whether a run is currently in flight.
    pub async fn is_in_flight(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Join the in-flight run, or start one with `make` if none exists.
    ///
    /// `make` is only invoked by the caller that actually starts the run.
    pub async fn run<F, Fut>(&self, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut slot = self.slot.lock().await;
            match slot.as_ref() {
                Some(shared) => shared.clone(),
                None => {
                    let shared = make().boxed().shared();
                    *slot = Some(shared.clone());
                    shared
                }
            }
        };

        let result = shared.clone().await;

        // Clear the slot so the next call starts a fresh run. Another
        // caller may have raced a new run in; only clear our own.
        let mut slot = self.slot.lock().await;
        if let Some(current) = slot.as_ref() {
            if current.ptr_eq(&shared) {
                *slot = None;
            }
        }

        result
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_run() {
        let flight = Arc::new(SingleFlight::<u32>::new());
        let runs = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let flight = flight.clone();
            let runs = runs.clone();
            handles.push(tokio::spawn(async move {
                flight
                    .run(move || async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        42
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1, "only one run should start");
    }

    #[tokio::test]
    async fn test_sequential_calls_start_fresh_runs() {
        let flight = SingleFlight::<u32>::new();
        let runs = Arc::new(AtomicU32::new(0));

        for expected in 1..=3 {
            let runs = runs.clone();
            let value = flight
                .run(move || async move { runs.fetch_add(1, Ordering::SeqCst) + 1 })
                .await;
            assert_eq!(value, expected);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert!(!flight.is_in_flight().await);
    }
}
