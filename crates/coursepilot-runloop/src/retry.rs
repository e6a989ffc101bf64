//! Bounded retry with a fixed delay.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{ControllerError, ControllerResult};

/// Run `op` up to `attempts` times, sleeping `delay` between failures.
///
/// Fatal errors abort immediately; the last transient error is returned when
/// every attempt failed. The attempt number (1-based) is passed to `op`.
pub async fn retry_with_delay<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut op: F,
) -> ControllerResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ControllerResult<T>>,
{
    let attempts = attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                debug!(attempt, attempts, error = %err, "attempt failed");
                last_error = Some(err);
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| ControllerError::Internal("retry loop made no attempts".to_string())))
}
