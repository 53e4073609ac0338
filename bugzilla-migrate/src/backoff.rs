//! Bounded polling with exponential backoff.
//!
//! The import API answers asynchronously, so the job status is re-requested
//! with a growing delay until it settles. Sleeping goes through [`Sleeper`]
//! so the schedule can be observed in tests without waiting.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Something that can pause the current task.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Delay schedule for [`poll_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the first poll.
    pub initial: Duration,

    /// Factor applied to the delay after every poll.
    pub multiplier: u32,

    /// Maximum number of polls.
    pub max_attempts: u32,
}

impl Default for Backoff {
    /// 1s, 2s, 4s, ... for at most 12 polls (a little over an hour in total).
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            multiplier: 2,
            max_attempts: 12,
        }
    }
}

impl Backoff {
    /// Delay before the given zero-based attempt.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.initial
            .saturating_mul(self.multiplier.saturating_pow(attempt))
    }
}

/// Errors returned by [`poll_until`].
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// Fetching the state failed.
    #[error(transparent)]
    Fetch(E),

    /// The state did not settle within the attempt budget.
    #[error("State did not settle after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Sleeps, fetches, and repeats until `is_settled` accepts the fetched value.
///
/// The delay starts at `backoff.initial` and is multiplied after every
/// attempt. Fetch errors are returned immediately without retrying.
///
/// # Errors
///
/// Returns [`PollError::Fetch`] if `fetch` fails and [`PollError::Exhausted`]
/// once `backoff.max_attempts` polls did not settle.
pub async fn poll_until<T, E, F, Fut, P>(
    backoff: Backoff,
    sleeper: &dyn Sleeper,
    mut fetch: F,
    is_settled: P,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
{
    for attempt in 0..backoff.max_attempts {
        let delay = backoff.delay(attempt);
        debug!(attempt, delay_secs = delay.as_secs_f64(), "Waiting before poll");
        sleeper.sleep(delay).await;

        let value = fetch().await.map_err(PollError::Fetch)?;
        if is_settled(&value) {
            return Ok(value);
        }
    }

    Err(PollError::Exhausted {
        attempts: backoff.max_attempts,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records requested delays instead of sleeping.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSleeper {
        pub(crate) delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    #[test]
    fn delay_doubles() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(0), Duration::from_secs(1));
        assert_eq!(backoff.delay(1), Duration::from_secs(2));
        assert_eq!(backoff.delay(4), Duration::from_secs(16));
    }

    #[tokio::test]
    async fn polls_until_settled() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;

        let result: Result<u32, PollError<()>> = poll_until(
            Backoff::default(),
            &sleeper,
            || {
                calls += 1;
                let value = calls;
                async move { Ok(value) }
            },
            |value| *value == 3,
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let sleeper = RecordingSleeper::default();
        let backoff = Backoff {
            initial: Duration::from_millis(10),
            multiplier: 3,
            max_attempts: 2,
        };

        let result: Result<u32, PollError<()>> =
            poll_until(backoff, &sleeper, || async { Ok(0) }, |_| false).await;

        assert!(matches!(result, Err(PollError::Exhausted { attempts: 2 })));
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_millis(10), Duration::from_millis(30)]
        );
    }

    #[tokio::test]
    async fn fetch_errors_stop_polling() {
        let sleeper = RecordingSleeper::default();

        let result: Result<u32, PollError<&str>> =
            poll_until(Backoff::default(), &sleeper, || async { Err("boom") }, |_| true).await;

        assert!(matches!(result, Err(PollError::Fetch("boom"))));
        assert_eq!(sleeper.delays.lock().unwrap().len(), 1);
    }
}
