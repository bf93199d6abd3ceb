//! Generic exponential-backoff-with-jitter retry combinator.
//!
//! Wraps a fallible async operation instead of re-implementing backoff at
//! each transport call site (search provider, LLM provider). Grounded in
//! `query_serper.py`'s `_google_serper_api_results` retry loop: base delay
//! 1-10s, doubling on each failure, capped at 600s, up to `max_attempts`
//! tries.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Parameters for [`with_backoff`].
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Maximum number of attempts before giving up.
    pub max_attempts: u32,
    /// Lower bound of the initial random delay.
    pub base_delay: Duration,
    /// Upper bound any computed delay is clamped to.
    pub max_delay: Duration,
}

impl BackoffPolicy {
    /// The search transport's policy (Section 4.E): base 1-10s, doubling,
    /// capped at 600s, up to 20 attempts.
    #[must_use]
    pub const fn search_default() -> Self {
        Self {
            max_attempts: 20,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(600),
        }
    }
}

/// Runs `op` until it succeeds or `policy.max_attempts` is exhausted,
/// sleeping between attempts with full jitter and exponential doubling.
///
/// The first failed attempt sleeps a uniformly random duration in
/// `[base_delay, 10 * base_delay]` (seconds); each subsequent failure
/// doubles that sleep, capped at `max_delay`. Returns the last error if
/// every attempt fails.
pub async fn with_backoff<T, E, F, Fut>(policy: BackoffPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut sleep_time = Duration::ZERO;
    let mut last_err = None;

    for attempt in 0..policy.max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                last_err = Some(err);
                if attempt + 1 >= policy.max_attempts {
                    break;
                }
                sleep_time = next_sleep(sleep_time, policy);
                tokio::time::sleep(sleep_time).await;
            }
        }
    }

    // `last_err` is populated on every loop iteration that enters the Err arm,
    // and the loop body always runs at least once for `max_attempts >= 1`.
    Err(last_err.unwrap_or_else(|| unreachable!("policy.max_attempts must be >= 1")))
}

fn next_sleep(previous: Duration, policy: BackoffPolicy) -> Duration {
    if previous.is_zero() {
        let secs = rand::thread_rng().gen_range(1.0..10.0_f64) * policy.base_delay.as_secs_f64();
        Duration::from_secs_f64(secs).min(policy.max_delay)
    } else {
        (previous * 2).min(policy.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_on_first_try() {
        let policy = BackoffPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        };
        let result: Result<i32, &str> = with_backoff(policy, || async { Ok(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let policy = BackoffPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        };
        let attempts = AtomicU32::new(0);
        let result: Result<i32, &str> = with_backoff(policy, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("not yet")
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_and_returns_last_error() {
        let policy = BackoffPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        };
        let attempts = AtomicU32::new(0);
        let result: Result<i32, &str> = with_backoff(policy, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err("always fails") }
        })
        .await;
        assert_eq!(result, Err("always fails"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_next_sleep_doubles_and_caps() {
        let policy = BackoffPolicy {
            max_attempts: 20,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(600),
        };
        let first = next_sleep(Duration::ZERO, policy);
        assert!(first >= Duration::from_secs(1) && first <= Duration::from_secs(10));
        let doubled = next_sleep(Duration::from_secs(400), policy);
        assert_eq!(doubled, Duration::from_secs(600));
    }
}
