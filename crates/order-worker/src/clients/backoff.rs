//! # Retry with Exponential Backoff
//!
//! `delay(n) = initial_interval * multiplier^n`, scaled by a random factor in
//! `[1 - jitter, 1 + jitter]`. `n` counts retries and starts at 0.

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry budget for one call against an external service.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Retries allowed after the first call. `0` disables retrying.
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub multiplier: f64,
    /// Fraction of each delay that is randomized, clamped to `[0, 1]`.
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_millis(500),
            multiplier: 2.0,
            jitter: Self::DEFAULT_JITTER,
        }
    }
}

impl BackoffPolicy {
    pub const DEFAULT_JITTER: f64 = 0.5;

    /// Delay before retry `retry` with jitter removed.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Delay before retry `retry` with a fresh random jitter.
    pub fn delay(&self, retry: u32) -> Duration {
        let unit = rand::thread_rng().gen_range(-1.0..=1.0);
        self.delay_with(retry, unit)
    }

    /// Delay before retry `retry` for a given position `unit` in `[-1, 1]` of the jitter band.
    pub fn delay_with(&self, retry: u32, unit: f64) -> Duration {
        let spread = self.jitter.clamp(0.0, 1.0) * unit.clamp(-1.0, 1.0);
        let base = self.base_delay(retry);
        Duration::try_from_secs_f64(base.as_secs_f64() * (1.0 + spread)).unwrap_or(base)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent. The closure receives the zero-based attempt number.
    ///
    /// The error of the last attempt is returned unchanged.
    pub async fn retry<T, E, F, Fut>(
        &self,
        mut operation: F,
        is_retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    let delay = self.delay(attempt);
                    warn!(attempt, ?delay, error = %e, "Transient failure, backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy(max_attempts: u32) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts,
            initial_interval: Duration::from_millis(100),
            multiplier: 2.0,
            jitter: 0.5,
        }
    }

    #[test]
    fn test_base_delay_is_exponential() {
        let policy = policy(3);
        assert_eq!(policy.base_delay(0), Duration::from_millis(100));
        assert_eq!(policy.base_delay(1), Duration::from_millis(200));
        assert_eq!(policy.base_delay(2), Duration::from_millis(400));
        assert_eq!(policy.base_delay(3), Duration::from_millis(800));
    }

    fn assert_close(actual: Duration, expected: Duration) {
        let diff = actual.abs_diff(expected);
        assert!(diff < Duration::from_micros(1), "{actual:?} != {expected:?}");
    }

    #[test]
    fn test_jitter_stays_within_half_of_base() {
        let policy = policy(3);
        assert_close(policy.delay_with(1, -1.0), Duration::from_millis(100));
        assert_close(policy.delay_with(1, 0.0), Duration::from_millis(200));
        assert_close(policy.delay_with(1, 1.0), Duration::from_millis(300));

        let slack = Duration::from_micros(1);
        for retry in 0..4 {
            let base = policy.base_delay(retry);
            for _ in 0..50 {
                let delay = policy.delay(retry);
                assert!(
                    delay + slack >= base / 2 && delay <= base * 3 / 2 + slack,
                    "{delay:?} vs {base:?}"
                );
            }
        }
    }

    #[test]
    fn test_huge_exponent_saturates() {
        let policy = policy(3);
        assert_eq!(policy.base_delay(u32::MAX), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_budget_spent() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), String> = policy(3)
            .retry(
                |_| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err("503".to_string())
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Err("503".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 4, "first call plus 3 retries");
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), String> = policy(3)
            .retry(
                |_| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err("404".to_string())
                    }
                },
                |e| e != "404",
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_at_least_the_jitter_floor() {
        let start = tokio::time::Instant::now();

        let result: Result<u32, String> = policy(3)
            .retry(
                |attempt| async move {
                    if attempt < 2 {
                        Err("timeout".to_string())
                    } else {
                        Ok(attempt)
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Ok(2));
        // Two sleeps: at least 50ms + 100ms with maximal negative jitter.
        assert!(start.elapsed() >= Duration::from_millis(150));
    }
}
