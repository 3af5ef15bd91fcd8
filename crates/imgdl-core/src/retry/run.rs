//! Retry loop: run an async attempt until success or policy says stop.

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};
use std::future::Future;

/// Runs `attempt_fn` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// The closure receives the 1-based attempt number. The last error is
/// returned once retries are exhausted.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut attempt_fn: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1u32;
    loop {
        match attempt_fn(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!("attempt {} failed ({}), retrying in {:?}", attempt, e, d);
                        tokio::time::sleep(d).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_one_failure() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let out = run_with_retry(&policy, |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(FetchError::Network("reset".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(out, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_last_error_when_exhausted() {
        let policy = RetryPolicy {
            retries: 2,
            backoff_step: Duration::from_millis(50),
        };
        let out: Result<(), _> = run_with_retry(&policy, |attempt| async move {
            Err(FetchError::Network(format!("fail {attempt}")))
        })
        .await;
        assert_eq!(out, Err(FetchError::Network("fail 3".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_is_linear() {
        let policy = RetryPolicy {
            retries: 2,
            backoff_step: Duration::from_millis(50),
        };
        let start = tokio::time::Instant::now();
        let _: Result<(), _> =
            run_with_retry(&policy, |_| async { Err(FetchError::Timeout(Duration::ZERO)) }).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(150));
        assert!(elapsed < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn fatal_is_not_retried() {
        let calls = AtomicU32::new(0);
        let out: Result<(), _> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::NoTransport) }
        })
        .await;
        assert_eq!(out, Err(FetchError::NoTransport));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
