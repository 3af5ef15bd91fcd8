use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Attempt exceeded its deadline.
    Timeout,
    /// Network-level failure (connection reset, DNS, 5xx, etc.).
    Connection,
    /// Retrying cannot help (no transport, malformed URL, 4xx).
    Fatal,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Linear backoff: attempt `n` failing waits `backoff_step * n` before
/// attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub retries: u32,
    /// Delay unit multiplied by the failed attempt number.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            backoff_step: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts() {
            return RetryDecision::NoRetry;
        }
        match kind {
            ErrorKind::Fatal => RetryDecision::NoRetry,
            ErrorKind::Timeout | ErrorKind::Connection => {
                RetryDecision::RetryAfter(self.backoff_step.saturating_mul(attempt))
            }
        }
    }
}
