//! Deadline-bounded fetch with linear-backoff retries.

use std::time::Duration;

use super::{HeadResult, HttpRequest, Transport};
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

/// Bytes requested by the ranged GET fallback.
pub const RANGE_PROBE_BYTES: u64 = 1024;

/// Deadline and retry budget for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Deadline for each attempt.
    pub timeout: Duration,
    /// Additional attempts after the first.
    pub retries: u32,
    /// Linear backoff unit: the wait after failed attempt `n` is `n * step`.
    pub backoff_step: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            retries: 1,
            backoff_step: Duration::from_millis(50),
        }
    }
}

impl FetchOptions {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            backoff_step: self.backoff_step,
        }
    }
}

/// Sends `request` through `transport`, bounding each attempt by
/// `options.timeout` and retrying network errors and timeouts.
///
/// A timed-out attempt is dropped, which cancels it. Any HTTP status counts
/// as a response; only transport failures are retried. Without a transport
/// this fails with [`FetchError::NoTransport`]. After the last attempt its
/// error is returned.
pub async fn fetch_with_timeout(
    transport: Option<&dyn Transport>,
    request: &HttpRequest,
    options: &FetchOptions,
) -> Result<HeadResult, FetchError> {
    let transport = transport.ok_or(FetchError::NoTransport)?;
    let request = request.clone().with_timeout(options.timeout);
    let request = &request;

    run_with_retry(&options.retry_policy(), |attempt| async move {
        tracing::debug!("{:?} {} (attempt {})", request.method, request.url, attempt);
        match tokio::time::timeout(options.timeout, transport.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(options.timeout)),
        }
    })
    .await
}

/// HEAD probe with a ranged-GET fallback.
///
/// Headers from non-2xx answers are ignored. When the HEAD answer carries no
/// `Content-Type`, a `GET` for the first [`RANGE_PROBE_BYTES`] bytes is tried;
/// its failure leaves the HEAD result in place. Only a failed HEAD is an error.
pub async fn probe_headers(
    transport: Option<&dyn Transport>,
    url: &str,
    options: &FetchOptions,
) -> Result<HeadResult, FetchError> {
    let head = fetch_with_timeout(transport, &HttpRequest::head(url), options).await?;
    let head = if head.is_success() {
        head
    } else {
        tracing::debug!("HEAD {} returned HTTP {}", url, head.status);
        HeadResult {
            status: head.status,
            ..HeadResult::default()
        }
    };
    if head.content_type.is_some() {
        return Ok(head);
    }

    let ranged = HttpRequest::ranged_get(url, RANGE_PROBE_BYTES);
    match fetch_with_timeout(transport, &ranged, options).await {
        Ok(get) if get.is_success() => Ok(HeadResult {
            status: get.status,
            content_type: get.content_type,
            content_disposition: head.content_disposition.or(get.content_disposition),
        }),
        Ok(get) => {
            tracing::debug!("ranged GET {} returned HTTP {}", url, get.status);
            Ok(head)
        }
        Err(e) => {
            tracing::debug!("ranged GET {} failed: {}", url, e);
            Ok(head)
        }
    }
}
