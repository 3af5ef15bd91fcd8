//! Fetch error type shared by transports and the timed fetch.

use std::time::Duration;
use thiserror::Error;

/// Error returned by a single fetch attempt, or by the timed fetch once its
/// retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No transport was configured, so nothing can be fetched.
    #[error("no transport available")]
    NoTransport,
    /// The URL could not be handed to the transport.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The attempt did not finish before its deadline.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    /// Connection, DNS, TLS or transfer failure.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status where one was required.
    #[error("HTTP {0}")]
    Http(u32),
}
