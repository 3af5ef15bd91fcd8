//! Classify fetch and curl errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::ErrorKind;
use std::time::Duration;

/// Classify a fetch error for retry decisions.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Timeout(_) => ErrorKind::Timeout,
        FetchError::Network(_) => ErrorKind::Connection,
        FetchError::Http(code) if (500..=599).contains(code) || *code == 429 => {
            ErrorKind::Connection
        }
        FetchError::NoTransport | FetchError::InvalidUrl(_) | FetchError::Http(_) => {
            ErrorKind::Fatal
        }
    }
}

/// Map a curl error onto a fetch error. `deadline` is reported for timeouts.
pub fn classify_curl_error(e: &curl::Error, deadline: Duration) -> FetchError {
    if e.is_operation_timedout() {
        return FetchError::Timeout(deadline);
    }
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return FetchError::InvalidUrl(e.to_string());
    }
    FetchError::Network(e.to_string())
}
