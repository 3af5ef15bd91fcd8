//! Retry and backoff policy for network probes.
//!
//! This module encapsulates error classification (timeouts, connection
//! failures, fatal setup errors) and linear backoff decisions for the timed
//! fetch.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
