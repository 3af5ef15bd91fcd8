//! HTTP metadata probing.
//!
//! A [`Transport`] performs one request and reports the headers we care
//! about (`Content-Type`, `Content-Disposition`, `Content-Length`).
//! [`fetch_with_timeout`] bounds each attempt and retries transient failures;
//! [`probe_headers`] adds the ranged-GET fallback for servers whose HEAD
//! answers are empty. The libcurl binding lives in [`CurlTransport`].

mod parse;
mod timed;
mod transport;

use std::time::Duration;

pub use timed::{fetch_with_timeout, probe_headers, FetchOptions, RANGE_PROBE_BYTES};
pub use transport::{CurlTransport, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

/// One outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    /// Extra headers as (name, value).
    pub headers: Vec<(String, String)>,
    /// Per-attempt deadline the transport should enforce itself, if it can.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn head(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: Method::Head,
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// `GET` for the first `len` bytes only.
    pub fn ranged_get(url: &str, len: u64) -> Self {
        Self {
            url: url.to_string(),
            method: Method::Get,
            headers: vec![("Range".to_string(), format!("bytes=0-{}", len.saturating_sub(1)))],
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Response metadata: status and the headers used for filename inference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResult {
    /// Final HTTP status after redirects.
    pub status: u32,
    /// `Content-Type` value if present.
    pub content_type: Option<String>,
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
}

impl HeadResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
