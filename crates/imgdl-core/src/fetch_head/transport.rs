//! Transport seam and the libcurl binding.

use async_trait::async_trait;
use std::str;
use std::time::Duration;

use super::{parse, HeadResult, HttpRequest, Method};
use crate::retry::{classify_curl_error, FetchError};

/// Performs a single request. Implementations must not retry; the timed
/// fetch owns retries and deadlines.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HeadResult, FetchError>;
}

/// Body bytes accepted from a GET probe before the transfer is cut short.
const BODY_CAP: usize = 64 * 1024;

/// Used when a request carries no deadline of its own.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// libcurl transport. Each request runs on tokio's blocking pool, with curl's
/// own timeout set to the request deadline so an abandoned attempt is torn
/// down by curl rather than left running.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            user_agent: concat!("imgdl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HeadResult, FetchError> {
        let transport = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || transport.perform(&request))
            .await
            .map_err(|e| FetchError::Network(format!("transport task failed: {e}")))?
    }
}

impl CurlTransport {
    /// Runs in the current thread.
    fn perform(&self, request: &HttpRequest) -> Result<HeadResult, FetchError> {
        let deadline = request.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let curl_err = |e: curl::Error| classify_curl_error(&e, deadline);

        let mut lines: Vec<String> = Vec::new();
        let mut received = 0usize;
        let mut capped = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url).map_err(curl_err)?;
        match request.method {
            Method::Head => easy.nobody(true),
            Method::Get => easy.get(true),
        }
        .map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.connect_timeout(self.connect_timeout.min(deadline))
            .map_err(curl_err)?;
        easy.timeout(deadline).map_err(curl_err)?;
        easy.useragent(&self.user_agent).map_err(curl_err)?;

        if !request.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &request.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))
                    .map_err(curl_err)?;
            }
            easy.http_headers(list).map_err(curl_err)?;
        }

        let outcome = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        lines.push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(curl_err)?;
            transfer
                .write_function(|data| {
                    received += data.len();
                    if received > BODY_CAP {
                        // Headers are all we need; stop the body.
                        capped = true;
                        return Ok(0);
                    }
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform()
        };
        if let Err(e) = outcome {
            if !(capped && e.is_write_error()) {
                return Err(curl_err(e));
            }
        }

        let code = easy.response_code().map_err(curl_err)?;
        let mut result = parse::parse_headers(&lines);
        result.status = code;
        tracing::debug!(
            "{:?} {} -> HTTP {} type={:?}",
            request.method,
            request.url,
            code,
            result.content_type
        );
        Ok(result)
    }
}
