//! Page-context probe collaborator.
//!
//! The page side may know a better URL than the one the user clicked (a
//! larger `srcset` entry, the original behind a `data-` attribute) or a
//! filename for `data:` URLs. The resolver asks once; no answer, `ok: false`,
//! or a malformed answer all mean "no enrichment".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::srcset::best_from_srcset;
use crate::url_model::{basename_from_url, extension_from_content_type};

/// Request sent to the page side: `{"type":"probeImage","src":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub src: String,
}

impl ProbeRequest {
    pub fn probe_image(src: &str) -> Self {
        Self {
            kind: "probeImage".to_string(),
            src: src.to_string(),
        }
    }
}

/// Answer from the page side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProbeResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl PageProbeResult {
    /// Parses a raw answer. Malformed JSON is treated as no answer.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!("ignoring malformed probe answer: {}", e);
                None
            }
        }
    }

    /// Non-empty URL suggestion, if the answer is usable.
    pub fn suggested_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| self.ok && !u.is_empty())
    }

    /// Non-empty filename suggestion, if the answer is usable.
    pub fn suggested_filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| self.ok && !f.is_empty())
    }
}

/// Where the image was triggered from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// URL of the page, used to resolve relative candidates.
    pub page_url: Option<String>,
    /// Optional `srcset` of the element the user triggered on.
    pub srcset: Option<String>,
}

#[async_trait]
pub trait PageProbe: Send + Sync {
    async fn probe(&self, page: &PageContext, request: &ProbeRequest) -> Option<PageProbeResult>;
}

/// Never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

#[async_trait]
impl PageProbe for NoProbe {
    async fn probe(&self, _page: &PageContext, _request: &ProbeRequest) -> Option<PageProbeResult> {
        None
    }
}

/// Replays a fixed raw answer, e.g. one captured from a browser session.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    raw: String,
}

impl StaticProbe {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

#[async_trait]
impl PageProbe for StaticProbe {
    async fn probe(&self, _page: &PageContext, _request: &ProbeRequest) -> Option<PageProbeResult> {
        PageProbeResult::from_json(&self.raw)
    }
}

/// In-process stand-in for the page-side script: names `data:` URLs from
/// their MIME type and upgrades to the best `srcset` entry when one is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProbe;

#[async_trait]
impl PageProbe for LocalProbe {
    async fn probe(&self, page: &PageContext, request: &ProbeRequest) -> Option<PageProbeResult> {
        let src = request.src.as_str();
        if src.starts_with("data:") {
            return Some(probe_data_url(src));
        }

        let best = best_from_srcset(page.srcset.as_deref()?)?;
        let base = page.page_url.as_deref().unwrap_or(src);
        let best = match Url::parse(base).and_then(|b| b.join(&best)) {
            Ok(joined) => joined.to_string(),
            Err(_) => best,
        };
        if best == src {
            return None;
        }
        tracing::debug!("srcset upgrade {} -> {}", src, best);
        Some(PageProbeResult {
            ok: true,
            filename: Some(basename_from_url(&best)),
            url: Some(best),
            content_type: None,
        })
    }
}

/// `data:image/png;base64,...` → `image.png`.
fn probe_data_url(src: &str) -> PageProbeResult {
    let meta = src["data:".len()..]
        .split(|c| c == ';' || c == ',')
        .next()
        .unwrap_or("");
    let extension = extension_from_content_type(meta);
    PageProbeResult {
        ok: true,
        url: Some(src.to_string()),
        filename: Some(format!("image.{extension}")),
        content_type: (!meta.is_empty()).then(|| meta.to_string()),
    }
}
