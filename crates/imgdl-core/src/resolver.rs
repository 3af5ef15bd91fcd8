//! Candidate resolution: decide which URL to fetch and what to call the file.
//!
//! Every enrichment step is best-effort. The page probe, provider rewrite,
//! header probe and template can each be skipped or fail, and the result
//! still degrades to the sanitized basename of the source URL. Only an empty
//! source is a hard failure.

use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use url::Url;

use crate::fetch_head::{probe_headers, FetchOptions, Transport};
use crate::page_probe::{PageContext, PageProbe, PageProbeResult, ProbeRequest};
use crate::provider::{default_rules, normalize_with_rules, ProviderRule};
use crate::template::apply_template;
use crate::url_model::{
    extension_from_content_type, filename_hint, has_recognizable_extension,
    parse_content_disposition_filename, sanitize_filename,
};

/// The URL the user triggered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    pub source_url: String,
}

impl SourceReference {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }
}

/// Final decision handed to a download trigger. `filename` is sanitized and
/// non-empty; `url` is absolute whenever the source was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("empty source url")]
    EmptySource,
    #[error("{0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Resolved(Candidate),
    Failed(ResolveError),
}

impl CandidateOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, CandidateOutcome::Resolved(_))
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            CandidateOutcome::Resolved(c) => Some(c),
            CandidateOutcome::Failed(_) => None,
        }
    }
}

/// Collaborators the resolver may consult. Absent ones are skipped.
#[derive(Clone, Copy, Default)]
pub struct Collaborators<'a> {
    pub page_probe: Option<&'a dyn PageProbe>,
    pub transport: Option<&'a dyn Transport>,
}

/// Per-request settings, usually built from [`crate::config::ImgdlConfig`].
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Filename template; `None` means the default.
    pub template: Option<String>,
    pub providers: Vec<ProviderRule>,
    pub fetch: FetchOptions,
    /// Probe headers when the filename has no extension.
    pub head_probe: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            template: None,
            providers: default_rules(),
            fetch: FetchOptions::default(),
            head_probe: true,
        }
    }
}

/// Resolves `source` into a download candidate. Never returns an error;
/// failures, including a panic in a collaborator, are reported in the outcome.
pub async fn resolve(
    source: &SourceReference,
    page: &PageContext,
    collaborators: Collaborators<'_>,
    options: &ResolveOptions,
) -> CandidateOutcome {
    let result = AssertUnwindSafe(try_resolve(source, page, collaborators, options))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(ResolveError::Unexpected(panic_message(payload.as_ref()))));
    match result {
        Ok(candidate) => {
            tracing::info!("resolved {} -> {} as {}", source.source_url, candidate.url, candidate.filename);
            CandidateOutcome::Resolved(candidate)
        }
        Err(e) => {
            tracing::warn!("resolution failed for {:?}: {}", source.source_url, e);
            CandidateOutcome::Failed(e)
        }
    }
}

async fn try_resolve(
    source: &SourceReference,
    page: &PageContext,
    collaborators: Collaborators<'_>,
    options: &ResolveOptions,
) -> Result<Candidate, ResolveError> {
    let src = source.source_url.trim();
    if src.is_empty() {
        return Err(ResolveError::EmptySource);
    }

    let probe = match collaborators.page_probe {
        Some(p) => p.probe(page, &ProbeRequest::probe_image(src)).await,
        None => None,
    };
    tracing::debug!("page probe for {}: {:?}", src, probe);

    let url = probe
        .as_ref()
        .and_then(PageProbeResult::suggested_url)
        .and_then(|suggested| absolutize(src, suggested))
        .unwrap_or_else(|| src.to_string());
    let filename = probe
        .as_ref()
        .and_then(PageProbeResult::suggested_filename)
        .map(str::to_string)
        .unwrap_or_else(|| filename_hint(&url));

    let normalized = normalize_with_rules(&url, &filename, &options.providers);
    let url = normalized.url;
    let mut filename = normalized.filename;

    if options.head_probe && !has_recognizable_extension(&filename) {
        filename = enrich_from_headers(collaborators.transport, &url, filename, &options.fetch).await;
    }

    let templated = apply_template(options.template.as_deref(), &url, &filename);
    let filename = sanitize_filename(&templated);

    Ok(Candidate { url, filename })
}

/// Resolves a probe-suggested URL against the source. `None` when the
/// suggestion is relative and the source has no usable base.
fn absolutize(src: &str, suggested: &str) -> Option<String> {
    match Url::parse(suggested) {
        Ok(_) => Some(suggested.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let joined = Url::parse(src).and_then(|base| base.join(suggested));
            match joined {
                Ok(u) => Some(u.to_string()),
                Err(e) => {
                    tracing::debug!("ignoring relative probe url {:?}: {}", suggested, e);
                    None
                }
            }
        }
        Err(e) => {
            tracing::debug!("ignoring probe url {:?}: {}", suggested, e);
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "resolver panicked".to_string()
    }
}

/// Prefers a Content-Disposition filename, else appends the MIME subtype as
/// an extension. Any probe failure keeps `filename` as it was.
async fn enrich_from_headers(
    transport: Option<&dyn Transport>,
    url: &str,
    filename: String,
    fetch: &FetchOptions,
) -> String {
    let head = match probe_headers(transport, url, fetch).await {
        Ok(head) => head,
        Err(e) => {
            tracing::debug!("header enrichment skipped for {}: {}", url, e);
            return filename;
        }
    };

    if let Some(name) = head
        .content_disposition
        .as_deref()
        .and_then(parse_content_disposition_filename)
    {
        return name;
    }
    match head.content_type.as_deref().filter(|ct| !ct.trim().is_empty()) {
        Some(ct) => with_extension(&filename, &extension_from_content_type(ct)),
        None => filename,
    }
}

/// Inserts `.ext` before any query or fragment still attached to the name.
fn with_extension(filename: &str, ext: &str) -> String {
    match filename.find(|c| c == '?' || c == '#') {
        Some(idx) => format!("{}.{}{}", &filename[..idx], ext, &filename[idx..]),
        None => format!("{filename}.{ext}"),
    }
}
