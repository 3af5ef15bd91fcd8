//! Download trigger seam.
//!
//! The resolver's output is handed to a [`DownloadTrigger`], which starts the
//! actual transfer and reports an id or an error. Failures are surfaced
//! verbatim and never retried here.

mod single;

use async_trait::async_trait;

use crate::resolver::Candidate;

pub use single::{download_to_dir, unique_path, CurlDownloader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Started { id: u64 },
    Failed { error: String },
}

impl DownloadOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        DownloadOutcome::Failed {
            error: error.into(),
        }
    }
}

#[async_trait]
pub trait DownloadTrigger: Send + Sync {
    async fn download(&self, candidate: &Candidate) -> DownloadOutcome;
}

/// Validates `candidate` and forwards it to `trigger`.
///
/// An empty URL fails with `invalid_candidate`, a missing trigger with
/// `no_adapter`; otherwise the trigger's outcome is returned unchanged.
pub async fn perform_download(
    trigger: Option<&dyn DownloadTrigger>,
    candidate: &Candidate,
) -> DownloadOutcome {
    if candidate.url.is_empty() {
        return DownloadOutcome::failed("invalid_candidate");
    }
    let Some(trigger) = trigger else {
        return DownloadOutcome::failed("no_adapter");
    };

    let outcome = trigger.download(candidate).await;
    match &outcome {
        DownloadOutcome::Started { id } => {
            tracing::info!("download {} started for {} as {}", id, candidate.url, candidate.filename)
        }
        DownloadOutcome::Failed { error } => {
            tracing::warn!("download of {} failed: {}", candidate.url, error)
        }
    }
    outcome
}
