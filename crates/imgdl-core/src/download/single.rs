//! Single-stream GET into a download directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{DownloadOutcome, DownloadTrigger};
use crate::resolver::Candidate;
use crate::retry::FetchError;

/// Saves candidates under `dir` with libcurl. Ids count up from 1 per
/// downloader instance.
#[derive(Debug)]
pub struct CurlDownloader {
    dir: PathBuf,
    timeout: Duration,
    next_id: AtomicU64,
}

impl CurlDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timeout: Duration::from_secs(600),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl DownloadTrigger for CurlDownloader {
    async fn download(&self, candidate: &Candidate) -> DownloadOutcome {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let candidate = candidate.clone();
        let dir = self.dir.clone();
        let timeout = self.timeout;
        let result =
            tokio::task::spawn_blocking(move || download_to_dir(&candidate, &dir, timeout)).await;
        match result {
            Ok(Ok(path)) => {
                tracing::debug!("download {} saved to {}", id, path.display());
                DownloadOutcome::Started { id }
            }
            Ok(Err(e)) => DownloadOutcome::failed(format!("{e:#}")),
            Err(e) => DownloadOutcome::failed(format!("download task failed: {e}")),
        }
    }
}

/// Downloads `candidate.url` into `dir`, never overwriting an existing file.
/// Returns the path written. Runs in the current thread.
pub fn download_to_dir(candidate: &Candidate, dir: &Path, timeout: Duration) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create download dir {}", dir.display()))?;
    let path = unique_path(dir, &candidate.filename);
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("create {}", path.display()))?;

    let result = fetch_into(&candidate.url, &mut file, timeout);
    if result.is_err() {
        let _ = fs::remove_file(&path);
    }
    result.map(|_| path)
}

fn fetch_into(url: &str, file: &mut fs::File, timeout: Duration) -> Result<u64> {
    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    easy.timeout(timeout)?;

    let outcome = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_err {
        return Err(e).context("write download file");
    }
    outcome.context("GET request failed")?;

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code)).with_context(|| format!("GET {url}"));
    }
    file.flush()?;
    Ok(written)
}

/// `dir/name`, or `dir/stem (n).ext` with the smallest free `n`.
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let first = dir.join(filename);
    if !first.exists() {
        return first;
    }
    let (stem, ext) = match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx..]),
        _ => (filename, ""),
    };
    (1u32..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
