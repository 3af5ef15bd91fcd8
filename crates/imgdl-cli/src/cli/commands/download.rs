//! `imgdl download <url>` – resolve, then save into a directory.

use anyhow::{bail, Result};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::download::{perform_download, CurlDownloader, DownloadOutcome};
use std::path::Path;

use super::resolve::resolve_candidate;
use crate::cli::ResolveArgs;

pub async fn run_download(cfg: &ImgdlConfig, args: &ResolveArgs, dir: &Path) -> Result<()> {
    let candidate = resolve_candidate(cfg, args).await?;
    let downloader = CurlDownloader::new(dir);
    match perform_download(Some(&downloader), &candidate).await {
        DownloadOutcome::Started { id } => {
            println!(
                "Download {id}: {} as {:?} into {}",
                candidate.url,
                candidate.filename,
                dir.display()
            );
            Ok(())
        }
        DownloadOutcome::Failed { error } => bail!("download failed: {error}"),
    }
}
