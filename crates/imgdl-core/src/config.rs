use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch_head::FetchOptions;
use crate::provider::{default_rules, ProviderRule};
use crate::resolver::ResolveOptions;
use crate::template::DEFAULT_TEMPLATE;

/// Header probe parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Deadline per attempt, in milliseconds.
    pub timeout_ms: u64,
    /// Additional attempts after the first.
    pub retries: u32,
    /// Linear backoff unit in milliseconds.
    pub backoff_step_ms: u64,
    /// Probe headers for filenames without an extension.
    pub head_probe: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            retries: 1,
            backoff_step_ms: 50,
            head_probe: true,
        }
    }
}

impl FetchConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            retries: self.retries,
            backoff_step: Duration::from_millis(self.backoff_step_ms),
        }
    }
}

/// Global configuration loaded from `~/.config/imgdl/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgdlConfig {
    /// Filename template with `{domain}`, `{basename}` and `{timestamp}`.
    pub filename_template: String,
    /// Directory downloads are saved to (None = current directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
    pub fetch: FetchConfig,
    /// CDN rewrite rules, tried in order.
    pub providers: Vec<ProviderRule>,
}

impl Default for ImgdlConfig {
    fn default() -> Self {
        Self {
            filename_template: DEFAULT_TEMPLATE.to_string(),
            download_dir: None,
            fetch: FetchConfig::default(),
            providers: default_rules(),
        }
    }
}

impl ImgdlConfig {
    /// Options for one resolution request.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            template: Some(self.filename_template.clone()).filter(|t| !t.is_empty()),
            providers: self.providers.clone(),
            fetch: self.fetch.fetch_options(),
            head_probe: self.fetch.head_probe,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgdlConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ImgdlConfig> {
    if !path.exists() {
        let default_cfg = ImgdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: ImgdlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
