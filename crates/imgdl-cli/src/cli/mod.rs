//! CLI for imgdl.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use imgdl_core::config;
use std::path::PathBuf;

use commands::{run_config, run_download, run_resolve, run_sanitize, run_srcset};

/// Top-level CLI for imgdl.
#[derive(Debug, Parser)]
#[command(name = "imgdl")]
#[command(about = "imgdl: download images under the best URL and a clean filename", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Inputs shared by `resolve` and `download`.
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Image URL the download was triggered on.
    pub url: String,

    /// Filename template overriding the configured one ({domain}, {basename}, {timestamp}).
    #[arg(long)]
    pub template: Option<String>,

    /// `srcset` of the triggering element; the best entry replaces the URL.
    #[arg(long)]
    pub srcset: Option<String>,

    /// URL of the page, used to resolve relative srcset entries.
    #[arg(long)]
    pub page_url: Option<String>,

    /// Raw page-probe answer as JSON; replaces the built-in probe.
    #[arg(long, value_name = "JSON")]
    pub probe_json: Option<String>,

    /// Skip the header probe for extensionless filenames.
    #[arg(long)]
    pub no_head: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve the URL and filename an image would be saved under.
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Resolve an image and download it.
    Download {
        #[command(flatten)]
        args: ResolveArgs,

        /// Directory to save into (default: configured download_dir or current dir).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print the sanitized form of a filename.
    Sanitize {
        /// Free-text filename candidate.
        name: String,
    },

    /// Print the best entry of a srcset descriptor list.
    Srcset {
        /// Descriptor list, e.g. "a.jpg 1x, b.jpg 2x".
        descriptor: String,
    },

    /// Show the configuration file path and effective values.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { args } => run_resolve(&cfg, &args).await?,
            CliCommand::Download { args, dir } => {
                let dir = match dir.or_else(|| cfg.download_dir.clone()) {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                run_download(&cfg, &args, &dir).await?;
            }
            CliCommand::Sanitize { name } => run_sanitize(&name),
            CliCommand::Srcset { descriptor } => run_srcset(&descriptor)?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
