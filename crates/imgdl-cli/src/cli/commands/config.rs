//! `imgdl config` – show where the configuration lives and what it says.

use anyhow::Result;
use imgdl_core::config::{self, ImgdlConfig};

pub fn run_config(cfg: &ImgdlConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
