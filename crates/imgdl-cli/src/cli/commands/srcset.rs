//! `imgdl srcset <descriptor>` – print the highest-resolution entry.

use anyhow::{bail, Result};
use imgdl_core::srcset::{choose_best, parse_srcset};

pub fn run_srcset(descriptor: &str) -> Result<()> {
    let entries = parse_srcset(descriptor);
    for e in &entries {
        tracing::debug!("srcset entry {} w={} x={}", e.url, e.width, e.density);
    }
    match choose_best(&entries) {
        Some(url) => {
            println!("{url}");
            Ok(())
        }
        None => bail!("no srcset entries in {:?}", descriptor),
    }
}
