//! CLI command handlers. Each command is in its own file.

mod config;
mod download;
mod resolve;
mod sanitize;
mod srcset;

pub use config::run_config;
pub use download::run_download;
pub use resolve::run_resolve;
pub use sanitize::run_sanitize;
pub use srcset::run_srcset;
