pub mod config;
pub mod logging;

pub mod download;
pub mod fetch_head;
pub mod page_probe;
pub mod provider;
pub mod resolver;
pub mod retry;
pub mod srcset;
pub mod template;
pub mod url_model;
