//! `imgdl sanitize <name>` – print a filesystem-safe filename.

use imgdl_core::url_model::sanitize_filename;

pub fn run_sanitize(name: &str) {
    println!("{}", sanitize_filename(name));
}
