//! Provider-specific URL rewriting.
//!
//! Known image CDNs serve downscaled variants by default. A [`ProviderRule`]
//! describes how to ask such a host for its largest variant and how to name
//! the result. Rules are plain data so they can live in `config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// One CDN rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRule {
    /// Matched when the URL host contains this string.
    pub host: String,
    /// Matched when the URL path starts with this prefix.
    pub path_prefix: String,
    /// Format requested when neither the query nor the path names one.
    pub default_format: String,
    /// Value sent as `name=` to select the largest variant.
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Raw format → filename extension (e.g. `jpg` → `jpeg`). Unmapped
    /// formats are used lowercased.
    #[serde(default)]
    pub extension_map: BTreeMap<String, String>,
}

fn default_variant() -> String {
    "large".to_string()
}

impl ProviderRule {
    /// The photo CDN rule: `pbs.twimg.com/media/<id>[.ext][:size]`.
    pub fn photo_cdn() -> Self {
        let mut extension_map = BTreeMap::new();
        extension_map.insert("jpg".to_string(), "jpeg".to_string());
        Self {
            host: "pbs.twimg.com".to_string(),
            path_prefix: "/media/".to_string(),
            default_format: "jpg".to_string(),
            variant: default_variant(),
            extension_map,
        }
    }

    fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        !self.host.is_empty() && host.contains(&self.host) && url.path().starts_with(&self.path_prefix)
    }

    fn extension_for(&self, format: &str) -> String {
        let lower = format.to_ascii_lowercase();
        self.extension_map.get(&lower).cloned().unwrap_or(lower)
    }
}

/// Built-in rules used when configuration does not override them.
pub fn default_rules() -> Vec<ProviderRule> {
    vec![ProviderRule::photo_cdn()]
}

/// A URL and filename after provider normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub url: String,
    pub filename: String,
}

/// Normalizes with the built-in rules. See [`normalize_with_rules`].
pub fn normalize_provider_url(url: &str, filename: &str) -> Normalized {
    normalize_with_rules(url, filename, &default_rules())
}

/// Rewrites `url` to request the largest variant when a rule matches, and
/// derives `{id}.{ext}` as the filename.
///
/// Inputs are returned unchanged when the URL is empty, does not parse, or no
/// rule matches. Applying this to its own output yields the same pair.
pub fn normalize_with_rules(url: &str, filename: &str, rules: &[ProviderRule]) -> Normalized {
    let passthrough = || Normalized {
        url: url.to_string(),
        filename: filename.to_string(),
    };
    if url.is_empty() {
        return passthrough();
    }
    let Ok(mut parsed) = Url::parse(url) else {
        return passthrough();
    };
    let Some(rule) = rules.iter().find(|r| r.matches(&parsed)) else {
        return passthrough();
    };

    let segment = parsed.path().rsplit('/').next().unwrap_or("");
    // Legacy size modifier, e.g. `ABC123.jpg:large`.
    let segment = segment.split(':').next().unwrap_or("");
    let (id, path_ext) = split_id_extension(segment);
    if id.is_empty() {
        return passthrough();
    }
    let (id, path_ext) = (id.to_string(), path_ext.to_ascii_lowercase());

    let query_format = parsed
        .query_pairs()
        .find(|(k, _)| k == "format")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty());
    let raw_format = query_format
        .or_else(|| (!path_ext.is_empty()).then(|| path_ext.clone()))
        .unwrap_or_else(|| rule.default_format.clone());
    let extension = rule.extension_for(&raw_format);

    parsed.set_query(None);
    parsed
        .query_pairs_mut()
        .append_pair("format", &raw_format)
        .append_pair("name", &rule.variant);

    let out = Normalized {
        url: parsed.to_string(),
        filename: format!("{id}.{extension}"),
    };
    tracing::debug!(
        "provider rewrite {} -> {} ({})",
        url,
        out.url,
        out.filename
    );
    out
}

/// `ABC.jpg` → (`ABC`, `jpg`); `ABC` → (`ABC`, ``). A leading dot is part of
/// the id.
fn split_id_extension(segment: &str) -> (&str, &str) {
    match segment.char_indices().skip(1).find(|&(_, c)| c == '.') {
        Some((idx, _)) if idx + 1 < segment.len() => (&segment[..idx], &segment[idx + 1..]),
        _ => (segment, ""),
    }
}
