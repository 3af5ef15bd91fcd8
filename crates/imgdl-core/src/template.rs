//! Filename templates: `{domain}`, `{basename}`, `{timestamp}`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "{domain}/{basename}";

/// Expands `template` against `url` and `basename`.
///
/// `{domain}` is the URL host without a leading `www.`, `{basename}` is
/// inserted verbatim and `{timestamp}` is the current epoch in milliseconds.
/// An empty or missing template means [`DEFAULT_TEMPLATE`]. If `url` does not
/// parse, `basename` is returned unchanged. The output is not sanitized.
pub fn apply_template(template: Option<&str>, url: &str, basename: &str) -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    apply_template_at(template, url, basename, now_ms)
}

/// [`apply_template`] with an explicit timestamp.
pub fn apply_template_at(template: Option<&str>, url: &str, basename: &str, now_ms: u128) -> String {
    let template = template.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TEMPLATE);
    let Ok(parsed) = url::Url::parse(url) else {
        tracing::debug!("template skipped, unparseable url {:?}", url);
        return basename.to_string();
    };
    let host = parsed.host_str().unwrap_or("");
    let domain = host.strip_prefix("www.").unwrap_or(host);

    template
        .replace("{domain}", domain)
        .replace("{basename}", basename)
        .replace("{timestamp}", &now_ms.to_string())
}
