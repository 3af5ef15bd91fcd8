//! Filename hints from URLs, MIME types and CSS values.

use super::percent::percent_decode;

/// Used when a URL yields no usable basename.
pub const FALLBACK_BASENAME: &str = "image";

/// Raw text after the final `/` of `url`, query and fragment included.
///
/// Works on unparseable input too; callers sanitize later.
pub fn last_segment(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}

/// Percent-decoded last path segment of a parsed URL, or `"image"` when
/// the URL does not parse or its path ends in `/`.
pub fn basename_from_url(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return FALLBACK_BASENAME.to_string();
    };
    let segment = last_segment(parsed.path());
    if segment.is_empty() {
        return FALLBACK_BASENAME.to_string();
    }
    percent_decode(segment).unwrap_or_else(|_| segment.to_string())
}

/// True if `name` has a 1–6 character alphanumeric extension after a dot,
/// at the end of the string or right before a `?` / `#`.
pub fn has_recognizable_extension(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'.' {
            return false;
        }
        let run = bytes[i + 1..]
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count();
        let terminated = matches!(bytes.get(i + 1 + run), None | Some(b'?') | Some(b'#'));
        (1..=6).contains(&run) && terminated
    })
}

/// Extension inferred from a `Content-Type` value: the lowercased subtype
/// with parameters dropped, or `"bin"` when there is none.
pub fn extension_from_content_type(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence.split_once('/') {
        Some((_, subtype)) if !subtype.trim().is_empty() => subtype.trim().to_ascii_lowercase(),
        _ => "bin".to_string(),
    }
}

/// Extracts the URL from a CSS `background-image` value such as
/// `url("/a.png")`. Returns `None` when no `url(...)` is present.
pub fn url_from_background_image(css: &str) -> Option<String> {
    let start = css.find("url(")? + "url(".len();
    let end = start + css[start..].find(')')?;
    let inner = css[start..end].trim();
    let inner = inner
        .strip_prefix(['"', '\''])
        .unwrap_or(inner);
    let inner = inner.strip_suffix(['"', '\'']).unwrap_or(inner);
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}
