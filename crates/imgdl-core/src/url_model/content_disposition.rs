//! Content-Disposition header parsing (filename and filename*).

use super::percent::percent_decode;

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename*=UTF-8''percent-encoded` (RFC 5987; any charset/language prefix)
/// - `filename="value"` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
///
/// `filename*` takes precedence. If its value cannot be decoded, the plain
/// `filename` parameter is still consulted.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut extended: Option<String> = None;
    let mut plain: Option<String> = None;

    for param in split_params(header_value) {
        let Some((name, v)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let v = v.trim();

        if name.eq_ignore_ascii_case("filename*") && extended.is_none() {
            let encoded = strip_charset_prefix(unquote(v).as_str()).to_string();
            match percent_decode(encoded.trim()) {
                Ok(decoded) if !decoded.trim().is_empty() => {
                    extended = Some(decoded.trim().to_string());
                }
                Ok(_) => {}
                Err(e) => tracing::debug!("undecodable filename* value {:?}: {}", v, e),
            }
        } else if name.eq_ignore_ascii_case("filename") && plain.is_none() {
            let value = unquote(v);
            let value = value.trim();
            if !value.is_empty() {
                plain = Some(value.to_string());
            }
        }
    }

    extended.or(plain)
}

/// Splits on `;` outside of double-quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(value[start..].trim());
    params
}

/// `UTF-8'en'name` → `name`. Values without the two-quote prefix are returned as-is.
fn strip_charset_prefix(v: &str) -> &str {
    let mut parts = v.splitn(3, '\'');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_charset), Some(_lang), Some(rest)) => rest,
        _ => v,
    }
}

fn unquote(v: &str) -> String {
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        decode_quoted_filename(&v[1..v.len() - 1])
    } else {
        v.to_string()
    }
}

/// Decode backslash-escaped quotes in a quoted filename value.
fn decode_quoted_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
