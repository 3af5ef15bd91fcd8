//! Parse HTTP response header lines into HeadResult.

use super::HeadResult;

/// Parse collected header lines into HeadResult.
///
/// With redirects followed, header blocks of every hop arrive in order; each
/// status line starts a fresh result so only the final response counts.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut result = HeadResult::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            result = HeadResult {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
                ..HeadResult::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case("content-type") {
                result.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-disposition") {
                result.content_disposition = Some(value.to_string());
            }
        }
    }

    result
}
