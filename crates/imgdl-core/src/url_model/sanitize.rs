//! Cross-platform filename sanitization.

use super::percent::percent_decode;

/// Returned whenever sanitization would otherwise yield an empty name.
pub const FALLBACK_FILENAME: &str = "download";

/// Longest filename we hand to a download trigger, in characters.
pub const NAME_MAX: usize = 255;

/// Sanitizes a free-text candidate into a filesystem-safe filename.
///
/// - Percent-decodes the input; on a malformed escape the raw text is used
/// - Drops everything from the first `:`, `?` or `#` onward
/// - Replaces `/ \ : " < > | ? *` and C0 control characters with `_`
/// - Limits length to 255 characters
/// - Never returns an empty string (falls back to `"download"`)
pub fn sanitize_filename(name: &str) -> String {
    if name.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    let decoded = percent_decode(name).unwrap_or_else(|_| name.to_string());
    let head = match decoded.find(|c| matches!(c, ':' | '?' | '#')) {
        Some(idx) => &decoded[..idx],
        None => decoded.as_str(),
    };

    let out: String = head
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .take(NAME_MAX)
        .collect();

    if out.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        out
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '"' | '<' | '>' | '|' | '?' | '*') || (c as u32) < 0x20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_unchanged() {
        assert_eq!(sanitize_filename("example.jpg"), "example.jpg");
    }

    #[test]
    fn empty_falls_back() {
        assert_eq!(sanitize_filename(""), "download");
        assert_eq!(sanitize_filename("?query=only"), "download");
        assert_eq!(sanitize_filename("#frag"), "download");
    }

    #[test]
    fn replaces_separators_and_reserved() {
        assert_eq!(sanitize_filename("a/b\\c d"), "a_b_c d");
        assert_eq!(sanitize_filename("x<y>z|w*\"q\""), "x_y_z_w__q_");
    }

    #[test]
    fn strips_from_modifier_separator() {
        assert_eq!(sanitize_filename("a/b\\c: d?e"), "a_b_c");
        assert_eq!(sanitize_filename("photo.jpg?name=small"), "photo.jpg");
        assert_eq!(sanitize_filename("photo.jpg#top"), "photo.jpg");
        assert_eq!(sanitize_filename("ABC123.jpg:large"), "ABC123.jpg");
    }

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(sanitize_filename("my%20photo.png"), "my photo.png");
        // Encoded slash is decoded first, then replaced.
        assert_eq!(sanitize_filename("a%2Fb.png"), "a_b.png");
    }

    #[test]
    fn malformed_escape_keeps_raw() {
        assert_eq!(sanitize_filename("100%.png"), "100%.png");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_filename("file\x00name\x1f.txt"), "file_name_.txt");
        assert_eq!(sanitize_filename("tab\there"), "tab_here");
    }

    #[test]
    fn truncates_to_name_max_chars() {
        let long = "é".repeat(400);
        let out = sanitize_filename(&long);
        assert_eq!(out.chars().count(), NAME_MAX);
    }

    #[test]
    fn output_is_always_safe() {
        let inputs = [
            "",
            ":",
            "////",
            "\x01\x02",
            "a:b:c",
            "%E0%A4%A",
            "<<>>||**\"\"",
            "https://example.com/path/file.png?x=1#y",
        ];
        for input in inputs {
            let out = sanitize_filename(input);
            assert!(!out.is_empty(), "empty for {input:?}");
            assert!(out.chars().count() <= NAME_MAX);
            assert!(
                !out.chars().any(is_forbidden),
                "forbidden char in {out:?} (from {input:?})"
            );
        }
    }
}
