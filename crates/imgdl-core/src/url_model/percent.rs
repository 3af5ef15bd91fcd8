//! Strict percent-decoding for URL path segments and RFC 5987 values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes `%XX` escapes. Unlike a lenient decoder, a truncated or non-hex
/// escape is an error, as is a byte sequence that is not UTF-8; callers
/// decide whether to keep the raw input instead.
pub fn percent_decode(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let high = bytes.get(i + 1).copied().and_then(hex_digit);
            let low = bytes.get(i + 2).copied().and_then(hex_digit);
            match (high, low) {
                (Some(h), Some(l)) => {
                    out.push(h << 4 | l);
                    i += 3;
                }
                _ => return Err(DecodeError::MalformedEscape(i)),
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| DecodeError::InvalidUtf8)
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8_sequences() {
        assert_eq!(percent_decode("caf%C3%A9.png").as_deref(), Ok("café.png"));
        assert_eq!(percent_decode("a%20b").as_deref(), Ok("a b"));
    }

    #[test]
    fn plus_is_left_alone() {
        assert_eq!(percent_decode("a+b").as_deref(), Ok("a+b"));
    }

    #[test]
    fn malformed_escape_is_error() {
        assert_eq!(percent_decode("100%"), Err(DecodeError::MalformedEscape(3)));
        assert_eq!(percent_decode("%zz"), Err(DecodeError::MalformedEscape(0)));
    }

    #[test]
    fn invalid_utf8_is_error() {
        assert_eq!(percent_decode("%FF%FE"), Err(DecodeError::InvalidUtf8));
    }
}
