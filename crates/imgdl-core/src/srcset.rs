//! Responsive-image `srcset` parsing and selection.

use std::cmp::Ordering;

/// One parsed `srcset` candidate. `width` 0 means "unspecified".
#[derive(Debug, Clone, PartialEq)]
pub struct SrcsetEntry {
    pub url: String,
    pub width: u32,
    pub density: f64,
}

impl SrcsetEntry {
    pub fn new(url: impl Into<String>, width: u32, density: f64) -> Self {
        Self {
            url: url.into(),
            width,
            density,
        }
    }
}

/// Parses a `srcset` attribute value such as `a.jpg 1x, b.jpg 2x`.
///
/// `Nw` sets the width (0 when unparseable), `Nx` sets the density (1 when
/// unparseable or zero). Anything else, or no descriptor, yields
/// `{width: 0, density: 1}`. Empty list items are skipped.
pub fn parse_srcset(descriptor: &str) -> Vec<SrcsetEntry> {
    descriptor
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut tokens = part.split_whitespace();
            let url = tokens.next().unwrap_or("");
            let desc = tokens.next().unwrap_or("");
            if let Some(w) = desc.strip_suffix('w') {
                SrcsetEntry::new(url, leading_int(w), 1.0)
            } else if let Some(x) = desc.strip_suffix('x') {
                let density = x.parse::<f64>().ok().filter(|d| d.is_finite() && *d != 0.0);
                SrcsetEntry::new(url, 0, density.unwrap_or(1.0))
            } else {
                SrcsetEntry::new(url, 0, 1.0)
            }
        })
        .collect()
}

fn leading_int(s: &str) -> u32 {
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Picks the largest explicit width; among equal widths, the highest
/// density. Ties keep the earliest entry. `None` for an empty list.
pub fn choose_best(entries: &[SrcsetEntry]) -> Option<&str> {
    entries
        .iter()
        .min_by(|a, b| rank(b, a))
        .map(|e| e.url.as_str())
}

fn rank(a: &SrcsetEntry, b: &SrcsetEntry) -> Ordering {
    a.width
        .cmp(&b.width)
        .then_with(|| a.density.total_cmp(&b.density))
}

/// Convenience: parse then choose.
pub fn best_from_srcset(descriptor: &str) -> Option<String> {
    choose_best(&parse_srcset(descriptor)).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_density_descriptors() {
        assert_eq!(
            parse_srcset("a.jpg 1x, b.jpg 2x"),
            vec![SrcsetEntry::new("a.jpg", 0, 1.0), SrcsetEntry::new("b.jpg", 0, 2.0)]
        );
    }

    #[test]
    fn parses_width_and_bare_entries() {
        let entries = parse_srcset("  small.jpg 320w ,large.jpg   1024w, plain.jpg,odd.jpg 3q");
        assert_eq!(entries[0], SrcsetEntry::new("small.jpg", 320, 1.0));
        assert_eq!(entries[1], SrcsetEntry::new("large.jpg", 1024, 1.0));
        assert_eq!(entries[2], SrcsetEntry::new("plain.jpg", 0, 1.0));
        assert_eq!(entries[3], SrcsetEntry::new("odd.jpg", 0, 1.0));
    }

    #[test]
    fn bad_numbers_use_defaults() {
        let entries = parse_srcset("a.jpg abcw, b.jpg zzx, c.jpg 0x, d.jpg 640.5w");
        assert_eq!(entries[0].width, 0);
        assert_eq!(entries[1].density, 1.0);
        assert_eq!(entries[2].density, 1.0);
        assert_eq!(entries[3].width, 640);
    }

    #[test]
    fn skips_empty_items() {
        assert_eq!(parse_srcset("a.jpg 1x, ,").len(), 1);
        assert!(parse_srcset("").is_empty());
    }

    #[test]
    fn chooses_widest() {
        let entries = vec![
            SrcsetEntry::new("a", 100, 1.0),
            SrcsetEntry::new("b", 200, 1.0),
            SrcsetEntry::new("c", 50, 1.0),
        ];
        assert_eq!(choose_best(&entries), Some("b"));
    }

    #[test]
    fn density_breaks_width_ties() {
        let entries = vec![SrcsetEntry::new("a", 0, 1.0), SrcsetEntry::new("b", 0, 2.0)];
        assert_eq!(choose_best(&entries), Some("b"));
    }

    #[test]
    fn full_tie_keeps_first() {
        let entries = vec![SrcsetEntry::new("first", 300, 1.0), SrcsetEntry::new("second", 300, 1.0)];
        assert_eq!(choose_best(&entries), Some("first"));
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(choose_best(&[]), None);
        assert_eq!(best_from_srcset(""), None);
    }
}
