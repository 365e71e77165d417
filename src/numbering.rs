//! Chapter number parsing and virtual number assignment.
//!
//! Outline titles frequently carry their chapter number as a prefix, e.g.
//! `3.4.5 Chapter Example` or `2.a.IV Appendix`. The parser recognizes
//! dot-separated segments of digits, single letters, or roman numerals (up to
//! 8 glyphs, case-insensitive), optionally terminated by a dot. Titles
//! without a parsable prefix get a virtual number reflecting their position
//! in the outline tree: `virt.1` for the first top-level entry, `virt.1.2`
//! for its second child, and so on.

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::outline::OutlineEntry;

// A single number segment: roman glyphs first so that e.g. "IV" is not read
// as two letter segments.
const SEGMENT: &str = "(?:[iIvVxX]{1,8}|[a-zA-Z]|[0-9]+)";

lazy_static! {
    static ref NUMBER_PREFIX: Regex =
        Regex::new(&format!(r"^{seg}(?:\.{seg})*\.?", seg = SEGMENT)).unwrap();
    static ref NUMBER_FULL: Regex =
        Regex::new(&format!(r"^{seg}(?:\.{seg})*\.?$", seg = SEGMENT)).unwrap();
}

/// Parse a leading chapter number from an outline title.
///
/// Returns the number prefix and the remaining title, both trimmed. The
/// prefix only counts when it is followed by whitespace and further text,
/// so a title like `Introduction` is not mistaken for the roman numeral `I`.
pub fn parse_number_prefix(title: &str) -> Option<(String, String)> {
    let trimmed = title.trim();
    let matched = NUMBER_PREFIX.find(trimmed)?;
    let rest = &trimmed[matched.end()..];
    let after = rest.trim_start_matches([' ', '\t']);
    if after.len() == rest.len() || after.is_empty() {
        // no separating whitespace, or nothing after it
        return None;
    }
    Some((matched.as_str().to_string(), after.trim().to_string()))
}

/// Check whether `text` is nothing but a chapter number, e.g. `3.9.3`,
/// `XII.I.V` or `A.B.D.`.
///
/// Used when hunting for a detached number box left of a matched chapter
/// title.
pub fn is_chapter_number(text: &str) -> bool {
    NUMBER_FULL.is_match(text.trim())
}

/// Assign numbers to all outline entries in place.
///
/// Entries whose title carries a parsable number prefix get that number and
/// the stripped title; all others receive `virt.<level-path>` built from
/// `level` (dot-joined 1-based indices). Recurses through the tree, so call
/// with `"1"` on the top level.
pub fn assign_numbers(entries: &mut [OutlineEntry], level: &str) {
    let segments: Vec<&str> = level.split('.').collect();
    let start_level: usize = segments
        .last()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let parent_level = segments[..segments.len() - 1].join(".");

    for (idx, entry) in entries.iter_mut().enumerate() {
        let current = start_level + idx;
        let new_level = if parent_level.is_empty() {
            current.to_string()
        } else {
            format!("{}.{}", parent_level, current)
        };

        match parse_number_prefix(&entry.title) {
            Some((number, stripped)) => {
                entry.number = number;
                entry.title = stripped;
            }
            None => {
                entry.number = format!("virt.{}", new_level);
            }
        }

        if !entry.children.is_empty() {
            assign_numbers(&mut entry.children, &format!("{}.1", new_level));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::outline::{OutlineEntry, OutlinePosition};

    fn entry(title: &str, children: Vec<OutlineEntry>) -> OutlineEntry {
        OutlineEntry {
            title: title.to_string(),
            number: String::new(),
            position: OutlinePosition {
                page: Some(1),
                x0: 72.0,
                y1: 700.0,
            },
            children,
        }
    }

    #[test]
    fn test_parse_simple_numbers() {
        assert_eq!(
            parse_number_prefix("1 Intro"),
            Some(("1".to_string(), "Intro".to_string()))
        );
        assert_eq!(
            parse_number_prefix("2.1 Details"),
            Some(("2.1".to_string(), "Details".to_string()))
        );
        assert_eq!(
            parse_number_prefix("1.2.3. Deep Dive"),
            Some(("1.2.3.".to_string(), "Deep Dive".to_string()))
        );
    }

    #[test]
    fn test_parse_letter_and_roman_segments() {
        assert_eq!(
            parse_number_prefix("A.a.2 Mixed"),
            Some(("A.a.2".to_string(), "Mixed".to_string()))
        );
        assert_eq!(
            parse_number_prefix("IV Results"),
            Some(("IV".to_string(), "Results".to_string()))
        );
        assert_eq!(
            parse_number_prefix("2.a.IV Appendix"),
            Some(("2.a.IV".to_string(), "Appendix".to_string()))
        );
    }

    #[test]
    fn test_plain_titles_have_no_number() {
        assert_eq!(parse_number_prefix("Introduction"), None);
        assert_eq!(parse_number_prefix("Intro duction"), None);
        // number without following text
        assert_eq!(parse_number_prefix("1.2"), None);
        // no separating whitespace
        assert_eq!(parse_number_prefix("1.Title"), None);
    }

    #[test]
    fn test_number_reconstructs_title() {
        // round-trip property: number + " " + title gives back the stripped
        // original
        for original in ["1 Intro", "2.1 Details", "A.a.2 Mixed Case Title"] {
            let (number, title) = parse_number_prefix(original).unwrap();
            assert_eq!(format!("{} {}", number, title), original.trim());
        }
    }

    #[test]
    fn test_is_chapter_number() {
        assert!(is_chapter_number("3.9.3"));
        assert!(is_chapter_number("XII.I.V"));
        assert!(is_chapter_number("A.B.D."));
        assert!(is_chapter_number(" 2 "));
        assert!(!is_chapter_number("3.9.3 Title"));
        assert!(!is_chapter_number("Chapter"));
        assert!(!is_chapter_number(""));
    }

    #[test]
    fn test_assign_numbers_strips_prefixes() {
        let mut entries = vec![entry("1 Intro", vec![]), entry("2 Body", vec![entry("2.1 Details", vec![])])];
        assign_numbers(&mut entries, "1");
        assert_eq!(entries[0].number, "1");
        assert_eq!(entries[0].title, "Intro");
        assert_eq!(entries[1].children[0].number, "2.1");
        assert_eq!(entries[1].children[0].title, "Details");
    }

    #[test]
    fn test_assign_virtual_numbers_by_outline_position() {
        // "Content of table" nested under "Disclaimer"
        let mut entries = vec![
            entry("Disclaimer", vec![entry("Content of table", vec![])]),
            entry("Introduction", vec![]),
        ];
        assign_numbers(&mut entries, "1");
        assert_eq!(entries[0].number, "virt.1");
        assert_eq!(entries[0].children[0].number, "virt.1.1");
        assert_eq!(entries[1].number, "virt.2");
        // titles stay untouched for virtual numbers
        assert_eq!(entries[0].title, "Disclaimer");
    }

    #[test]
    fn test_mixed_real_and_virtual_numbers() {
        let mut entries = vec![entry("Preface", vec![]), entry("1 Intro", vec![])];
        assign_numbers(&mut entries, "1");
        assert_eq!(entries[0].number, "virt.1");
        assert_eq!(entries[1].number, "1");
    }
}
