//! Text processing utilities.
//!
//! Helpers for fitting cell text into columns and marking the parts of it
//! that match the active search.

use log::*;
use regex::{Regex, RegexBuilder};

/// Build a case-insensitive pattern matching `query` literally. Returns
/// `None` for a blank query.
///
pub fn search_pattern(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Failed to compile search pattern for '{}': {}", query, e);
            None
        }
    }
}

/// Split `text` into consecutive segments, flagging the ones that match
/// `pattern`. Concatenating the segments gives back `text`.
///
pub fn highlight_segments<'a>(text: &'a str, pattern: Option<&Regex>) -> Vec<(&'a str, bool)> {
    let pattern = match pattern {
        Some(pattern) => pattern,
        None => return vec![(text, false)],
    };
    let mut segments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            segments.push((&text[last..found.start()], false));
        }
        if !found.as_str().is_empty() {
            segments.push((found.as_str(), true));
        }
        last = found.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push((&text[last..], false));
    }
    segments
}

/// Shorten `text` to at most `width` characters, ending with an ellipsis
/// when cut.
///
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut short: String = text.chars().take(width - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_has_no_pattern() {
        assert!(search_pattern("").is_none());
        assert!(search_pattern("   ").is_none());
    }

    #[test]
    fn test_highlight_is_case_insensitive() {
        let re = search_pattern("john").unwrap();
        let segments = highlight_segments("John Johnson", Some(&re));
        assert_eq!(
            segments,
            vec![("John", true), (" ", false), ("John", true), ("son", false)]
        );
    }

    #[test]
    fn test_highlight_escapes_query() {
        let re = search_pattern("a.b").unwrap();
        assert_eq!(highlight_segments("axb", Some(&re)), vec![("axb", false)]);
        assert_eq!(
            highlight_segments("see a.b here", Some(&re)),
            vec![("see ", false), ("a.b", true), (" here", false)]
        );
    }

    #[test]
    fn test_highlight_without_pattern() {
        assert_eq!(highlight_segments("Acme", None), vec![("Acme", false)]);
        let re = search_pattern("x").unwrap();
        assert_eq!(highlight_segments("", Some(&re)), vec![("", false)]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("Acme Corporation", 8), "Acme Co…");
        assert_eq!(truncate("Zoë Ångström", 5), "Zoë …");
        assert_eq!(truncate("abc", 0), "");
    }
}
