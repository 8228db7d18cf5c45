//! # Text Processing Module
//!
//! ## Purpose
//! Text helpers shared by the matcher and the presentation layer: title
//! canonicalization for comparison, markup stripping for review snippets,
//! and display truncation.
//!
//! ## Input/Output Specification
//! - **Input**: Free-text titles, search-API snippets with inline markup
//! - **Output**: Canonical comparison keys, clean display text
//!
//! ## Key Features
//! - Case- and whitespace-insensitive canonical form for title matching
//! - `<b>`-style tag and HTML-entity removal for review snippets
//! - Safe truncation for terminal display

use regex::Regex;
use std::sync::OnceLock;

/// Canonicalize a title for comparison: lowercase, with every run of
/// whitespace removed entirely (not collapsed to a space), so that
/// `" The  Movie "` and `"themovie"` compare equal.
///
/// Pure and total; idempotent by construction.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap())
}

/// Strip search-engine markup from a review-API text field: inline tags such
/// as `<b>…</b>` and the handful of HTML entities those APIs emit.
///
/// This is a presentation concern; the review client returns fields as-is.
pub fn strip_markup(text: &str) -> String {
    let without_tags = tag_regex().replace_all(text, "");
    without_tags
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Truncate text to a maximum number of characters with an ellipsis,
/// respecting char boundaries.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips_all_whitespace() {
        assert_eq!(normalize(" A b "), "ab");
        assert_eq!(normalize("The  Great\tMovie"), "thegreatmovie");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in [" A b ", "Movie A Part 1", "이상한 나라의 수학자", "  "] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_normalize_handles_non_ascii_titles() {
        assert_eq!(normalize("범죄도시 3"), "범죄도시3");
    }

    #[test]
    fn test_strip_markup_removes_tags_and_entities() {
        assert_eq!(strip_markup("<b>Movie</b> review"), "Movie review");
        assert_eq!(strip_markup("a &quot;quote&quot; &amp; more"), "a \"quote\" & more");
        assert_eq!(strip_markup("plain text"), "plain text");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("a longer piece of text", 10), "a longe...");
    }
}
