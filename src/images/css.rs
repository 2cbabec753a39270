// src/images/css.rs
// =============================================================================
// This module extracts background images from inline CSS styles.
//
// Pages often reference images outside of <img> tags, like this:
//
//   <div style="background: url('hero.png')">
//   <td style="background-image:url(tile.jpg)">
//
// Those never show up in an <img> scan, so we look at every element with a
// style attribute and pull out the url(...) references with a regex. The
// argument may be single-quoted, double-quoted or bare - the pattern accepts
// all three.
//
// Rust concepts:
// - Lazy statics: Compile the regex once, reuse it on every call
// - Regex captures: Extract the part of the match we care about
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Matches url(...) with an optional quote on either side of the argument.
// The capture is non-greedy, so a stray "url(" without a closing paren
// matches nothing at all.
static CSS_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(['"]?(.*?)['"]?\)"#).unwrap());

// Extracts background-image URLs from a parsed HTML document
//
// Parameters:
//   document: the parsed page
//   base_url: the page's URL (for resolving relative references)
//
// Returns: deduplicated set of absolute URL strings
//
// Example:
//   <div style="background:url('x.png')"> with base https://example.com/dir/
//   -> {"https://example.com/dir/x.png"}
pub fn extract_background_images(document: &Html, base_url: &Url) -> HashSet<String> {
    let mut image_urls = HashSet::new();

    // Every element that carries a style attribute, whatever the tag
    let selector = Selector::parse("[style]").unwrap();

    for element in document.select(&selector) {
        if let Some(style) = element.value().attr("style") {
            for capture in CSS_URL_RE.captures_iter(style) {
                if let Some(reference) = capture.get(1) {
                    // Resolve against the page URL; skip anything that
                    // doesn't form a valid URL
                    if let Ok(resolved) = base_url.join(reference.as_str()) {
                        image_urls.insert(resolved.to_string());
                    }
                }
            }
        }
    }

    image_urls
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is once_cell::sync::Lazy?
//    - A static whose value is computed the first time it's used
//    - Compiling a regex isn't free, so we do it exactly once
//    - Lazy<Regex> is thread-safe: many tasks can share it
//
// 2. Why unwrap() on Regex::new?
//    - The pattern is a constant written by us, not user input
//    - If it were invalid, that's a bug we want to crash on immediately
//    - Same policy as unwrap() on constant CSS selectors
//
// 3. What does non-greedy (.*?) mean?
//    - The capture grows one character at a time until the rest of the
//      pattern can match
//    - Greedy (.*) would swallow everything up to the LAST closing paren
//      and merge two url(...) references into one wrong match
//
// 4. Why a HashSet?
//    - The same background image often repeats across elements
//    - A set deduplicates for free; we only want each URL once per page
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, base: &str) -> HashSet<String> {
        let document = Html::parse_document(html);
        let base_url = Url::parse(base).unwrap();
        extract_background_images(&document, &base_url)
    }

    #[test]
    fn test_single_quoted_url_resolves_against_base() {
        let urls = extract(
            r#"<div style="background:url('x.png')"></div>"#,
            "https://example.com/dir/",
        );
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://example.com/dir/x.png"));
    }

    #[test]
    fn test_double_quoted_and_bare_urls_match() {
        let urls = extract(
            r#"<div style='background:url("a.png")'></div>
               <span style="background-image:url(b.png)"></span>"#,
            "https://example.com/",
        );
        assert!(urls.contains("https://example.com/a.png"));
        assert!(urls.contains("https://example.com/b.png"));
    }

    #[test]
    fn test_absolute_url_is_kept_as_is() {
        let urls = extract(
            r#"<div style="background:url(https://cdn.example.net/pic.jpg)"></div>"#,
            "https://example.com/page",
        );
        assert!(urls.contains("https://cdn.example.net/pic.jpg"));
    }

    #[test]
    fn test_multiple_references_in_one_style() {
        let urls = extract(
            r#"<div style="background:url(one.png), url('two.png')"></div>"#,
            "https://example.com/",
        );
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_missing_closing_paren_matches_nothing() {
        let urls = extract(
            r#"<div style="background:url(broken.png"></div>"#,
            "https://example.com/",
        );
        assert!(urls.is_empty());
    }

    #[test]
    fn test_elements_without_style_are_ignored() {
        let urls = extract(
            r#"<img src="notme.png"><p>url(alsonotme.png)</p>"#,
            "https://example.com/",
        );
        assert!(urls.is_empty());
    }

    #[test]
    fn test_duplicate_references_are_deduplicated() {
        let urls = extract(
            r#"<div style="background:url(x.png)"></div>
               <section style="background:url('x.png')"></section>"#,
            "https://example.com/",
        );
        assert_eq!(urls.len(), 1);
    }
}
