// src/crawl/links.rs
// =============================================================================
// This module extracts same-domain links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Resolve relative, protocol-relative and fragment-only hrefs
// - Compare hosts, which is how we stay on the crawl's domain
//
// The selector walk is an iterator over the parsed tree, so deeply nested
// markup can't hit a recursion limit.
//
// Rust concepts:
// - Iterators: For processing collections
// - Option<T>: attr() may or may not find a value
// - HashSet: Deduplicates links for free
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all links on a page that stay on the crawl's domain
//
// Parameters:
//   document: the parsed page
//   page_url: the URL the page was fetched from (for resolving hrefs)
//   domain: the crawl's fixed domain (host of the seed URL)
//
// Returns: deduplicated set of absolute URL strings
//
// Example:
//   anchors [href="/a"], [href="https://other.com/b"] on base
//   https://example.com/ -> {"https://example.com/a"}
//
// A link is internal when its resolved host equals the domain exactly -
// no subdomain matching. hrefs whose resolved URL has no host at all
// (mailto:, tel:, javascript:) fail that comparison and drop out without
// any special casing. Fragment-only hrefs resolve to the page itself plus
// the fragment, and are kept like any other same-host URL.
pub fn extract_internal_links(document: &Html, page_url: &Url, domain: &str) -> HashSet<String> {
    let mut links = HashSet::new();

    // Select all <a> tags with an href attribute
    let selector = Selector::parse("a[href]").unwrap();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            // Resolve to an absolute URL; invalid hrefs are skipped
            let resolved = match page_url.join(href) {
                Ok(url) => url,
                Err(_) => continue,
            };

            // Exact host comparison keeps the crawl on its own domain
            if resolved.host_str() == Some(domain) {
                links.insert(resolved.to_string());
            }
        }
    }

    links
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. How does Url::join work?
//    - It resolves a reference against a base, like a browser does
//    - "/a" on https://example.com/x -> https://example.com/a
//    - "//cdn.example.com/y" keeps the base's scheme (protocol-relative)
//    - "#top" -> the base URL with its fragment replaced
//    - An href that's already absolute just parses to itself
//
// 2. Why compare host_str() instead of the whole URL?
//    - The crawl boundary is "same host as the seed", nothing more
//    - host_str() returns Option<&str>, and None (no host) can never
//      equal Some(domain), which is exactly the behavior we want for
//      mailto:/javascript: style links
//
// 3. Why return HashSet<String> instead of Vec<String>?
//    - Pages repeat links constantly (nav bars, footers)
//    - The crawl loop only cares about each URL once per page
// -----------------------------------------------------------------------------
