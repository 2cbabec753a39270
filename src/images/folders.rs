// src/images/folders.rs
// =============================================================================
// This module turns URLs into filesystem-safe directory names.
//
// Every crawled page gets its own folder for downloaded images. The folder
// name is built from the URL's host and path so you can tell pages apart at
// a glance, then percent-encoded so the operating system accepts it:
//
//   https://example.com/           -> example.com
//   https://example.com/about/us/  -> example.com_about_us
//   https://example.com/page(1)    -> example.com_page%281%29
//
// Rust concepts:
// - Pure functions: No side effects, same input -> same output
// - Cow<str>: urlencoding::encode returns a "clone on write" string
// =============================================================================

use url::Url;

// Builds a filesystem-safe folder name for a page URL
//
// Parameters:
//   url: the page URL (already parsed, therefore absolute)
//
// Returns: a String that's safe to use as a directory name
//
// The name is the URL's host followed by the path with slashes replaced by
// underscores. The port, query and fragment don't participate. The whole
// string is percent-encoded so characters like '(' or spaces can't confuse
// the filesystem.
//
// This function must stay deterministic: crawling the same page twice has to
// reuse the same directory instead of inventing a new one.
pub fn safe_folder_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");

    // "/about/us/" -> "about_us"
    let path = url.path().trim_matches('/').replace('/', "_");

    // Skip the separator when the page is the site root
    let folder = if path.is_empty() {
        host.to_string()
    } else {
        format!("{}_{}", host, path)
    };

    urlencoding::encode(&folder).into_owned()
}

// Builds the name of the top-level output directory for a whole crawl
//
// Parameters:
//   domain: the crawl domain (host of the seed URL)
//
// Returns: "images_" + the domain with dots replaced by underscores
//
// Example: "example.com" -> "images_example_com"
pub fn site_folder_name(domain: &str) -> String {
    format!("images_{}", domain.replace('.', "_"))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why percent-encode at all?
//    - URLs can contain characters that are legal in URLs but awkward or
//      forbidden in file names (quotes, parentheses, '%', ...)
//    - Percent-encoding maps them to %XX sequences, which are plain ASCII
//    - Letters, digits, '_', '-', '.' and '~' pass through unchanged
//
// 2. What is trim_matches('/')?
//    - Removes that character from BOTH ends of the string
//    - "/about/us/" becomes "about/us"
//    - Like Python's str.strip("/")
//
// 3. Why unwrap_or("") for the host?
//    - host_str() returns Option<&str> because some URLs (like mailto:)
//      have no host
//    - Pages we crawl always have one, but a pure helper shouldn't panic
//      over its input
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_name_is_deterministic() {
        let url = Url::parse("https://example.com/a/b").unwrap();
        assert_eq!(safe_folder_name(&url), safe_folder_name(&url));
    }

    #[test]
    fn test_root_page_uses_host_only() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(safe_folder_name(&url), "example.com");
    }

    #[test]
    fn test_path_slashes_become_underscores() {
        let url = Url::parse("https://example.com/about/us/").unwrap();
        assert_eq!(safe_folder_name(&url), "example.com_about_us");
    }

    #[test]
    fn test_unsafe_characters_are_percent_encoded() {
        let url = Url::parse("https://example.com/page(1)").unwrap();
        assert_eq!(safe_folder_name(&url), "example.com_page%281%29");
    }

    #[test]
    fn test_port_and_query_are_ignored() {
        let url = Url::parse("https://example.com:8080/shop?item=42").unwrap();
        assert_eq!(safe_folder_name(&url), "example.com_shop");
    }

    #[test]
    fn test_site_folder_name_replaces_dots() {
        assert_eq!(site_folder_name("example.com"), "images_example_com");
        assert_eq!(site_folder_name("127.0.0.1"), "images_127_0_0_1");
    }
}
