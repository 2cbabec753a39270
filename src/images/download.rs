// src/images/download.rs
// =============================================================================
// This module downloads every image referenced by a page.
//
// How it works:
// 1. Fetch the page HTML
// 2. Collect image URLs from <img src="..."> tags and inline style
//    backgrounds (the css submodule handles those)
// 3. Create the page's folder (only if the page actually has images)
// 4. Download the images concurrently and write them to disk
//
// Key functionality:
// - Each image URL is resolved against the page URL, so relative paths work
// - File names come from the last path segment, with a fallback for URLs
//   like https://example.com/ that have no usable segment
// - One broken image doesn't stop the others
//
// Rust concepts:
// - async/await: For concurrent downloads
// - Streams: buffer_unordered limits how many downloads run at once
// - PathBuf: Owned filesystem paths, built up with join()
// =============================================================================

use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

use super::css::extract_background_images;
use super::folders::safe_folder_name;
use crate::fetch::{fetch_bytes, fetch_page, FetchFailure};

// Fallback name for image URLs whose path has no final segment
pub const DEFAULT_IMAGE_NAME: &str = "image.jpg";

// How many images we download at the same time per page.
// Pages rarely have hundreds of images, so a small number is plenty
// and keeps us from hammering one server.
const IMAGE_CONCURRENCY: usize = 8;

// What happened when we harvested one page's images
//
// #[derive(Serialize, Deserialize)] lets us include this in JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestOutcome {
    /// The page the images came from
    pub page_url: String,
    /// Unique image URLs found on the page
    pub images_found: usize,
    /// How many of those were downloaded and written
    pub images_saved: usize,
    /// How many could not be downloaded or written
    pub images_failed: usize,
    /// Where the images went (None if the page had none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    /// Set when the page itself could not be fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchFailure>,
}

// Collects every image URL a page references
//
// Two sources, merged into one set:
// - <img> tags with a src attribute (empty src is skipped)
// - url(...) values inside inline style attributes
//
// Returns: deduplicated set of absolute URL strings
pub fn collect_image_urls(document: &Html, base_url: &Url) -> HashSet<String> {
    let mut image_urls = HashSet::new();

    // Select all <img> tags that have a src attribute
    let selector = Selector::parse("img[src]").unwrap();

    for element in document.select(&selector) {
        if let Some(src) = element.value().attr("src") {
            // <img src=""> is a real thing on sloppy pages; nothing to fetch
            if src.is_empty() {
                continue;
            }

            // Resolve relative paths against the page URL
            if let Ok(resolved) = base_url.join(src) {
                image_urls.insert(resolved.to_string());
            }
        }
    }

    // Backgrounds declared in style="..." attributes
    image_urls.extend(extract_background_images(document, base_url));

    image_urls
}

// Picks a file name for an image URL
//
// The last path segment becomes the file name:
//   https://example.com/static/logo.png -> logo.png
//   https://example.com/                -> image.jpg (fallback)
//
// The query string is ignored, so logo.png?v=2 still saves as logo.png.
// Two URLs that end in the same segment get the same name, and the later
// download overwrites the earlier one.
pub fn image_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .unwrap_or_else(|| DEFAULT_IMAGE_NAME.to_string())
}

// Downloads all images on a page into its own folder under output_base
//
// This function fetches the page itself, so it works standalone (the
// `page` subcommand) as well as inside the crawl loop.
//
// Parameters:
//   client: shared HTTP client
//   page_url: the page to harvest
//   output_base: the site folder (images_<domain>) the page folder goes in
//
// Returns: HarvestOutcome with counts; never an Err, because a page that
// fails to download is a recorded result, not a reason to stop the crawl
pub async fn download_page_images(
    client: &Client,
    page_url: &Url,
    output_base: &Path,
) -> HarvestOutcome {
    // Fetch the page
    let html = match fetch_page(client, page_url.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            eprintln!("  Warning: failed to retrieve {}: {}", page_url, e);
            return HarvestOutcome {
                page_url: page_url.to_string(),
                images_found: 0,
                images_saved: 0,
                images_failed: 0,
                folder: None,
                error: Some(e),
            };
        }
    };

    // Parse and collect inside a block so the DOM is dropped before any
    // .await below. Html is not Send, and the task may hop threads at
    // every await point.
    let image_urls: Vec<String> = {
        let document = Html::parse_document(&html);
        let mut urls: Vec<String> = collect_image_urls(&document, page_url).into_iter().collect();
        urls.sort();
        urls
    };

    // No images means no folder. We don't litter the output directory
    // with empty directories for text-only pages.
    if image_urls.is_empty() {
        return HarvestOutcome {
            page_url: page_url.to_string(),
            images_found: 0,
            images_saved: 0,
            images_failed: 0,
            folder: None,
            error: None,
        };
    }

    let images_found = image_urls.len();
    println!("  Found {} image(s) on {}", images_found, page_url);

    let folder = output_base.join(safe_folder_name(page_url));
    if let Err(e) = std::fs::create_dir_all(&folder) {
        eprintln!("  Warning: could not create {}: {}", folder.display(), e);
        return HarvestOutcome {
            page_url: page_url.to_string(),
            images_found,
            images_saved: 0,
            images_failed: images_found,
            folder: None,
            error: None,
        };
    }

    // One future per image, each reporting whether it saved
    let futures = image_urls.into_iter().map(|image_url| {
        let client = client.clone();
        let folder = folder.clone();
        async move {
            match download_image(&client, &image_url, &folder).await {
                Ok(file_name) => {
                    println!("    Downloaded: {}", file_name);
                    true
                }
                Err(e) => {
                    eprintln!("    Error downloading {}: {}", image_url, e);
                    false
                }
            }
        }
    });

    // Run up to IMAGE_CONCURRENCY downloads at once
    let results: Vec<bool> = stream::iter(futures)
        .buffer_unordered(IMAGE_CONCURRENCY)
        .collect()
        .await;

    let images_saved = results.iter().filter(|saved| **saved).count();

    HarvestOutcome {
        page_url: page_url.to_string(),
        images_found,
        images_saved,
        images_failed: images_found - images_saved,
        folder: Some(folder),
        error: None,
    }
}

// Downloads a single image and writes it into the page folder
//
// Returns the file name it was saved under, for logging
async fn download_image(client: &Client, image_url: &str, folder: &Path) -> Result<String> {
    let parsed = Url::parse(image_url)
        .map_err(|e| anyhow!("invalid image URL '{}': {}", image_url, e))?;

    let file_name = image_file_name(&parsed);

    let bytes = fetch_bytes(client, image_url)
        .await
        .map_err(|e| anyhow!("{}", e))?;

    let path = folder.join(&file_name);
    std::fs::write(&path, &bytes)
        .map_err(|e| anyhow!("could not write {}: {}", path.display(), e))?;

    Ok(file_name)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does download_page_images return HarvestOutcome, not Result?
//    - A page that 404s is data (we report it), not a program error
//    - The crawl keeps going no matter what one page does
//    - Result is reserved for failures the caller should stop on
//
// 2. Why std::fs::write instead of tokio::fs?
//    - Image files are small and the write is a single syscall
//    - Spawning async file I/O for that buys nothing here
//    - The downloads themselves (network) are where async pays off
//
// 3. Why sort the URLs before downloading?
//    - HashSet iteration order is random between runs
//    - Sorting makes two runs against the same site behave the same
//
// 4. What happens when two images share a file name?
//    - Both downloads succeed and write to the same path
//    - Whichever finishes last wins; the folder ends up with one file
//    - Page folders keep images from different pages apart, so this
//      only bites within a single page
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::build_client;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_from_last_path_segment() {
        let url = Url::parse("https://example.com/static/logo.png").unwrap();
        assert_eq!(image_file_name(&url), "logo.png");
    }

    #[test]
    fn test_default_name_when_path_has_no_segment() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(image_file_name(&url), "image.jpg");
    }

    #[test]
    fn test_query_string_does_not_affect_file_name() {
        let url = Url::parse("https://example.com/logo.png?v=2").unwrap();
        assert_eq!(image_file_name(&url), "logo.png");
    }

    #[test]
    fn test_same_last_segment_means_same_file_name() {
        let a = Url::parse("https://example.com/a/logo.png").unwrap();
        let b = Url::parse("https://example.com/b/logo.png").unwrap();
        assert_eq!(image_file_name(&a), image_file_name(&b));
    }

    #[test]
    fn test_collect_merges_img_tags_and_inline_styles() {
        let html = r#"
            <img src="/static/logo.png">
            <div style="background-image: url('banner.jpg')"></div>
        "#;
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com/page/").unwrap();

        let urls = collect_image_urls(&document, &base);

        assert_eq!(urls.len(), 2);
        assert!(urls.contains("https://example.com/static/logo.png"));
        assert!(urls.contains("https://example.com/page/banner.jpg"));
    }

    #[test]
    fn test_collect_skips_empty_src() {
        let html = r#"<img src=""><img alt="no src at all">"#;
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com/").unwrap();

        let urls = collect_image_urls(&document, &base);

        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn test_download_page_images_writes_files() {
        let mut server = mockito::Server::new_async().await;

        let page = server
            .mock("GET", "/gallery")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<html><body><img src="/static/logo.png"></body></html>"#)
            .create_async()
            .await;
        let image = server
            .mock("GET", "/static/logo.png")
            .with_status(200)
            .with_body(vec![0x89u8, 0x50, 0x4e, 0x47])
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let client = build_client(Duration::from_secs(5)).unwrap();
        let page_url = Url::parse(&format!("{}/gallery", server.url())).unwrap();

        let outcome = download_page_images(&client, &page_url, temp.path()).await;

        assert_eq!(outcome.images_found, 1);
        assert_eq!(outcome.images_saved, 1);
        assert_eq!(outcome.images_failed, 0);
        assert!(outcome.error.is_none());

        let folder = outcome.folder.expect("page had images, folder expected");
        let saved = std::fs::read(folder.join("logo.png")).unwrap();
        assert_eq!(saved, vec![0x89u8, 0x50, 0x4e, 0x47]);

        page.assert_async().await;
        image.assert_async().await;
    }

    #[tokio::test]
    async fn test_broken_image_counts_as_failed() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/mixed")
            .with_status(200)
            .with_body(r#"<img src="/good.png"><img src="/gone.png">"#)
            .create_async()
            .await;
        server
            .mock("GET", "/good.png")
            .with_status(200)
            .with_body(vec![1u8, 2, 3])
            .create_async()
            .await;
        server
            .mock("GET", "/gone.png")
            .with_status(404)
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let client = build_client(Duration::from_secs(5)).unwrap();
        let page_url = Url::parse(&format!("{}/mixed", server.url())).unwrap();

        let outcome = download_page_images(&client, &page_url, temp.path()).await;

        assert_eq!(outcome.images_found, 2);
        assert_eq!(outcome.images_saved, 1);
        assert_eq!(outcome.images_failed, 1);

        let folder = outcome.folder.expect("one image saved, folder expected");
        assert!(folder.join("good.png").exists());
        assert!(!folder.join("gone.png").exists());
    }

    #[tokio::test]
    async fn test_colliding_file_names_leave_one_file() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/page")
            .with_status(200)
            .with_body(r#"<img src="/a/logo.png"><img src="/b/logo.png">"#)
            .create_async()
            .await;
        server
            .mock("GET", "/a/logo.png")
            .with_status(200)
            .with_body("AAA")
            .create_async()
            .await;
        server
            .mock("GET", "/b/logo.png")
            .with_status(200)
            .with_body("BBB")
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let client = build_client(Duration::from_secs(5)).unwrap();
        let page_url = Url::parse(&format!("{}/page", server.url())).unwrap();

        let outcome = download_page_images(&client, &page_url, temp.path()).await;

        // Both downloads succeed; they just fight over one name
        assert_eq!(outcome.images_found, 2);
        assert_eq!(outcome.images_saved, 2);

        let folder = outcome.folder.expect("images saved, folder expected");
        let entries: Vec<_> = std::fs::read_dir(&folder).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let content = std::fs::read_to_string(folder.join("logo.png")).unwrap();
        assert!(content == "AAA" || content == "BBB");
    }

    #[tokio::test]
    async fn test_imageless_page_creates_no_folder() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/plain")
            .with_status(200)
            .with_body("<html><body><p>No pictures here.</p></body></html>")
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let client = build_client(Duration::from_secs(5)).unwrap();
        let page_url = Url::parse(&format!("{}/plain", server.url())).unwrap();

        let outcome = download_page_images(&client, &page_url, temp.path()).await;

        assert_eq!(outcome.images_found, 0);
        assert!(outcome.folder.is_none());

        let would_be = temp.path().join(safe_folder_name(&page_url));
        assert!(!would_be.exists());
    }

    #[tokio::test]
    async fn test_unreachable_page_is_reported_not_fatal() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/secret")
            .with_status(500)
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let client = build_client(Duration::from_secs(5)).unwrap();
        let page_url = Url::parse(&format!("{}/secret", server.url())).unwrap();

        let outcome = download_page_images(&client, &page_url, temp.path()).await;

        assert_eq!(outcome.images_found, 0);
        match outcome.error {
            Some(FetchFailure::HttpStatus { code }) => assert_eq!(code, 500),
            other => panic!("expected HttpStatus failure, got {:?}", other),
        }
    }
}
