// src/crawl/session.rs
// =============================================================================
// This module runs the crawl itself.
//
// How it works:
// 1. Start with the seed URL in a queue
// 2. Pop the next unvisited URL and fetch it
// 3. Extract same-domain links and add them to the queue
// 4. Harvest the page's images into its own folder
// 5. Repeat until the queue is empty (or we hit --max-pages)
//
// The queue is first-in first-out, so the crawl radiates outward from the
// seed one "hop" at a time. Links found on a page are queued in sorted
// order, which makes two runs against the same site visit pages in the
// same order.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - Struct methods: The queue logic lives on CrawlSession so it can be
//   tested without any network at all
// =============================================================================

use anyhow::{anyhow, Result};
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::time::Duration;
use url::Url;

use super::links::extract_internal_links;
use crate::fetch::{build_client, fetch_page, FetchFailure};
use crate::images::{download_page_images, site_folder_name};

// Tracks where the crawl has been and where it still has to go
//
// This struct is pure bookkeeping. It never touches the network, which
// is what lets us unit test the visiting order directly.
pub struct CrawlSession {
    // URLs waiting to be visited (may contain duplicates; next_url filters)
    frontier: VecDeque<String>,
    // URLs we've already popped and processed
    visited: HashSet<String>,
    // Every internal link seen anywhere on the site
    all_links: HashSet<String>,
}

impl CrawlSession {
    // Starts a session with just the seed URL queued
    pub fn new(seed: &Url) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(seed.to_string());

        CrawlSession {
            frontier,
            visited: HashSet::new(),
            all_links: HashSet::new(),
        }
    }

    // Pops the next URL that hasn't been visited yet
    //
    // Returns None when the frontier has nothing new left, which is the
    // crawl's natural end.
    pub fn next_url(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop_front() {
            // The same URL can be discovered by many pages; visit once
            if self.visited.contains(&url) {
                continue;
            }

            self.visited.insert(url.clone());
            return Some(url);
        }

        None
    }

    // Records the links found on one page
    //
    // Each page's batch is sorted before queueing so the crawl order
    // doesn't depend on hash iteration order.
    pub fn record_links(&mut self, links: HashSet<String>) {
        let mut batch: Vec<String> = links.iter().cloned().collect();
        batch.sort();

        self.all_links.extend(links);

        for link in batch {
            if !self.visited.contains(&link) {
                self.frontier.push_back(link);
            }
        }
    }

    // How many pages have been visited so far
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }

    // True if the frontier still holds at least one unvisited URL
    pub fn has_pending(&self) -> bool {
        self.frontier.iter().any(|url| !self.visited.contains(url))
    }

    // Every internal link discovered during the crawl, sorted
    pub fn discovered_links(&self) -> Vec<String> {
        let mut links: Vec<String> = self.all_links.iter().cloned().collect();
        links.sort();
        links
    }
}

// What happened on a single page during the crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    /// The page URL
    pub url: String,
    /// Internal links found on the page
    pub links_found: usize,
    /// Unique image URLs found on the page
    pub images_found: usize,
    /// Images downloaded and written to disk
    pub images_saved: usize,
    /// Images that could not be downloaded or written
    pub images_failed: usize,
    /// Set when the link pass could not fetch the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_error: Option<FetchFailure>,
    /// Set when the image pass could not fetch the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_error: Option<FetchFailure>,
}

impl PageReport {
    /// True when both passes succeeded and every image was saved
    pub fn is_ok(&self) -> bool {
        self.link_error.is_none() && self.image_error.is_none() && self.images_failed == 0
    }
}

// The full result of a crawl, ready for the table or JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// The seed URL the crawl started from
    pub seed: String,
    /// The domain the crawl was restricted to
    pub domain: String,
    /// One entry per visited page, in visiting order
    pub pages: Vec<PageReport>,
    /// Every internal link discovered anywhere on the site, sorted
    pub all_links: Vec<String>,
    /// True when --max-pages stopped the crawl before the frontier emptied
    pub truncated: bool,
}

impl CrawlReport {
    pub fn total_images_found(&self) -> usize {
        self.pages.iter().map(|p| p.images_found).sum()
    }

    pub fn total_images_saved(&self) -> usize {
        self.pages.iter().map(|p| p.images_saved).sum()
    }

    pub fn total_images_failed(&self) -> usize {
        self.pages.iter().map(|p| p.images_failed).sum()
    }

    /// Pages where something went wrong (fetch failure or lost images)
    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| !p.is_ok()).count()
    }
}

// Crawls a whole site and harvests images from every page
//
// Parameters:
//   seed_url: where the crawl starts; its host fixes the crawl's domain
//   output_dir: where the images_<domain> folder is created
//   max_pages: optional cap on how many pages to visit
//   timeout: per-request timeout for the shared HTTP client
//
// Returns: CrawlReport on success. An Err here means the crawl could not
// even start (bad seed URL, no host); anything that goes wrong on an
// individual page is recorded in its PageReport instead.
pub async fn crawl_site(
    seed_url: &str,
    output_dir: &Path,
    max_pages: Option<usize>,
    timeout: Duration,
) -> Result<CrawlReport> {
    // Parse and validate the seed URL
    let seed = Url::parse(seed_url).map_err(|e| anyhow!("Invalid URL '{}': {}", seed_url, e))?;

    // The seed's host becomes the crawl boundary
    let domain = seed
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", seed_url))?
        .to_string();

    // One client for the whole crawl (connection pooling)
    let client = build_client(timeout)?;

    // All of this site's images live under images_<domain>
    let output_base = output_dir.join(site_folder_name(&domain));

    let mut session = CrawlSession::new(&seed);
    let mut pages = Vec::new();
    let mut truncated = false;

    loop {
        // Stop early if we've hit the page cap
        if let Some(limit) = max_pages {
            if session.pages_visited() >= limit {
                truncated = session.has_pending();
                break;
            }
        }

        let url = match session.next_url() {
            Some(url) => url,
            None => break,
        };

        println!("\n  Scraping: {}", url);

        // Frontier URLs were produced by Url::to_string(), so this
        // re-parse only fails if something truly odd got queued
        let page_url = match Url::parse(&url) {
            Ok(parsed) => parsed,
            Err(_) => continue,
        };

        let mut report = PageReport {
            url: url.clone(),
            links_found: 0,
            images_found: 0,
            images_saved: 0,
            images_failed: 0,
            link_error: None,
            image_error: None,
        };

        // First pass: links, so the frontier keeps growing
        match fetch_page(&client, &url).await {
            Ok(html) => {
                // Parse in a block so the DOM is dropped before the
                // image pass awaits (Html is not Send)
                let links = {
                    let document = Html::parse_document(&html);
                    extract_internal_links(&document, &page_url, &domain)
                };

                report.links_found = links.len();
                session.record_links(links);
            }
            Err(e) => {
                eprintln!("  Warning: failed to fetch {}: {}", url, e);
                report.link_error = Some(e);
            }
        }

        // Second pass: images. It does its own fetch, so it still runs
        // (and still fails independently) when the link pass failed.
        let outcome = download_page_images(&client, &page_url, &output_base).await;
        report.images_found = outcome.images_found;
        report.images_saved = outcome.images_saved;
        report.images_failed = outcome.images_failed;
        report.image_error = outcome.error;

        pages.push(report);
    }

    Ok(CrawlReport {
        seed: seed.to_string(),
        domain,
        pages,
        all_links: session.discovered_links(),
        truncated,
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why fetch each page twice (links, then images)?
//    - The two passes are independent steps with independent failures
//    - The image pass works standalone (the `page` subcommand reuses it),
//      so it fetches for itself instead of borrowing the link pass's HTML
//    - The cost is one extra GET per page
//
// 2. Why check visited when popping instead of when pushing?
//    - A URL can sit in the frontier, get visited via a duplicate, and
//      only then come up for its turn
//    - Checking at pop time catches that case; checking at push time
//      alone would not
//
// 3. What does "truncated" mean in the report?
//    - --max-pages stopped the crawl while unvisited URLs remained
//    - The caller can tell the user the site was bigger than the cap
//
// 4. Why is CrawlSession separate from crawl_site?
//    - crawl_site needs a server to talk to; CrawlSession doesn't
//    - Queue ordering bugs are the subtle ones, and this split lets the
//      tests pin the visiting order down synchronously
// -----------------------------------------------------------------------------
