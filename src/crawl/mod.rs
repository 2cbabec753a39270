// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Submodules:
// - session: The crawl loop, visiting order, and the final report
// - links: Extracts same-domain links from a page
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Respects same-domain restriction (doesn't crawl external sites)
// - Optional page cap via --max-pages
// - Harvests every page's images as it goes
//
// Rust concepts:
// - Async programming: For concurrent network requests
// - Collections: HashSet for tracking visited URLs, VecDeque for the queue
// =============================================================================

mod links;
mod session;

// Re-export the public crawling API
pub use session::{crawl_site, CrawlReport, PageReport};
