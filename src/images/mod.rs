// src/images/mod.rs
// =============================================================================
// This module handles everything image-related.
//
// Submodules:
// - download: Fetches a page, finds its images, writes them to disk
// - css: Pulls image URLs out of inline style attributes
// - folders: Maps pages and domains to safe directory names
//
// Why a separate module tree?
// - The crawl module decides WHERE to go
// - This module decides WHAT to save once we're there
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

mod css;
mod download;
mod folders;

// Re-export the public API so callers write `images::download_page_images`
// instead of reaching into submodules
pub use download::{download_page_images, HarvestOutcome};
pub use folders::site_folder_name;
