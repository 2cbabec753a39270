// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "image-harvester",
    version = "0.1.0",
    about = "A CLI tool to crawl a website and download every image it uses",
    long_about = "image-harvester crawls every same-domain page reachable from a seed URL and \
                  downloads the images each page references, sorted into one folder per page."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (crawl, page)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a whole site and download every page's images
    ///
    /// Example: image-harvester crawl https://example.com --max-pages 50
    Crawl {
        /// Website URL to start from (e.g., https://example.com)
        ///
        /// Optional: when omitted, you'll be prompted for it
        website_url: Option<String>,

        /// Output results in JSON format instead of a table
        ///
        /// This is an optional flag: --json
        #[arg(long)]
        json: bool,

        /// Maximum number of pages to visit
        ///
        /// Without this the crawl runs until it has seen every reachable
        /// same-domain page. Handy as a safety net on large sites.
        #[arg(long)]
        max_pages: Option<usize>,

        /// Directory the images_<domain> folder is created in
        ///
        /// #[arg(long, default_value = ".")] creates --output with a default
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },

    /// Download the images from a single page, no crawling
    ///
    /// Example: image-harvester page https://example.com/gallery
    Page {
        /// Page URL to harvest (e.g., https://example.com/gallery)
        ///
        /// Optional: when omitted, you'll be prompted for it
        website_url: Option<String>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Directory the images_<domain> folder is created in
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why use structs and enums?
//    - Structs group related data (like the CLI arguments)
//    - Enums represent choices (like "crawl OR page")
//    - Both are core Rust types for organizing data
//
// 2. What are derive macros?
//    - #[derive(...)] automatically generates code for common operations
//    - Parser: generates CLI parsing logic
//    - Debug: generates code to print the struct for debugging
//
// 3. Why is website_url an Option<String>?
//    - Option<String> makes the positional argument optional
//    - None means the user didn't type a URL, so we ask for one
//      interactively instead of erroring out
//
// 4. Why PathBuf instead of String for --output?
//    - PathBuf is the owned type for filesystem paths
//    - clap parses it directly, and join()/display() come for free
//
// 5. What is default_value vs default_value_t?
//    - default_value takes a string clap parses into the field's type
//    - default_value_t takes an actual value of the field's type
//    - "." needs parsing into PathBuf; 10 is already a u64
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::try_parse_from(["image-harvester", "crawl", "https://example.com"]).unwrap();

        match cli.command {
            Commands::Crawl {
                website_url,
                json,
                max_pages,
                output,
                timeout,
            } => {
                assert_eq!(website_url.as_deref(), Some("https://example.com"));
                assert!(!json);
                assert_eq!(max_pages, None);
                assert_eq!(output, PathBuf::from("."));
                assert_eq!(timeout, 10);
            }
            other => panic!("expected crawl, got {:?}", other),
        }
    }

    #[test]
    fn test_crawl_url_can_be_omitted() {
        let cli = Cli::try_parse_from(["image-harvester", "crawl"]).unwrap();

        match cli.command {
            Commands::Crawl { website_url, .. } => assert_eq!(website_url, None),
            other => panic!("expected crawl, got {:?}", other),
        }
    }

    #[test]
    fn test_crawl_flags_parse() {
        let cli = Cli::try_parse_from([
            "image-harvester",
            "crawl",
            "https://example.com",
            "--json",
            "--max-pages",
            "25",
            "--output",
            "/tmp/harvest",
            "--timeout",
            "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Crawl {
                json,
                max_pages,
                output,
                timeout,
                ..
            } => {
                assert!(json);
                assert_eq!(max_pages, Some(25));
                assert_eq!(output, PathBuf::from("/tmp/harvest"));
                assert_eq!(timeout, 30);
            }
            other => panic!("expected crawl, got {:?}", other),
        }
    }

    #[test]
    fn test_page_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "image-harvester",
            "page",
            "https://example.com/gallery",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Page {
                website_url, json, ..
            } => {
                assert_eq!(website_url.as_deref(), Some("https://example.com/gallery"));
                assert!(json);
            }
            other => panic!("expected page, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["image-harvester", "walk"]).is_err());
    }
}
