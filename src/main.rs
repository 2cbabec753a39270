// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. Crawl the site (or just one page) and download images
// 4. Print the report and exit with proper code
//    (0 = everything saved, 1 = some pages or images failed, 2 = error)
//
// Rust concepts used:
// - async/await: Because we need to make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod crawl;         // src/crawl/ - crawl loop and link extraction
mod fetch;         // src/fetch.rs - shared HTTP client and fetch errors
mod images;        // src/images/ - finding and downloading images

// Import items we need from our modules
use cli::{Cli, Commands};
use clap::Parser;  // Parser trait enables the parse() method

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::{anyhow, Result};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use url::Url;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every page fetched, every image saved
//   Ok(1) = some pages or images failed
//   Err = the run could not start (bad URL, no host, client build failed)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Match on which subcommand was used
    // Each branch handles a different command (crawl, page)
    match cli.command {
        Commands::Crawl {
            website_url,
            json,
            max_pages,
            output,
            timeout,
        } => handle_crawl(website_url, json, max_pages, &output, timeout).await,
        Commands::Page {
            website_url,
            json,
            output,
            timeout,
        } => handle_page(website_url, json, &output, timeout).await,
    }
}

// Handles the 'crawl' subcommand
// Parameters:
//   website_url: seed URL, or None to prompt for one
//   json: whether to output JSON format
//   max_pages: optional cap on pages visited
//   output: directory the images_<domain> folder goes in
//   timeout: per-request timeout in seconds
async fn handle_crawl(
    website_url: Option<String>,
    json: bool,
    max_pages: Option<usize>,
    output: &Path,
    timeout: u64,
) -> Result<i32> {
    // Ask interactively when no URL was given on the command line
    let seed_url = match website_url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    println!("🔍 Crawling website: {}", seed_url);
    if let Some(limit) = max_pages {
        println!("📊 Page limit: {}", limit);
    }

    // Crawl the site and harvest every page's images
    let report = crawl::crawl_site(
        &seed_url,
        output,
        max_pages,
        Duration::from_secs(timeout),
    )
    .await?;

    println!("\n📄 Visited {} page(s)", report.pages.len());

    // Print results and determine exit code
    print_report(&report, json)?;

    if report.failed_pages() > 0 {
        Ok(1)  // Exit code 1 = something on some page went wrong
    } else {
        Ok(0)  // Exit code 0 = all good
    }
}

// Handles the 'page' subcommand
// Parameters:
//   website_url: page URL, or None to prompt for one
//   json: whether to output JSON format
//   output: directory the images_<domain> folder goes in
//   timeout: per-request timeout in seconds
async fn handle_page(
    website_url: Option<String>,
    json: bool,
    output: &Path,
    timeout: u64,
) -> Result<i32> {
    let page_url = match website_url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    println!("🔍 Harvesting page: {}", page_url);

    // Validate up front; a URL we can't parse is fatal for this command
    let parsed = Url::parse(&page_url).map_err(|e| anyhow!("Invalid URL '{}': {}", page_url, e))?;
    let domain = parsed
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", page_url))?
        .to_string();

    let client = fetch::build_client(Duration::from_secs(timeout))?;
    let output_base = output.join(images::site_folder_name(&domain));

    let outcome = images::download_page_images(&client, &parsed, &output_base).await;

    if json {
        let json_output = serde_json::to_string_pretty(&outcome)?;
        println!("{}", json_output);
    } else {
        println!("\n📊 Summary:");
        println!("   🖼️  Images found: {}", outcome.images_found);
        println!("   ✅ Saved: {}", outcome.images_saved);
        println!("   ❌ Failed: {}", outcome.images_failed);
        if let Some(folder) = &outcome.folder {
            println!("   📂 Folder: {}", folder.display());
        }
    }

    if outcome.error.is_some() || outcome.images_failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Asks the user for a URL on stdin
//
// print! doesn't flush, so we flush explicitly or the prompt would only
// appear after the user already typed something
fn prompt_for_url() -> Result<String> {
    print!("Enter website URL: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let url = input.trim().to_string();
    if url.is_empty() {
        return Err(anyhow!("No URL entered"));
    }

    Ok(url)
}

// Prints the crawl report either as a table or JSON
// Parameters:
//   report: the finished crawl report
//   json: whether to output JSON format
fn print_report(report: &crawl::CrawlReport, json: bool) -> Result<()> {
    if json {
        // Serialize the whole report to JSON and print
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        // Print human-readable table
        print_table(report);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(report: &crawl::CrawlReport) {
    // Print table header
    println!();
    println!(
        "{:<60} {:>6} {:>6} {:>6} {:<18}",
        "PAGE", "LINKS", "FOUND", "SAVED", "STATUS"
    );
    println!("{}", "=".repeat(100));

    // Print each page
    for page in &report.pages {
        // Truncate URL if too long for display
        let url_display = if page.url.len() > 57 {
            format!("{}...", &page.url[..57])
        } else {
            page.url.clone()
        };

        println!(
            "{:<60} {:>6} {:>6} {:>6} {:<18}",
            url_display,
            page.links_found,
            page.images_found,
            page.images_saved,
            format_page_status(page)
        );
    }

    println!();

    // List every internal link the crawl discovered
    if !report.all_links.is_empty() {
        println!("📋 Discovered internal links:");
        for link in &report.all_links {
            println!("   {}", link);
        }
        println!();
    }

    // Print summary
    println!("📊 Summary:");
    println!("   📄 Pages visited: {}", report.pages.len());
    println!("   🔗 Internal links discovered: {}", report.all_links.len());
    println!("   🖼️  Images found: {}", report.total_images_found());
    println!("   ✅ Saved: {}", report.total_images_saved());
    println!("   ❌ Failed: {}", report.total_images_failed());

    if report.truncated {
        println!("   ⚠️  Stopped at the page limit; unvisited pages remain");
    }
}

// Formats a page's status for the table
fn format_page_status(page: &crawl::PageReport) -> String {
    if page.link_error.is_some() || page.image_error.is_some() {
        "❌ FETCH FAILED".to_string()
    } else if page.images_failed > 0 {
        "⚠️  PARTIAL".to_string()
    } else {
        "✅ OK".to_string()
    }
}
