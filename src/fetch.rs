// src/fetch.rs
// =============================================================================
// This module is our HTTP layer: one shared client plus small helpers that
// every other module goes through.
//
// Key functionality:
// - Builds a reqwest client with the configured per-request timeout
// - fetch_page: GET a URL and return its body text (pages)
// - fetch_bytes: GET a URL and return its raw bytes (images)
// - Classifies failures into a small taxonomy we can log and report
//
// A non-success status counts as a failure here. Callers decide what to do
// with a failure; these helpers never panic and never retry.
//
// Rust concepts:
// - Result<T, E> with a custom error enum
// - Implementing Display so errors print nicely
// - async/await: For network I/O
// =============================================================================

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// Why a URL could not be fetched
//
// Two kinds matter to us:
// - Network: the request itself failed (timeout, DNS, refused connection...)
// - HttpStatus: the server answered, but not with a success code
//
// Parse oddities (a page with no links, no images, no <body>) are NOT
// failures - they're just empty results.
//
// #[derive(Serialize, Deserialize)] lets the failure appear in JSON reports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchFailure {
    /// The request never produced a response (timeout, DNS, connection...)
    Network { reason: String },
    /// The server responded with a non-success status code
    HttpStatus { code: u16 },
}

impl FetchFailure {
    // Categorizes a reqwest error into a human-readable reason
    //
    // reqwest errors can happen for many reasons:
    // - Network timeout
    // - DNS resolution failure
    // - Connection refused / host unreachable
    // - TLS certificate issues
    fn from_request_error(error: &reqwest::Error) -> Self {
        // Convert to string once so we can sniff for details
        let error_string = error.to_string();

        let reason = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            // Connection errors often mean DNS issues or host unreachable
            if error_string.contains("dns") {
                "could not resolve hostname".to_string()
            } else {
                "connection failed".to_string()
            }
        } else if error_string.contains("certificate") || error_string.contains("ssl") {
            "tls certificate error".to_string()
        } else {
            error_string
        };

        FetchFailure::Network { reason }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Network { reason } => write!(f, "{}", reason),
            FetchFailure::HttpStatus { code } => write!(f, "HTTP {}", code),
        }
    }
}

// Lets FetchFailure travel through anyhow with the ? operator
impl std::error::Error for FetchFailure {}

// Builds the HTTP client shared by a whole crawl
//
// Parameters:
//   timeout: applied to every request the client makes
//
// One client per crawl means connection pooling works for us: repeated
// requests to the same host reuse the same connection.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

// Fetches a page and returns its HTML as text
//
// Parameters:
//   client: the shared HTTP client
//   url: the page URL to fetch
//
// Returns: Ok(body) on a success status, Err(FetchFailure) otherwise
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchFailure::from_request_error(&e))?;

    if !response.status().is_success() {
        return Err(FetchFailure::HttpStatus {
            code: response.status().as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchFailure::from_request_error(&e))
}

// Fetches a resource and returns its raw bytes
//
// Same contract as fetch_page, but for binary content (images).
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchFailure::from_request_error(&e))?;

    if !response.status().is_success() {
        return Err(FetchFailure::HttpStatus {
            code: response.status().as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchFailure::from_request_error(&e))?;

    Ok(bytes.to_vec())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a custom error enum instead of anyhow everywhere?
//    - The reports serialize page failures to JSON, so the failure needs
//      to be a real type with Serialize
//    - anyhow::Error is great for bubbling errors up to main, but it's
//      opaque - you can't match on it or serialize it
//    - We use both: FetchFailure at the boundary, anyhow above it
//
// 2. What does map_err do?
//    - Transforms the error inside a Result, leaving Ok values alone
//    - Here it converts reqwest::Error into our FetchFailure
//    - After map_err, the ? operator propagates OUR type
//
// 3. Why implement std::error::Error?
//    - anyhow can absorb any type that implements it via ?
//    - That's what lets download code write `fetch_bytes(...).await?`
//      inside a function returning anyhow::Result
//
// 4. Why does fetch_bytes call to_vec()?
//    - response.bytes() returns Bytes, a reference-counted buffer type
//    - Vec<u8> keeps our public signatures free of another crate's types
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_page_returns_body_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page.html")
            .with_status(200)
            .with_body("<html>hello</html>")
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let body = fetch_page(&client, &format!("{}/page.html", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "<html>hello</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_reports_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let result = fetch_page(&client, &format!("{}/missing", server.url())).await;

        match result {
            Err(FetchFailure::HttpStatus { code }) => assert_eq!(code, 404),
            other => panic!("expected HttpStatus failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/logo.png")
            .with_status(200)
            .with_body(vec![0x89u8, 0x50, 0x4e, 0x47])
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let bytes = fetch_bytes(&client, &format!("{}/logo.png", server.url()))
            .await
            .unwrap();

        assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn test_failure_display_formats() {
        let network = FetchFailure::Network {
            reason: "request timed out".to_string(),
        };
        assert_eq!(network.to_string(), "request timed out");

        let status = FetchFailure::HttpStatus { code: 503 };
        assert_eq!(status.to_string(), "HTTP 503");
    }
}
