//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client from configuration
//! - One GET per page, no retries
//! - Classifying failures as transport, status or content-type errors

use crate::config::HttpConfig;
use crate::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Media types accepted as HTML documents
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Source of page bodies for the crawl orchestrator
///
/// Implementations must be shareable across tasks; the orchestrator calls
/// `fetch` from many workers at once.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches one page and returns its body text
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from `config` and wraps it
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::HttpConfig;
/// use site_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the body of an HTML response
///
/// | Condition | Result |
/// |-----------|--------|
/// | Connect, DNS, timeout or body read failure | `FetchError::Transport` |
/// | Status ≥ 400 | `FetchError::HttpStatus` |
/// | Content-Type missing or not HTML | `FetchError::UnsupportedContentType` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> Result<String, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(transport)?;

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return Err(FetchError::UnsupportedContentType {
            url: url.to_string(),
            content_type: if content_type.is_empty() {
                "(none)".to_string()
            } else {
                content_type
            },
        });
    }

    response.text().await.map_err(transport)
}

/// Returns true if a Content-Type header value names an HTML media type
///
/// Parameters such as `charset` are ignored and matching is case-insensitive.
pub fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    HTML_MEDIA_TYPES.contains(&media_type.as_str())
}
