//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching, one attempt per page
//! - HTML parsing and link extraction
//! - The concurrency budget and outstanding-work tracking
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_url, is_html_content_type, Fetcher, HttpFetcher};
pub use parser::extract_links;
pub use scheduler::{BudgetPermit, ConcurrencyBudget, UnitSlot, WorkTicket, WorkTracker};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Schedule the base URL as the first unit of work
/// 3. Fetch pages and follow in-host links within the budget
/// 4. Return the link counts once no work is outstanding
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed; individual page failures are counted, not returned
/// * `Err(CrawlError)` - The crawl could not be started
pub async fn crawl(config: &Config) -> Result<CrawlOutcome> {
    Coordinator::new(config)?.run().await
}
