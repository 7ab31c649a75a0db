//! Output module for crawl reports
//!
//! This module handles:
//! - Ranking the visited registry and rendering it as a text report
//! - Writing the report to a file
//! - Collecting and rendering crawl statistics

mod report;
pub mod stats;

pub use report::{format_report, sort_pages, write_report, PageCount};
pub use stats::{format_statistics, CrawlCounters, CrawlEvent, CrawlStatistics};
