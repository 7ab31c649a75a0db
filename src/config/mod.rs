//! Configuration module for the crawler
//!
//! Run parameters come from the command line; HTTP client settings may
//! additionally be loaded from a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use site_crawler::config::{build_config, load_http_config};
//! use std::path::Path;
//!
//! let http = load_http_config(Path::new("crawler.toml")).unwrap();
//! let config = build_config("https://example.com", 50, 4, http).unwrap();
//! println!("Crawling at most {} pages", config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlSettings, FileConfig, HttpConfig};

// Re-export parser functions
pub use parser::{build_config, load_http_config, parse_http_config};
