//! URL handling module
//!
//! This module turns URLs into page identities and decides which URLs belong
//! to the crawl boundary.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{authority, is_same_authority};
pub use normalize::normalize_url;
