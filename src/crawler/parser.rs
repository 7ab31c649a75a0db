//! HTML parser for extracting page references
//!
//! Collects the targets of `<a href>`, `<img src>` and `<script src>` in
//! document order, resolved to absolute URLs. Filtering by host and
//! deduplication happen later, in the coordinator.

use crate::ExtractError;
use scraper::{Html, Selector};
use url::Url;

/// Elements and the attribute on each that holds a reference
const REFERENCE_SELECTOR: &str = "a[href], img[src], script[src]";

/// Parses HTML content and returns every referenced URL
///
/// # Extraction Rules
///
/// - `<a href="...">`, `<img src="...">`, `<script src="...">`
/// - Relative references are resolved against `base_url`
/// - Duplicates are kept
/// - Values that cannot be resolved are skipped
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The run's base URL, used to resolve relative references
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Absolute URLs in document order (possibly empty)
/// * `Err(ExtractError)` - `base_url` cannot be used to resolve references
///
/// # Example
///
/// ```
/// use site_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a><img src="logo.png"></body></html>"#;
/// let base_url = Url::parse("https://example.com").unwrap();
/// let links = extract_links(html, &base_url).unwrap();
/// assert_eq!(links, vec!["https://example.com/page", "https://example.com/logo.png"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Result<Vec<String>, ExtractError> {
    if base_url.cannot_be_a_base() {
        return Err(ExtractError::Parse(format!(
            "'{}' cannot be used to resolve relative links",
            base_url
        )));
    }

    if html.trim().is_empty() {
        return Ok(Vec::new());
    }

    let selector = Selector::parse(REFERENCE_SELECTOR)
        .map_err(|e| ExtractError::Parse(format!("invalid selector: {}", e)))?;

    let document = Html::parse_document(html);

    let links = document
        .select(&selector)
        .filter_map(|element| {
            let element = element.value();
            let attribute = match element.name() {
                "a" => "href",
                _ => "src",
            };
            element.attr(attribute)
        })
        .filter_map(|reference| resolve_link(reference, base_url))
        .collect();

    Ok(links)
}

/// Resolves a reference against the base URL
///
/// Returns None if the reference cannot be resolved.
fn resolve_link(reference: &str, base_url: &Url) -> Option<String> {
    match base_url.join(reference) {
        Ok(absolute_url) => Some(absolute_url.to_string()),
        Err(e) => {
            tracing::trace!("Skipping unresolvable reference {:?}: {}", reference, e);
            None
        }
    }
}
