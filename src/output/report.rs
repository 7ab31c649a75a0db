//! Ranked text report of internal link counts

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One row of the report: a page identity and how often it was linked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCount {
    pub identity: String,
    pub count: usize,
}

/// Orders registry entries by count (descending), then identity (ascending)
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use site_crawler::output::sort_pages;
///
/// let pages = HashMap::from([
///     ("a.com/x".to_string(), 3),
///     ("a.com/y".to_string(), 1),
///     ("a.com/z".to_string(), 3),
/// ]);
/// let order: Vec<_> = sort_pages(&pages).into_iter().map(|p| p.identity).collect();
/// assert_eq!(order, ["a.com/x", "a.com/z", "a.com/y"]);
/// ```
pub fn sort_pages(pages: &HashMap<String, usize>) -> Vec<PageCount> {
    let mut sorted: Vec<PageCount> = pages
        .iter()
        .map(|(identity, count)| PageCount {
            identity: identity.clone(),
            count: *count,
        })
        .collect();

    sorted.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.identity.cmp(&b.identity))
    });

    sorted
}

/// Renders the final registry as a text report
///
/// A boxed `REPORT for <base_url>` header is followed by one
/// `Found <n> internal link(s) to <identity>` line per page, in
/// [`sort_pages`] order.
pub fn format_report(pages: &HashMap<String, usize>, base_url: &str) -> String {
    let header = format!("REPORT for {}", base_url);
    let separator = "=".repeat(header.len() + 4);

    let mut report = format!("{}\n  {}\n{}\n\n", separator, header, separator);

    for page in sort_pages(pages) {
        report.push_str(&format!(
            "Found {} internal {} to {}\n",
            page.count,
            link_noun(page.count),
            page.identity
        ));
    }

    report
}

/// Writes a rendered report to `path`, replacing any existing file
pub fn write_report(report: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(report.as_bytes())?;
    file.flush()
}

fn link_noun(count: usize) -> &'static str {
    if count == 1 {
        "link"
    } else {
        "links"
    }
}
