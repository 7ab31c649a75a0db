//! Crawl statistics
//!
//! Workers record events into a shared [`CrawlCounters`] without locking;
//! the coordinator takes a [`CrawlStatistics`] snapshot when the run ends.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Something worth counting that happened to a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlEvent {
    /// A page body was fetched successfully
    PageFetched,
    /// An already registered page was seen again
    Revisit,
    /// A link pointed outside the base host
    ExternalSkipped,
    /// A new page was refused because the page limit was reached
    LimitRefused,
    /// A child unit was spawned on its own task
    Spawned,
    /// A child unit ran in-line inside its parent's task
    Inlined,
    /// The fetch failed
    FetchFailed,
    /// Link extraction failed
    ExtractFailed,
    /// The URL could not be normalized
    NormalizeFailed,
    /// A unit of work panicked and was contained
    Panicked,
}

/// Lock-free counters shared by every unit of work
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_fetched: AtomicUsize,
    revisits: AtomicUsize,
    external_skipped: AtomicUsize,
    limit_refused: AtomicUsize,
    spawned: AtomicUsize,
    inlined: AtomicUsize,
    fetch_failures: AtomicUsize,
    extract_failures: AtomicUsize,
    normalize_failures: AtomicUsize,
    panics: AtomicUsize,
}

impl CrawlCounters {
    /// Creates a zeroed set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `event`
    pub fn record(&self, event: CrawlEvent) {
        self.counter(event).fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of every counter
    pub fn snapshot(&self) -> CrawlStatistics {
        let get = |event| self.counter(event).load(Ordering::Relaxed);
        CrawlStatistics {
            pages_fetched: get(CrawlEvent::PageFetched),
            revisits: get(CrawlEvent::Revisit),
            external_skipped: get(CrawlEvent::ExternalSkipped),
            limit_refused: get(CrawlEvent::LimitRefused),
            spawned: get(CrawlEvent::Spawned),
            inlined: get(CrawlEvent::Inlined),
            fetch_failures: get(CrawlEvent::FetchFailed),
            extract_failures: get(CrawlEvent::ExtractFailed),
            normalize_failures: get(CrawlEvent::NormalizeFailed),
            panics: get(CrawlEvent::Panicked),
        }
    }

    fn counter(&self, event: CrawlEvent) -> &AtomicUsize {
        match event {
            CrawlEvent::PageFetched => &self.pages_fetched,
            CrawlEvent::Revisit => &self.revisits,
            CrawlEvent::ExternalSkipped => &self.external_skipped,
            CrawlEvent::LimitRefused => &self.limit_refused,
            CrawlEvent::Spawned => &self.spawned,
            CrawlEvent::Inlined => &self.inlined,
            CrawlEvent::FetchFailed => &self.fetch_failures,
            CrawlEvent::ExtractFailed => &self.extract_failures,
            CrawlEvent::NormalizeFailed => &self.normalize_failures,
            CrawlEvent::Panicked => &self.panics,
        }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Pages whose body was fetched
    pub pages_fetched: usize,

    /// Observations of already registered pages
    pub revisits: usize,

    /// Links skipped because they left the base host
    pub external_skipped: usize,

    /// New pages refused by the page limit
    pub limit_refused: usize,

    /// Child units run on their own task
    pub spawned: usize,

    /// Child units run in-line
    pub inlined: usize,

    /// Failed fetches
    pub fetch_failures: usize,

    /// Failed link extractions
    pub extract_failures: usize,

    /// URLs that could not be normalized
    pub normalize_failures: usize,

    /// Contained panics
    pub panics: usize,
}

impl CrawlStatistics {
    /// Total number of units of work that ended in an error
    pub fn failures(&self) -> usize {
        self.fetch_failures + self.extract_failures + self.normalize_failures + self.panics
    }
}

/// Renders statistics as an indented text block
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::from("Crawl statistics:\n");
    let rows = [
        ("Pages fetched", stats.pages_fetched),
        ("Revisits", stats.revisits),
        ("External links skipped", stats.external_skipped),
        ("Refused by page limit", stats.limit_refused),
        ("Units spawned", stats.spawned),
        ("Units run in-line", stats.inlined),
        ("Fetch failures", stats.fetch_failures),
        ("Extraction failures", stats.extract_failures),
        ("Normalization failures", stats.normalize_failures),
        ("Panics contained", stats.panics),
    ];

    for (label, value) in rows {
        out.push_str(&format!("  {}: {}\n", label, value));
    }

    out
}
