//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns every piece of state shared between units of work:
//! the visited registry, the concurrency budget, the outstanding-work tracker
//! and the statistics counters. A unit of work is one page moving through
//! `Registering → Fetching → Extracting → Dispatching → Done`. Child links are
//! either spawned as new tasks, when a budget permit is free, or run in-line
//! through the very same path when it is not. In-line units share their
//! parent task, its permit and its work ticket.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::{ConcurrencyBudget, UnitSlot, WorkTracker};
use crate::output::{CrawlCounters, CrawlEvent, CrawlStatistics};
use crate::state::{Completion, Registration, UnitProgress, UnitState, VisitedRegistry};
use crate::url::{authority, is_same_authority, normalize_url};
use crate::{CrawlError, Result, UrlError};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Final, read-only result of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// The seed URL the run started from
    pub base_url: Url,

    /// Page identity → number of internal references
    pub pages: HashMap<String, usize>,

    /// Counters collected while crawling
    pub stats: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher = HttpFetcher> {
    shared: Arc<Shared<F>>,
}

/// State reachable from every unit of work
struct Shared<F> {
    base_url: Url,
    base_authority: String,
    registry: VisitedRegistry,
    budget: ConcurrencyBudget,
    work: WorkTracker,
    fetcher: F,
    counters: CrawlCounters,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches pages over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - A validated crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config.http)?;
        Ok(Self::with_fetcher(
            config.crawl.base_url.clone(),
            config.crawl.max_pages,
            config.crawl.max_concurrency,
            fetcher,
        ))
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around any page source
    ///
    /// A `max_concurrency` of zero is treated as one.
    pub fn with_fetcher(base_url: Url, max_pages: usize, max_concurrency: usize, fetcher: F) -> Self {
        let base_authority = authority(&base_url);
        Self {
            shared: Arc::new(Shared {
                base_url,
                base_authority,
                registry: VisitedRegistry::new(max_pages),
                budget: ConcurrencyBudget::new(max_concurrency.max(1)),
                work: WorkTracker::new(),
                fetcher,
                counters: CrawlCounters::new(),
            }),
        }
    }

    /// Runs the crawl to completion
    ///
    /// Schedules the seed as the first unit of work, then waits until the
    /// outstanding-work count drops to zero. Failures of individual pages are
    /// logged and counted but never abort the run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_crawler::config::{build_config, HttpConfig};
    /// use site_crawler::crawler::Coordinator;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = build_config("https://example.com", 20, 4, HttpConfig::default())?;
    /// let outcome = Coordinator::new(&config)?.run().await?;
    /// println!("{} pages", outcome.pages.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self) -> Result<CrawlOutcome> {
        let shared = &self.shared;
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of: {} with max pages {} and max concurrency {}",
            shared.base_url,
            shared.registry.max_pages(),
            shared.budget.capacity()
        );

        let permit = shared.budget.acquire().await?;
        let slot = UnitSlot::new(permit, shared.work.begin());
        spawn_unit(Arc::clone(shared), shared.base_url.to_string(), slot);

        shared.work.wait_idle().await;

        let outcome = CrawlOutcome {
            base_url: shared.base_url.clone(),
            pages: shared.registry.snapshot(),
            stats: shared.counters.snapshot(),
        };

        tracing::info!(
            "Crawl completed: {} pages registered, {} fetched, {} failures in {:?}",
            outcome.pages.len(),
            outcome.stats.pages_fetched,
            outcome.stats.failures(),
            start_time.elapsed()
        );

        Ok(outcome)
    }

    /// Budget units currently free
    pub fn budget_available(&self) -> usize {
        self.shared.budget.available()
    }

    /// Units of work scheduled but not yet finished
    pub fn outstanding_work(&self) -> usize {
        self.shared.work.outstanding()
    }

    /// The page source this coordinator fetches from
    pub fn fetcher(&self) -> &F {
        &self.shared.fetcher
    }
}

/// Starts a unit of work on its own task
///
/// The slot is finished once the unit is done, whichever way it ends.
fn spawn_unit<F: Fetcher>(shared: Arc<Shared<F>>, url: String, slot: UnitSlot) {
    tokio::spawn(async move {
        shared.run_unit(url).await;
        slot.finish();
    });
}

impl<F: Fetcher> Shared<F> {
    /// Error boundary around one spawned unit and every unit it runs in-line
    ///
    /// In-line units wait on an explicit stack instead of nesting futures, so
    /// a long chain of pages never deepens the task's call stack. Each page's
    /// links are popped in document order, which keeps a single-permit crawl
    /// depth-first. Errors and panics are reported per unit and go no further.
    async fn run_unit(self: Arc<Self>, url: String) {
        let mut pending = vec![url];

        while let Some(url) = pending.pop() {
            let mut progress = UnitProgress::new();
            let mut in_line = Vec::new();

            let result = AssertUnwindSafe(self.process(&url, &mut progress, &mut in_line))
                .catch_unwind()
                .await;
            progress.advance(&url, UnitState::Done);

            match result {
                Ok(Ok(completion)) => {
                    tracing::debug!(url = %url, "{}", completion);
                }
                Ok(Err(e)) => {
                    tracing::warn!("Error crawling {}: {}", url, e);
                }
                Err(panic) => {
                    self.counters.record(CrawlEvent::Panicked);
                    tracing::error!(
                        "Recovered from panic while crawling {}: {}",
                        url,
                        panic_message(&*panic)
                    );
                }
            }

            pending.extend(in_line.into_iter().rev());
        }
    }

    /// Walks one URL through the unit-of-work states
    ///
    /// Links that must run in-line are appended to `in_line` in document order.
    async fn process(
        self: &Arc<Self>,
        url: &str,
        progress: &mut UnitProgress,
        in_line: &mut Vec<String>,
    ) -> Result<Completion> {
        progress.advance(url, UnitState::Registering);

        let parsed = Url::parse(url).map_err(|e| {
            self.fail(
                CrawlEvent::NormalizeFailed,
                UrlError::Malformed {
                    url: url.to_string(),
                    reason: e.to_string(),
                },
            )
        })?;

        if !is_same_authority(&parsed, &self.base_authority) {
            self.counters.record(CrawlEvent::ExternalSkipped);
            return Ok(Completion::ExternalHost);
        }

        let identity =
            normalize_url(url).map_err(|e| self.fail(CrawlEvent::NormalizeFailed, e))?;

        match self.registry.register_or_increment(&identity) {
            Registration::First => {
                tracing::info!("New page found: {}", identity);
            }
            Registration::Repeat { count } => {
                self.counters.record(CrawlEvent::Revisit);
                return Ok(Completion::Revisited { count });
            }
            Registration::LimitReached => {
                self.counters.record(CrawlEvent::LimitRefused);
                return Ok(Completion::LimitReached);
            }
        }

        progress.advance(url, UnitState::Fetching);
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| self.fail(CrawlEvent::FetchFailed, e))?;
        self.counters.record(CrawlEvent::PageFetched);

        progress.advance(url, UnitState::Extracting);
        let links = extract_links(&body, &self.base_url)
            .map_err(|e| self.fail(CrawlEvent::ExtractFailed, e))?;

        progress.advance(url, UnitState::Dispatching);
        self.dispatch(url, &links, in_line);

        Ok(Completion::Crawled { links: links.len() })
    }

    /// Hands each in-host link to a new task or queues it to run in-line
    ///
    /// Once the page limit is reached no further tasks are spawned from this
    /// page. Its remaining links still run in-line: known pages keep counting
    /// and new ones are refused without a fetch.
    fn dispatch(self: &Arc<Self>, parent: &str, links: &[String], in_line: &mut Vec<String>) {
        let mut limit_reached = false;

        for link in links {
            let in_host = match Url::parse(link) {
                Ok(url) => is_same_authority(&url, &self.base_authority),
                Err(_) => false,
            };

            if !in_host {
                tracing::trace!("Skipping invalid or external link: {}", link);
                self.counters.record(CrawlEvent::ExternalSkipped);
                continue;
            }

            if !limit_reached {
                if let Some(permit) = self.budget.try_acquire() {
                    if self.registry.is_full() {
                        drop(permit);
                        limit_reached = true;
                        tracing::debug!(
                            "Reached the maximum number of pages, no more tasks from {}",
                            parent
                        );
                    } else {
                        let slot = UnitSlot::new(permit, self.work.begin());
                        self.counters.record(CrawlEvent::Spawned);
                        spawn_unit(Arc::clone(self), link.clone(), slot);
                        continue;
                    }
                }
            }

            self.counters.record(CrawlEvent::Inlined);
            tracing::trace!("Processing {} in-line", link);
            in_line.push(link.clone());
        }
    }

    fn fail(&self, event: CrawlEvent, error: impl Into<CrawlError>) -> CrawlError {
        self.counters.record(event);
        error.into()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
