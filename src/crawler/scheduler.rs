//! Concurrency budget and outstanding-work tracking
//!
//! This module handles:
//! - The global concurrency budget (a semaphore with non-blocking acquisition)
//! - Counting scheduled-but-unfinished units of work
//! - Signalling the waiter once that count drops back to zero
//!
//! Both resources are handed out as RAII guards so that every exit path of a
//! unit of work, panics included, gives them back.

use crate::{CrawlError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

/// Fixed-capacity budget bounding how many units of work run at once
#[derive(Debug)]
pub struct ConcurrencyBudget {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One unit of the concurrency budget; released when dropped
#[derive(Debug)]
pub struct BudgetPermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyBudget {
    /// Creates a budget with `capacity` units
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Takes one unit if any is free, without waiting
    pub fn try_acquire(&self) -> Option<BudgetPermit> {
        self.semaphore
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| BudgetPermit { _permit: permit })
    }

    /// Waits for one unit to become free
    ///
    /// Only the seed of a run waits; every later acquisition uses
    /// [`ConcurrencyBudget::try_acquire`].
    pub async fn acquire(&self) -> Result<BudgetPermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| CrawlError::BudgetClosed)?;
        Ok(BudgetPermit { _permit: permit })
    }

    /// Units currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Total number of units
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Default)]
struct TrackerInner {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Counts units of work that have been scheduled but not finished
#[derive(Debug, Default)]
pub struct WorkTracker {
    inner: Arc<TrackerInner>,
}

/// Proof that one unit of work is outstanding; finishing it means dropping this
#[derive(Debug)]
pub struct WorkTicket {
    inner: Arc<TrackerInner>,
}

impl WorkTracker {
    /// Creates a tracker with nothing outstanding
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more outstanding unit of work
    ///
    /// Must be called by the scheduling side before the unit starts.
    pub fn begin(&self) -> WorkTicket {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkTicket {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of tickets not yet dropped
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Resolves once every ticket handed out so far has been dropped
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for WorkTicket {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_one();
        }
    }
}

/// Everything a spawned unit of work holds for its lifetime
///
/// Fields drop in declaration order: the budget permit goes back first, then
/// the outstanding-work ticket, so a woken waiter always sees the full budget.
#[derive(Debug)]
pub struct UnitSlot {
    permit: BudgetPermit,
    ticket: WorkTicket,
}

impl UnitSlot {
    /// Pairs a permit already acquired with a freshly taken ticket
    pub fn new(permit: BudgetPermit, ticket: WorkTicket) -> Self {
        Self { permit, ticket }
    }

    /// Gives back the permit and then the ticket
    pub fn finish(self) {
        let Self { permit, ticket } = self;
        drop(permit);
        drop(ticket);
    }
}
