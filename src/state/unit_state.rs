//! Unit-of-work state definitions
//!
//! A unit of work is one logical crawl of a single page. Every unit walks
//! the same path, whether it runs on its own task or in-line inside its
//! parent: `Scheduled → Registering → Fetching → Extracting → Dispatching → Done`.
//! Any stage may jump straight to `Done`.

use std::fmt;

/// The stage a unit of work is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitState {
    /// Holds its budget permit and work ticket but has not started
    Scheduled,

    /// Checking the boundary and recording the visit
    Registering,

    /// Waiting on the page fetch
    Fetching,

    /// Pulling links out of the fetched document
    Extracting,

    /// Spawning or in-lining child units for each in-host link
    Dispatching,

    /// Finished; permit and ticket have been given back
    Done,
}

impl UnitState {
    /// Returns true for the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the next state on the success path
    ///
    /// `Done` is its own successor.
    pub fn successor(&self) -> Self {
        match self {
            Self::Scheduled => Self::Registering,
            Self::Registering => Self::Fetching,
            Self::Fetching => Self::Extracting,
            Self::Extracting => Self::Dispatching,
            Self::Dispatching | Self::Done => Self::Done,
        }
    }

    /// Returns true if a unit may move from `self` to `next`
    pub fn can_transition_to(&self, next: Self) -> bool {
        !self.is_terminal() && (next == Self::Done || next == self.successor())
    }

    /// Short lowercase name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Registering => "registering",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Dispatching => "dispatching",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current stage of one unit of work
///
/// Every unit starts in `Scheduled`. [`UnitProgress::advance`] checks each
/// move against [`UnitState::can_transition_to`] in debug builds and logs it.
#[derive(Debug)]
pub struct UnitProgress {
    state: UnitState,
}

impl UnitProgress {
    /// Starts tracking a freshly scheduled unit
    pub fn new() -> Self {
        Self {
            state: UnitState::Scheduled,
        }
    }

    /// The stage the unit is in now
    pub fn state(&self) -> UnitState {
        self.state
    }

    /// Moves the unit for `url` into `next`
    pub fn advance(&mut self, url: &str, next: UnitState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal unit transition {} -> {} for {}",
            self.state,
            next,
            url
        );
        tracing::trace!(url, from = %self.state, to = %next, "unit transition");
        self.state = next;
    }
}

impl Default for UnitProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// How a unit of work reached `Done` without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The URL's authority differs from the base host
    ExternalHost,

    /// The registry was full and the identity was new
    LimitReached,

    /// The identity was already registered; its count was bumped
    Revisited { count: usize },

    /// The page was fetched and its links dispatched
    Crawled { links: usize },
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExternalHost => f.write_str("external host"),
            Self::LimitReached => f.write_str("page limit reached"),
            Self::Revisited { count } => write!(f, "revisited (count {})", count),
            Self::Crawled { links } => write!(f, "crawled ({} links)", links),
        }
    }
}
