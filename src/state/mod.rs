//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedRegistry`: identity → visit count, the only state shared by every unit of work
//! - `UnitState`: the stages a single unit of work moves through
//! - `UnitProgress`: tracks and checks one unit's current stage
//! - `Completion`: why a unit of work finished without an error

mod registry;
mod unit_state;

// Re-export main types
pub use registry::{Registration, VisitedRegistry};
pub use unit_state::{Completion, UnitProgress, UnitState};
