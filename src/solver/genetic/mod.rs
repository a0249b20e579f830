//! Genetic search over full shipment matrices.
//!
//! - [`population`]: initial fills, dedup, ranking and truncation
//! - [`operators`]: row crossover and repairing mutation
//! - [`repair`]: post-hoc balancing of unbalanced candidates
//! - [`search`]: the generational loop

pub mod operators;
pub mod population;
pub mod repair;
pub mod search;

pub use search::{run, solve, SearchState};
