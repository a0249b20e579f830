//! Genetic-algorithm solver for the fixed-charge transportation problem.

pub mod config;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod setup;
pub mod solver;
pub mod utils;

pub use config::GaConfig;
pub use domain::solution::SolveResult;
pub use domain::types::{Allocation, ProblemInstance};
pub use error::FctpError;
