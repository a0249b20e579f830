use std::path::Path;

use tracing::{info, warn};

use crate::domain::types::ProblemInstance;
use crate::error::FctpError;
use crate::setup::reader::read_instance;

/// Load an instance file and check that the search can run on it.
pub fn setup<P: AsRef<Path>>(path: P) -> Result<ProblemInstance, FctpError> {
    let path = path.as_ref();
    let problem_instance = read_instance(path)?;
    problem_instance.validate()?;

    info!(
        "Loaded {} with {} sources, {} destinations",
        path.display(),
        problem_instance.num_factories,
        problem_instance.num_stores
    );
    log_totals(&problem_instance);

    Ok(problem_instance)
}

pub fn log_totals(problem_instance: &ProblemInstance) {
    let supply = problem_instance.total_production();
    let demand = problem_instance.total_demand();
    info!("Total supply: {}, total demand: {}", supply, demand);

    if supply < demand {
        warn!(
            "Total supply ({}) is less than total demand ({}). No feasible allocation exists.",
            supply, demand
        );
    }
}
