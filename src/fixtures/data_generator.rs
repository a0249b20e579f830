use std::fs;
use std::path::Path;

use rand::Rng;
use tracing::info;

use crate::domain::types::ProblemInstance;
use crate::error::FctpError;

const DEMAND_RANGE: (u64, u64) = (40, 150);
const COST_RANGE: (u64, u64) = (2, 10);
const FIXED_COST_RANGE: (u64, u64) = (30, 70);

/// Generates per-store demands in [40, 150]
fn generate_demand<R: Rng + ?Sized>(num_stores: usize, rng: &mut R) -> Vec<u64> {
    (0..num_stores)
        .map(|_| rng.gen_range(DEMAND_RANGE.0..=DEMAND_RANGE.1))
        .collect()
}

/// Generates production so that total supply is at least 125% of total demand.
///
/// Each factory draws from `[0.6 * share, 1.5 * share]` where `share` is 125%
/// of an even split of demand. If the draws fall short of the target, every
/// factory is topped up by the same amount.
fn generate_production<R: Rng + ?Sized>(
    num_factories: usize,
    total_demand: u64,
    rng: &mut R,
) -> Vec<u64> {
    let m = num_factories as u64;
    let share = (total_demand / m * 5).div_ceil(4);
    let min_share = (share * 3).div_ceil(5);
    let max_share = (share * 3).div_ceil(2);

    let mut production: Vec<u64> = (0..num_factories)
        .map(|_| rng.gen_range(min_share..=max_share))
        .collect();

    let target = (total_demand * 5).div_ceil(4);
    let total: u64 = production.iter().sum();
    if total < target {
        let top_up = (target - total) / m + m;
        for p in production.iter_mut() {
            *p += top_up;
        }
    }

    production
}

fn generate_matrix<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    range: (u64, u64),
    rng: &mut R,
) -> Vec<Vec<u64>> {
    (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(range.0..=range.1)).collect())
        .collect()
}

/// Generate a random instance with comfortably more supply than demand
pub fn generate_instance<R: Rng + ?Sized>(
    num_factories: usize,
    num_stores: usize,
    rng: &mut R,
) -> Result<ProblemInstance, FctpError> {
    if num_factories == 0 || num_stores == 0 {
        return Err(FctpError::InvalidInstance(format!(
            "cannot generate a {}x{} instance",
            num_factories, num_stores
        )));
    }

    let demand = generate_demand(num_stores, rng);
    let total_demand: u64 = demand.iter().sum();
    let production = generate_production(num_factories, total_demand, rng);
    let costs = generate_matrix(num_factories, num_stores, COST_RANGE, rng);
    let fixed_costs = generate_matrix(num_factories, num_stores, FIXED_COST_RANGE, rng);

    let instance = ProblemInstance::new(production, demand, costs, fixed_costs)?;
    info!(
        "Generated {}x{} instance, total supply {}, total demand {}",
        num_factories,
        num_stores,
        instance.total_production(),
        instance.total_demand()
    );

    Ok(instance)
}

/// Write an instance in the input file format
pub fn write_instance<P: AsRef<Path>>(instance: &ProblemInstance, path: P) -> Result<(), FctpError> {
    fs::write(path.as_ref(), instance.to_string())?;
    info!("Wrote instance to {}", path.as_ref().display());
    Ok(())
}
