use tracing::{debug, trace};

use crate::domain::solution::{residual_demand, residual_supply};
use crate::domain::types::{Allocation, ProblemInstance};

/// Best-effort balancing: pushes leftover supply into unmet demand.
///
/// Row by row, routes already in use are topped up first (they carry no new
/// fixed charge), then the remaining destinations of the row are swept.
/// Only non-negative residuals are ever shipped, so an oversupplied source
/// or overserved destination is left as it is.
pub fn balance(allocation: &mut Allocation, pi: &ProblemInstance) {
    let mut supply = residual_supply(allocation, pi);
    let mut demand = residual_demand(allocation, pi);
    trace!("Residuals before balancing: {:?} / {:?}", supply, demand);

    for i in 0..pi.num_factories {
        for j in 0..pi.num_stores {
            if allocation.get(i, j) != 0 {
                ship(allocation, &mut supply, &mut demand, i, j);
            }
        }
        for j in 0..pi.num_stores {
            ship(allocation, &mut supply, &mut demand, i, j);
        }
    }
}

fn ship(allocation: &mut Allocation, supply: &mut [i64], demand: &mut [i64], i: usize, j: usize) {
    let amount = supply[i].min(demand[j]);
    if amount > 0 {
        allocation.add(i, j, amount as u64);
        supply[i] -= amount;
        demand[j] -= amount;
    }
}

/// Balances every member of a population
pub fn balance_population(population: Vec<Allocation>, pi: &ProblemInstance) -> Vec<Allocation> {
    debug!("Balancing {} candidates", population.len());
    population
        .into_iter()
        .map(|mut allocation| {
            balance(&mut allocation, pi);
            allocation
        })
        .collect()
}
