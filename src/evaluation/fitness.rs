use crate::domain::types::{Allocation, ProblemInstance};
use crate::evaluation::penalty::{
    apply_imbalance_surcharge, oversupply_penalty, undershipment_penalty,
};

/// Penalised score used to rank allocations; lower is better.
///
/// Equals [`transport_cost`] for a feasible allocation.
pub fn find_fitness(allocation: &Allocation, pi: &ProblemInstance) -> u64 {
    let score = transport_cost(allocation, pi)
        .saturating_add(oversupply_penalty(allocation, pi))
        .saturating_add(undershipment_penalty(allocation, pi));

    apply_imbalance_surcharge(score, allocation.total(), pi.total_demand())
}

/// Variable cost of every shipped unit plus the fixed charge of every used route.
/// Saturates at `u64::MAX`.
pub fn transport_cost(allocation: &Allocation, pi: &ProblemInstance) -> u64 {
    let mut total: u64 = 0;
    for (i, row) in allocation.rows().iter().enumerate() {
        for (j, &units) in row.iter().enumerate() {
            if units != 0 {
                let route = units
                    .saturating_mul(pi.costs[i][j])
                    .saturating_add(pi.fixed_costs[i][j]);
                total = total.saturating_add(route);
            }
        }
    }
    total
}
