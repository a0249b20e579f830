use serde::Serialize;

use crate::domain::types::{Allocation, ProblemInstance};

/// `value` as a signed quantity, clamped at `i64::MAX`.
pub(crate) fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Unused production per source, `production[i] - row_sum(i)`. Negative when a source is oversupplied.
pub fn residual_supply(allocation: &Allocation, pi: &ProblemInstance) -> Vec<i64> {
    pi.production
        .iter()
        .enumerate()
        .map(|(i, &p)| signed(p).saturating_sub(signed(allocation.row_sum(i))))
        .collect()
}

/// Unmet demand per destination, `demand[j] - col_sum(j)`. Negative when a destination is overserved.
pub fn residual_demand(allocation: &Allocation, pi: &ProblemInstance) -> Vec<i64> {
    pi.demand
        .iter()
        .enumerate()
        .map(|(j, &d)| signed(d).saturating_sub(signed(allocation.col_sum(j))))
        .collect()
}

/// Every source within its production and every destination served exactly.
pub fn is_feasible(allocation: &Allocation, pi: &ProblemInstance) -> bool {
    allocation.num_rows() == pi.num_factories
        && allocation.num_cols() == pi.num_stores
        && residual_supply(allocation, pi).iter().all(|&s| s >= 0)
        && residual_demand(allocation, pi).iter().all(|&d| d == 0)
}

/// Outcome of one genetic search run.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    pub allocation: Allocation,
    /// Penalised fitness of `allocation`.
    pub cost: u64,
    /// Variable plus fixed cost, without penalties.
    pub transport_cost: u64,
    pub feasible: bool,
    pub elapsed_seconds: f64,
    pub generations: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: u64,
    pub best_shipped: u64,
    pub population_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![10, 10],
            vec![5, 10],
            vec![vec![1, 1], vec![1, 1]],
            vec![vec![0, 0], vec![0, 0]],
        )
        .unwrap()
    }

    #[test]
    fn residuals_can_go_negative() {
        let pi = instance();
        let a = Allocation::from_rows(vec![vec![5, 8], vec![0, 4]]);
        assert_eq!(residual_supply(&a, &pi), vec![-3, 6]);
        assert_eq!(residual_demand(&a, &pi), vec![0, -2]);
        assert!(!is_feasible(&a, &pi));
    }

    #[test]
    fn exact_cover_is_feasible() {
        let pi = instance();
        let a = Allocation::from_rows(vec![vec![5, 5], vec![0, 5]]);
        assert!(is_feasible(&a, &pi));
    }

    #[test]
    fn residuals_clamp_huge_quantities() {
        let pi = instance();
        let a = Allocation::from_rows(vec![vec![u64::MAX, 0], vec![0, 0]]);
        assert_eq!(residual_supply(&a, &pi)[0], 10 - i64::MAX);
        assert_eq!(residual_demand(&a, &pi)[0], 5 - i64::MAX);
        assert!(!is_feasible(&a, &pi));
    }

    #[test]
    fn wrong_shape_is_infeasible() {
        let pi = instance();
        let a = Allocation::from_rows(vec![vec![5, 10]]);
        assert!(!is_feasible(&a, &pi));
    }
}
