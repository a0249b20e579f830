use rand::Rng;

use crate::config::MutationKind;
use crate::domain::solution::signed;
use crate::domain::types::{Allocation, ProblemInstance};

/// One-point row crossover.
///
/// Picks `k` in `[1, rows - 1]` and returns `(A[..k] ++ B[k..], B[..k] ++ A[k..])`.
/// With fewer than two rows there is no cut point and both parents are returned unchanged.
pub fn crossover<R: Rng + ?Sized>(
    parent1: &Allocation,
    parent2: &Allocation,
    rng: &mut R,
) -> (Allocation, Allocation) {
    let rows = parent1.num_rows();
    if rows < 2 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..rows);
    let (a, b) = (parent1.rows(), parent2.rows());

    let child1 = a[..point].iter().chain(&b[point..]).cloned().collect();
    let child2 = b[..point].iter().chain(&a[point..]).cloned().collect();

    (Allocation::from_rows(child1), Allocation::from_rows(child2))
}

/// Largest value cell `(i, j)` can take without pushing its row over production
/// or its column over demand, given the rest of the matrix.
pub fn allowed_amount(allocation: &Allocation, pi: &ProblemInstance, i: usize, j: usize) -> u64 {
    let cell = signed(allocation.get(i, j));
    let unmet_supply = signed(pi.production[i])
        .saturating_sub(signed(allocation.row_sum(i)))
        .saturating_add(cell);
    let unmet_demand = signed(pi.demand[j])
        .saturating_sub(signed(allocation.col_sum(j)))
        .saturating_add(cell);
    unmet_supply.min(unmet_demand).max(0) as u64
}

/// Repairing mutation: each cell is re-drawn with probability `rate` from the
/// range left free by the rest of its row and column.
pub fn mutate<R: Rng + ?Sized>(
    allocation: &mut Allocation,
    pi: &ProblemInstance,
    rate: f64,
    kind: MutationKind,
    rng: &mut R,
) {
    for i in 0..allocation.num_rows() {
        for j in 0..allocation.num_cols() {
            if rng.gen::<f64>() >= rate {
                continue;
            }

            let allowed = allowed_amount(allocation, pi, i, j);
            let value = match kind {
                MutationKind::ZeroOrFill => {
                    if rng.gen_bool(0.5) {
                        0
                    } else {
                        allowed
                    }
                }
                MutationKind::Uniform => rng.gen_range(0..=allowed),
            };
            allocation.set(i, j, value);
        }
    }
}
