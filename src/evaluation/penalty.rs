use crate::domain::types::{Allocation, ProblemInstance};

/// Flat charge per oversupplied source, as a multiple of total demand.
pub const OVERSUPPLY_FACTOR: u64 = 5;
/// Flat charge when less than half of total demand is shipped.
pub const UNDERSHIPMENT_FACTOR: u64 = 10;

/// `5 * sum(demand)` for every source whose row sum exceeds its production.
/// The size of the overage does not matter.
pub fn oversupply_penalty(allocation: &Allocation, pi: &ProblemInstance) -> u64 {
    let violations = pi
        .production
        .iter()
        .enumerate()
        .filter(|&(i, &p)| allocation.row_sum(i) > p)
        .count() as u64;

    violations
        .saturating_mul(pi.total_demand())
        .saturating_mul(OVERSUPPLY_FACTOR)
}

/// `10 * sum(demand)` when total shipped is below half of total demand.
pub fn undershipment_penalty(allocation: &Allocation, pi: &ProblemInstance) -> u64 {
    let total_demand = pi.total_demand();
    if allocation.total().saturating_mul(2) < total_demand {
        total_demand.saturating_mul(UNDERSHIPMENT_FACTOR)
    } else {
        0
    }
}

/// Applies the imbalance surcharge to a score when total shipped differs from total demand.
///
/// The score is first inflated by 10% (rounded up), then grows by
/// `ceil(score * (1 + (50 * gap)^2 / 100))` where `gap = |D - T| / D`.
/// Everything is computed in integers so equal inputs always rank equally,
/// unless the exact product no longer fits in `u128`; those scores are far
/// beyond any competitive candidate and fall back to `f64`. Saturates at `u64::MAX`.
pub fn apply_imbalance_surcharge(score: u64, shipped: u64, total_demand: u64) -> u64 {
    if shipped == total_demand || total_demand == 0 {
        return score;
    }

    let inflated = (score as u128 * 11).div_ceil(10);
    let diff = shipped.abs_diff(total_demand) as u128;
    let d = total_demand as u128;
    // (50 * diff / D)^2 / 100 == 25 * diff^2 / D^2
    let growth = inflated
        .checked_mul(25)
        .and_then(|x| x.checked_mul(diff))
        .and_then(|x| x.checked_mul(diff))
        .map(|numerator| numerator.div_ceil(d * d))
        .unwrap_or_else(|| {
            let gap = diff as f64 / d as f64;
            (inflated as f64 * 25.0 * gap * gap).ceil() as u128
        });

    // inflated + ceil(inflated * (D^2 + 25 * diff^2) / D^2)
    let total = inflated.saturating_mul(2).saturating_add(growth);
    u64::try_from(total).unwrap_or(u64::MAX)
}
