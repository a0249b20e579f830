use itertools::Itertools;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::domain::types::{Allocation, Candidate, ProblemInstance};
use crate::evaluation::fitness::find_fitness;

/// Row-major walk that, with probability 1/2, ships everything the cell can
/// take from the remaining supply and demand.
///
/// Cells earlier in the walk get first pick of supply and demand.
pub fn greedy_random_fill<R: Rng + ?Sized>(pi: &ProblemInstance, rng: &mut R) -> Allocation {
    fill(pi, |available| {
        if rng.gen_bool(0.5) {
            available
        } else {
            0
        }
    })
}

/// Row-major walk that ships a uniform draw from `[0, available]` on every cell.
pub fn bounded_random_fill<R: Rng + ?Sized>(pi: &ProblemInstance, rng: &mut R) -> Allocation {
    fill(pi, |available| rng.gen_range(0..=available))
}

fn fill<F: FnMut(u64) -> u64>(pi: &ProblemInstance, mut pick: F) -> Allocation {
    let mut supply = pi.production.clone();
    let mut demand = pi.demand.clone();
    let mut allocation = Allocation::zeros(pi.num_factories, pi.num_stores);

    for i in 0..pi.num_factories {
        for j in 0..pi.num_stores {
            let amount = pick(supply[i].min(demand[j]));
            allocation.set(i, j, amount);
            supply[i] -= amount;
            demand[j] -= amount;
        }
    }

    allocation
}

/// Builds the generation-0 pool.
///
/// Draws `start_size` greedy-random fills. If fewer than `population_size`
/// of them are distinct, `population_size` bounded-random fills are added.
pub fn initialize_population<R: Rng + ?Sized>(
    pi: &ProblemInstance,
    start_size: usize,
    population_size: usize,
    rng: &mut R,
) -> Vec<Allocation> {
    let mut population: Vec<Allocation> = (0..start_size)
        .map(|_| greedy_random_fill(pi, rng))
        .collect();

    let unique = population.iter().unique().count();
    if unique < population_size {
        debug!(
            "Only {} distinct greedy fills, adding {} bounded fills",
            unique, population_size
        );
        population.extend((0..population_size).map(|_| bounded_random_fill(pi, rng)));
    }

    population
}

/// Dedups, ranks and truncates a pool of allocations.
///
/// Fitness is evaluated in parallel. Candidates are ordered by fitness, ties
/// broken by the lexicographic order of their matrices, and at most
/// `population_size` are kept.
pub fn selection(
    mut population: Vec<Allocation>,
    pi: &ProblemInstance,
    population_size: usize,
) -> Vec<Candidate> {
    population.sort_unstable();
    population.dedup();

    let mut ranked: Vec<Candidate> = population
        .into_par_iter()
        .map(|allocation| Candidate {
            fitness: find_fitness(&allocation, pi),
            allocation,
        })
        .collect();

    // Stable: equal fitness keeps the lexicographic order from above.
    ranked.sort_by_key(|c| c.fitness);
    ranked.truncate(population_size);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![20, 30, 25],
            vec![10, 15, 20, 30],
            vec![vec![4, 6, 9, 5], vec![7, 3, 4, 8], vec![6, 8, 5, 2]],
            vec![
                vec![40, 35, 60, 50],
                vec![55, 30, 45, 65],
                vec![50, 70, 40, 30],
            ],
        )
        .unwrap()
    }

    fn within_bounds(a: &Allocation, pi: &ProblemInstance) -> bool {
        (0..pi.num_factories).all(|i| a.row_sum(i) <= pi.production[i])
            && (0..pi.num_stores).all(|j| a.col_sum(j) <= pi.demand[j])
    }

    #[test]
    fn fills_never_exceed_supply_or_demand() {
        let pi = instance();
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        for _ in 0..50 {
            assert!(within_bounds(&greedy_random_fill(&pi, &mut rng), &pi));
            assert!(within_bounds(&bounded_random_fill(&pi, &mut rng), &pi));
        }
    }

    #[test]
    fn greedy_fill_cells_are_all_or_nothing() {
        let pi = instance();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let a = greedy_random_fill(&pi, &mut rng);
        // First visited cell either takes min(20, 10) or nothing
        assert!(a.get(0, 0) == 0 || a.get(0, 0) == 10);
    }

    #[test]
    fn initial_pool_has_start_size_members() {
        let pi = instance();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = initialize_population(&pi, 64, 8, &mut rng);
        assert!(pool.len() >= 64);
        assert!(pool.iter().all(|a| a.num_rows() == 3 && a.num_cols() == 4));
    }

    #[test]
    fn tiny_instance_gets_topped_up() {
        // A 1x1 instance has only two greedy outcomes
        let pi = ProblemInstance::new(vec![5], vec![5], vec![vec![1]], vec![vec![1]]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let pool = initialize_population(&pi, 4, 8, &mut rng);
        assert_eq!(pool.len(), 12);
    }

    #[test]
    fn selection_dedups_ranks_and_truncates() {
        let pi = instance();
        let good = Allocation::from_rows(vec![
            vec![10, 10, 0, 0],
            vec![0, 5, 20, 5],
            vec![0, 0, 0, 25],
        ]);
        let empty = Allocation::zeros(3, 4);
        let pool = vec![empty.clone(), good.clone(), empty.clone(), good.clone()];

        let ranked = selection(pool, &pi, 8);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].allocation, good);
        assert!(ranked[0].fitness < ranked[1].fitness);

        let top = selection(vec![empty, good.clone()], &pi, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].allocation, good);
    }

    #[test]
    fn ties_break_lexicographically() {
        // Identical costs everywhere: mirror-image allocations tie on fitness
        let pi = ProblemInstance::new(
            vec![10, 10],
            vec![10, 10],
            vec![vec![1, 1], vec![1, 1]],
            vec![vec![5, 5], vec![5, 5]],
        )
        .unwrap();
        let a = Allocation::from_rows(vec![vec![10, 0], vec![0, 10]]);
        let b = Allocation::from_rows(vec![vec![0, 10], vec![10, 0]]);

        let ranked = selection(vec![a.clone(), b.clone()], &pi, 2);
        assert_eq!(ranked[0].fitness, ranked[1].fitness);
        assert_eq!(ranked[0].allocation, b);
        assert_eq!(ranked[1].allocation, a);
    }
}
