use fctp::domain::solution::is_feasible;
use fctp::evaluation::fitness::find_fitness;
use fctp::solver::genetic::population::{bounded_random_fill, greedy_random_fill, selection};
use fctp::solver::genetic::repair::balance;
use fctp::solver::genetic::solve;
use fctp::{Allocation, GaConfig, ProblemInstance};
use itertools::Itertools;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Instances whose total supply covers total demand.
fn instance_strategy() -> impl Strategy<Value = ProblemInstance> {
    (1usize..4, 1usize..5)
        .prop_flat_map(|(m, n)| {
            (
                prop::collection::vec(1u64..50, n),
                prop::collection::vec(0u64..30, m),
                prop::collection::vec(prop::collection::vec(1u64..10, n), m),
                prop::collection::vec(prop::collection::vec(10u64..60, n), m),
            )
        })
        .prop_map(|(demand, extra, costs, fixed_costs)| {
            let total: u64 = demand.iter().sum();
            let share = total.div_ceil(extra.len() as u64);
            let production = extra.iter().map(|e| share + e).collect();
            ProblemInstance::new(production, demand, costs, fixed_costs).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn solve_returns_matrix_of_instance_shape(pi in instance_strategy(), seed in any::<u64>()) {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_population_start_size(8)
            .with_max_generations(4)
            .with_seed(seed);
        let (result, history) = solve(&pi, &config).unwrap();
        prop_assert_eq!(result.allocation.num_rows(), pi.num_factories);
        prop_assert_eq!(result.allocation.num_cols(), pi.num_stores);
        prop_assert_eq!(result.generations, 4);
        prop_assert_eq!(history.len(), 5);
        prop_assert_eq!(result.feasible, is_feasible(&result.allocation, &pi));
    }
}

proptest! {
    #[test]
    fn fitness_is_idempotent(pi in instance_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let allocation = bounded_random_fill(&pi, &mut rng);
        let before = allocation.clone();
        prop_assert_eq!(find_fitness(&allocation, &pi), find_fitness(&allocation, &pi));
        prop_assert_eq!(allocation, before);
    }

    #[test]
    fn balancer_respects_production(pi in instance_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut allocation = bounded_random_fill(&pi, &mut rng);
        balance(&mut allocation, &pi);
        for i in 0..pi.num_factories {
            prop_assert!(allocation.row_sum(i) <= pi.production[i]);
        }
        for j in 0..pi.num_stores {
            prop_assert!(allocation.col_sum(j) <= pi.demand[j]);
        }
    }

    #[test]
    fn balancing_empty_allocation_is_feasible(pi in instance_strategy()) {
        let mut allocation = Allocation::zeros(pi.num_factories, pi.num_stores);
        balance(&mut allocation, &pi);
        prop_assert!(is_feasible(&allocation, &pi));
    }

    #[test]
    fn oversupply_scores_strictly_worse(pi in instance_strategy()) {
        let mut allocation = Allocation::zeros(pi.num_factories, pi.num_stores);
        balance(&mut allocation, &pi);

        let (source, row_sum) = (0..pi.num_factories)
            .map(|i| (i, allocation.row_sum(i)))
            .find(|&(_, s)| s > 0)
            .unwrap();
        let mut tight = pi.clone();
        tight.production[source] = row_sum - 1;

        let gap = find_fitness(&allocation, &tight) - find_fitness(&allocation, &pi);
        prop_assert!(gap >= pi.total_demand() * 5);
    }

    #[test]
    fn selection_keeps_no_duplicates(pi in instance_strategy(), seed in any::<u64>(), keep in 1usize..10) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pool: Vec<Allocation> = (0..12).map(|_| greedy_random_fill(&pi, &mut rng)).collect();
        pool.extend(pool.clone());

        let ranked = selection(pool, &pi, keep);
        prop_assert!(ranked.len() <= keep);
        prop_assert_eq!(ranked.iter().map(|c| &c.allocation).unique().count(), ranked.len());
        prop_assert!(ranked.windows(2).all(|w| w[0].fitness <= w[1].fitness));
    }
}
