use std::env;
use std::error::Error;
use std::time::Instant;

use colored::*;
use csv::Writer;
use itertools::{iproduct, Itertools};
use rand::Rng;
use tracing::{debug, info, span, trace, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{DATA_PATH, HISTORY_CSV_PATH};
use crate::config::GaConfig;
use crate::domain::solution::{is_feasible, GenerationStats, SolveResult};
use crate::domain::types::{Allocation, Candidate, ProblemInstance};
use crate::error::FctpError;
use crate::evaluation::fitness::transport_cost;
use crate::setup::init::setup;
use crate::utils::{rng_from_seed, seconds_since};

use super::operators::{crossover, mutate};
use super::population::{initialize_population, selection};
use super::repair::balance_population;

/// Mutable state of a running search.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Ranked survivors, best first.
    pub population: Vec<Candidate>,
    pub generation: usize,
    pub history: Vec<GenerationStats>,
    pub regenerated: bool,
    pub balanced: bool,
}

impl SearchState {
    fn new(population: Vec<Candidate>, regenerated: bool) -> Self {
        let mut state = Self {
            population,
            generation: 0,
            history: vec![],
            regenerated,
            balanced: false,
        };
        state.record();
        state
    }

    fn best(&self) -> Option<&Candidate> {
        self.population.first()
    }

    fn record(&mut self) {
        if let Some(best) = self.population.first() {
            let stats = GenerationStats {
                generation: self.generation,
                best_fitness: best.fitness,
                best_shipped: best.allocation.total(),
                population_len: self.population.len(),
            };
            self.history.push(stats);
        }
    }
}

/// Generation 0: draw and rank a pool, redrawing it once if its best member
/// does not ship exactly the total demand.
fn init_population<R: Rng + ?Sized>(
    pi: &ProblemInstance,
    config: &GaConfig,
    rng: &mut R,
) -> SearchState {
    let span = span!(Level::DEBUG, "init");
    let _guard = span.enter();

    let draw = |rng: &mut R| {
        let pool = initialize_population(
            pi,
            config.population_start_size,
            config.population_size,
            rng,
        );
        selection(pool, pi, config.population_size)
    };

    let population = draw(&mut *rng);
    let total_demand = pi.total_demand();
    let unbalanced = population
        .first()
        .is_some_and(|best| best.allocation.total() != total_demand);

    if unbalanced {
        info!("Best initial candidate ships the wrong total, regenerating population");
        SearchState::new(draw(rng), true)
    } else {
        SearchState::new(population, false)
    }
}

/// One generation: every ordered pair of distinct survivors produces two
/// mutated children, then the enlarged pool is ranked and truncated.
fn perform_generation<R: Rng + ?Sized>(
    state: &mut SearchState,
    pi: &ProblemInstance,
    config: &GaConfig,
    rng: &mut R,
) {
    state.generation += 1;
    let gen_span = span!(Level::DEBUG, "generation", gen = state.generation);
    let _gen_guard = gen_span.enter();

    let previous_best = state.best().map(|c| c.fitness);
    let parents: Vec<Allocation> = std::mem::take(&mut state.population)
        .into_iter()
        .map(|c| c.allocation)
        .collect();

    let n = parents.len();
    let mut pool = Vec::with_capacity(n + 2 * n * n.saturating_sub(1));
    for (i, j) in iproduct!(0..n, 0..n).filter(|(i, j)| i != j) {
        let (mut child1, mut child2) = crossover(&parents[i], &parents[j], rng);
        mutate(&mut child1, pi, config.mutation_rate, config.mutation_kind, rng);
        mutate(&mut child2, pi, config.mutation_rate, config.mutation_kind, rng);
        pool.push(child1);
        pool.push(child2);
    }
    pool.extend(parents);

    debug!("Pool size before selection: {}", pool.len());
    state.population = selection(pool, pi, config.population_size);
    state.record();

    if let (Some(best), Some(prev)) = (state.best(), previous_best) {
        if best.fitness < prev {
            info!(
                "New best at generation {}: fitness = {}",
                state.generation, best.fitness
            );
        }
    }
}

/// Balances the population if the best candidate still ships the wrong total.
fn terminate(state: &mut SearchState, pi: &ProblemInstance, config: &GaConfig) {
    let span = span!(Level::DEBUG, "terminate");
    let _guard = span.enter();

    let total_demand = pi.total_demand();
    let needs_balancing = state
        .best()
        .is_some_and(|best| best.allocation.total() != total_demand);

    if needs_balancing {
        info!("Best candidate still unbalanced, running balancer");
        let allocations = std::mem::take(&mut state.population)
            .into_iter()
            .map(|c| c.allocation)
            .collect();
        state.population = selection(
            balance_population(allocations, pi),
            pi,
            config.population_size,
        );
        state.balanced = true;
    }
}

/// Run the genetic search on a validated instance.
///
/// Returns the best allocation found together with the per-generation history.
/// An infeasible best candidate is not an error; check `SolveResult::feasible`.
pub fn solve(
    pi: &ProblemInstance,
    config: &GaConfig,
) -> Result<(SolveResult, Vec<GenerationStats>), FctpError> {
    config.validate()?;
    pi.validate()?;

    let (mut rng, seed) = rng_from_seed(config.seed);
    info!(
        "Starting genetic search: {} generations, population {}, seed {}",
        config.max_generations, config.population_size, seed
    );
    let start = Instant::now();

    let mut state = init_population(pi, config, &mut rng);

    let loop_span = span!(
        Level::INFO,
        "evolution",
        total_generations = config.max_generations
    );
    {
        let _loop_guard = loop_span.enter();
        for _ in 0..config.max_generations {
            perform_generation(&mut state, pi, config, &mut rng);
        }
    }

    terminate(&mut state, pi, config);

    let best = state
        .best()
        .cloned()
        .ok_or_else(|| FctpError::InvalidConfig("population is empty".into()))?;
    let feasible = is_feasible(&best.allocation, pi);
    let result = SolveResult {
        transport_cost: transport_cost(&best.allocation, pi),
        cost: best.fitness,
        allocation: best.allocation,
        feasible,
        elapsed_seconds: seconds_since(start),
        generations: state.generation,
        seed,
    };

    report_final_stats(&state, &result);
    Ok((result, state.history))
}

fn report_final_stats(state: &SearchState, result: &SolveResult) {
    info!(
        "Search complete after {} generations in {:.4}s",
        state.generation, result.elapsed_seconds
    );
    info!(
        "Population regenerated: {}, balancer used: {}",
        state.regenerated, state.balanced
    );
    if result.feasible {
        info!("Best cost: {}", result.cost);
    } else {
        warn!(
            "Best candidate is infeasible, penalised cost {} (transport cost {})",
            result.cost, result.transport_cost
        );
    }
    trace!("Fitness history: {:?}", state.history);
}

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE))
        .try_init()?;

    dotenv::dotenv().ok();
    Ok(())
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    let config = GaConfig::from_env()?;
    let data_path = env::var("FCTP_DATA_PATH").unwrap_or_else(|_| DATA_PATH.to_string());
    let history_path =
        env::var("FCTP_HISTORY_CSV").unwrap_or_else(|_| HISTORY_CSV_PATH.to_string());

    let problem_instance = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        setup(&data_path)?
    };

    let (result, history) = solve(&problem_instance, &config)?;

    print_solution(&result);
    save_to_csv(&history, &history_path)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn save_to_csv(history: &[GenerationStats], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record(["generation", "best_fitness", "best_shipped", "population_len"])?;

    for stats in history {
        wtr.write_record([
            stats.generation.to_string(),
            stats.best_fitness.to_string(),
            stats.best_shipped.to_string(),
            stats.population_len.to_string(),
        ])?;
    }

    wtr.flush()?;
    info!("Wrote generation history to {}", filename);
    Ok(())
}

fn print_solution(result: &SolveResult) {
    println!("Allocation matrix:");
    for row in result.allocation.rows() {
        println!("  [{}]", row.iter().map(|v| format!("{:>4}", v)).join(" "));
    }

    let summary = format!(
        "Cost: {}, Transport cost: {}, Feasible: {}",
        result.cost, result.transport_cost, result.feasible
    );
    if result.feasible {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
    println!("Elapsed: {:.4} seconds", result.elapsed_seconds);
}
