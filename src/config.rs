use std::env;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::FctpError;

pub mod constant {
    pub(crate) const POPULATION_SIZE: usize = 8;
    pub(crate) const POPULATION_START_SIZE: usize = 64;
    pub(crate) const MUTATION_RATE: f64 = 0.1;
    pub(crate) const MAX_GENERATIONS: usize = 50;
    pub(crate) const DATA_PATH: &str = "data/data_20.txt";
    pub(crate) const HISTORY_CSV_PATH: &str = "generation_history.csv";
}

/// How a mutated cell picks its new value inside the allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum MutationKind {
    /// Either zero or the full allowed amount, with equal probability.
    #[default]
    ZeroOrFill,
    /// Any integer in `[0, allowed]`.
    Uniform,
}

impl FromStr for MutationKind {
    type Err = FctpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero-or-fill" | "zero_or_fill" => Ok(MutationKind::ZeroOrFill),
            "uniform" => Ok(MutationKind::Uniform),
            other => Err(FctpError::InvalidConfig(format!(
                "unknown mutation kind '{}'",
                other
            ))),
        }
    }
}

/// Parameters of the genetic search.
#[derive(Debug, Clone, Serialize)]
pub struct GaConfig {
    /// Survivors kept after every selection.
    pub population_size: usize,
    /// Candidates drawn by the greedy-random fill at generation 0.
    pub population_start_size: usize,
    pub mutation_rate: f64,
    pub max_generations: usize,
    pub mutation_kind: MutationKind,
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: constant::POPULATION_SIZE,
            population_start_size: constant::POPULATION_START_SIZE,
            mutation_rate: constant::MUTATION_RATE,
            max_generations: constant::MAX_GENERATIONS,
            mutation_kind: MutationKind::default(),
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_population_start_size(mut self, size: usize) -> Self {
        self.population_start_size = size;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_mutation_kind(mut self, kind: MutationKind) -> Self {
        self.mutation_kind = kind;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), FctpError> {
        if self.population_size == 0 {
            return Err(FctpError::InvalidConfig(
                "population size must be at least 1".into(),
            ));
        }
        if self.population_start_size == 0 {
            return Err(FctpError::InvalidConfig(
                "population start size must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(FctpError::InvalidConfig(format!(
                "mutation rate {} is outside [0, 1]",
                self.mutation_rate
            )));
        }
        Ok(())
    }

    /// Defaults overridden by `FCTP_*` variables from the process environment.
    /// The binary loads `.env` into it before calling this.
    pub fn from_env() -> Result<Self, FctpError> {
        let mut config = GaConfig::default();

        if let Some(v) = env_override::<usize>("FCTP_POPULATION_SIZE")? {
            config.population_size = v;
        }
        if let Some(v) = env_override::<usize>("FCTP_POPULATION_START_SIZE")? {
            config.population_start_size = v;
        }
        if let Some(v) = env_override::<f64>("FCTP_MUTATION_RATE")? {
            config.mutation_rate = v;
        }
        if let Some(v) = env_override::<usize>("FCTP_MAX_GENERATIONS")? {
            config.max_generations = v;
        }
        if let Some(v) = env_override::<MutationKind>("FCTP_MUTATION_KIND")? {
            config.mutation_kind = v;
        }
        if let Some(v) = env_override::<u64>("FCTP_SEED")? {
            config.seed = Some(v);
        }

        config.validate()?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }
}

fn env_override<T: FromStr>(key: &str) -> Result<Option<T>, FctpError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| FctpError::InvalidConfig(format!("cannot parse {}='{}'", key, raw))),
        Err(_) => Ok(None),
    }
}
