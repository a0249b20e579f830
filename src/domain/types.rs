use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::FctpError;

/// A fixed-charge transportation instance: sources (factories) with finite
/// production, destinations (stores) with exact demand, and per-route
/// variable and fixed costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInstance {
    pub num_factories: usize,
    pub num_stores: usize,
    pub production: Vec<u64>,
    pub demand: Vec<u64>,
    pub costs: Vec<Vec<u64>>,
    pub fixed_costs: Vec<Vec<u64>>,
}

impl ProblemInstance {
    /// Builds an instance, checking that every vector and matrix agrees on the dimensions.
    pub fn new(
        production: Vec<u64>,
        demand: Vec<u64>,
        costs: Vec<Vec<u64>>,
        fixed_costs: Vec<Vec<u64>>,
    ) -> Result<Self, FctpError> {
        let num_factories = production.len();
        let num_stores = demand.len();

        for (name, matrix) in [("costs", &costs), ("fixed costs", &fixed_costs)] {
            if matrix.len() != num_factories {
                return Err(FctpError::InvalidInstance(format!(
                    "{} matrix has {} rows, expected {}",
                    name,
                    matrix.len(),
                    num_factories
                )));
            }
            if let Some((i, row)) = matrix.iter().find_position(|row| row.len() != num_stores) {
                return Err(FctpError::InvalidInstance(format!(
                    "{} row {} has {} columns, expected {}",
                    name,
                    i,
                    row.len(),
                    num_stores
                )));
            }
        }

        Ok(Self {
            num_factories,
            num_stores,
            production,
            demand,
            costs,
            fixed_costs,
        })
    }

    /// Rejects instances the genetic search can never terminate feasibly on.
    pub fn validate(&self) -> Result<(), FctpError> {
        if self.num_factories == 0 {
            return Err(FctpError::InvalidInstance("no sources".into()));
        }
        if self.num_stores == 0 {
            return Err(FctpError::InvalidInstance("no destinations".into()));
        }
        if self.total_production() == 0 {
            return Err(FctpError::InvalidInstance("total supply is zero".into()));
        }
        if self.total_demand() == 0 {
            return Err(FctpError::InvalidInstance("total demand is zero".into()));
        }
        for (name, total) in [
            ("supply", self.total_production()),
            ("demand", self.total_demand()),
        ] {
            if i64::try_from(total).is_err() {
                return Err(FctpError::InvalidInstance(format!(
                    "total {} {} exceeds {}",
                    name,
                    total,
                    i64::MAX
                )));
            }
        }
        Ok(())
    }

    pub fn total_production(&self) -> u64 {
        saturating_sum(self.production.iter().copied())
    }

    pub fn total_demand(&self) -> u64 {
        saturating_sum(self.demand.iter().copied())
    }
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// Writes the instance in the plain-text input format read by [`crate::setup::reader`].
impl fmt::Display for ProblemInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.num_factories, self.num_stores)?;
        writeln!(f)?;
        writeln!(f, "{}", self.production.iter().join(" "))?;
        writeln!(f, "{}", self.demand.iter().join(" "))?;
        writeln!(f)?;
        for row in &self.costs {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        writeln!(f)?;
        for row in &self.fixed_costs {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}

/// Units shipped per route, `cells[source][destination]`.
///
/// The derived ordering is lexicographic over rows; the population manager
/// relies on it for deduplication and for breaking fitness ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Allocation {
    cells: Vec<Vec<u64>>,
}

impl Allocation {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![0; cols]; rows],
        }
    }

    pub fn from_rows(cells: Vec<Vec<u64>>) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.cells
    }

    pub fn into_rows(self) -> Vec<Vec<u64>> {
        self.cells
    }

    pub fn num_rows(&self) -> usize {
        self.cells.len()
    }

    pub fn num_cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.cells[i][j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: u64) {
        self.cells[i][j] = value;
    }

    pub fn add(&mut self, i: usize, j: usize, amount: u64) {
        self.cells[i][j] = self.cells[i][j].saturating_add(amount);
    }

    pub fn row_sum(&self, i: usize) -> u64 {
        saturating_sum(self.cells[i].iter().copied())
    }

    pub fn col_sum(&self, j: usize) -> u64 {
        saturating_sum(self.cells.iter().map(|row| row[j]))
    }

    /// Total units shipped over every route.
    pub fn total(&self) -> u64 {
        saturating_sum(self.cells.iter().flatten().copied())
    }

    /// Number of routes carrying a nonzero shipment.
    pub fn used_routes(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c > 0).count()
    }
}

/// An allocation paired with its fitness.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub allocation: Allocation,
    pub fitness: u64,
}
