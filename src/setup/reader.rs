use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::domain::types::ProblemInstance;
use crate::error::FctpError;

/// Reads an instance file in the layout
///
/// ```text
/// <numFactories> <numStores>
///
/// <production x numFactories>
/// <demand x numStores>
///
/// <numFactories lines of numStores variable costs>
///
/// <numFactories lines of numStores fixed costs>
/// ```
pub fn read_instance<P: AsRef<Path>>(path: P) -> Result<ProblemInstance, FctpError> {
    let path = path.as_ref();
    debug!("Reading instance from {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_instance(&content)
}

/// Parses the text of an instance file. Trailing whitespace on a line is ignored.
pub fn parse_instance(content: &str) -> Result<ProblemInstance, FctpError> {
    let mut lines = LineCursor::new(content);

    let dims: Vec<usize> = lines.numbers(2)?;
    let (num_factories, num_stores) = (dims[0], dims[1]);
    lines.blank()?;

    let production = lines.numbers(num_factories)?;
    let demand = lines.numbers(num_stores)?;
    lines.blank()?;

    let costs = lines.matrix(num_factories, num_stores)?;
    lines.blank()?;

    let fixed_costs = lines.matrix(num_factories, num_stores)?;

    ProblemInstance::new(production, demand, costs, fixed_costs)
}

struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> Result<&'a str, FctpError> {
        self.line_no += 1;
        self.lines.next().ok_or_else(|| {
            FctpError::format(self.line_no, format!("file truncated, expected {}", expected))
        })
    }

    fn blank(&mut self) -> Result<(), FctpError> {
        let line = self.next_line("a blank separator line")?;
        if !line.trim().is_empty() {
            return Err(FctpError::format(
                self.line_no,
                format!("expected a blank separator line, found '{}'", line.trim()),
            ));
        }
        Ok(())
    }

    fn numbers<T: FromStr>(&mut self, count: usize) -> Result<Vec<T>, FctpError> {
        let line = self.next_line(&format!("{} integers", count))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != count {
            return Err(FctpError::format(
                self.line_no,
                format!("expected {} integers, found {}", count, tokens.len()),
            ));
        }

        tokens
            .iter()
            .map(|tok| {
                tok.parse::<T>().map_err(|_| {
                    FctpError::format(self.line_no, format!("'{}' is not a valid integer", tok))
                })
            })
            .collect()
    }

    fn matrix(&mut self, rows: usize, cols: usize) -> Result<Vec<Vec<u64>>, FctpError> {
        (0..rows).map(|_| self.numbers(cols)).collect()
    }
}
