use std::fmt;

/// Errors raised while loading an instance, configuring or running the solver.
#[derive(Debug)]
pub enum FctpError {
    /// Malformed or truncated instance file. `line` is 1-based.
    Format { line: usize, message: String },
    /// Instance that can never be solved (empty dimensions, zero totals, mismatched shapes).
    InvalidInstance(String),
    InvalidConfig(String),
    Io(std::io::Error),
}

impl FctpError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        FctpError::Format {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for FctpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FctpError::Format { line, message } => {
                write!(f, "format error at line {}: {}", line, message)
            }
            FctpError::InvalidInstance(msg) => write!(f, "invalid instance: {}", msg),
            FctpError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            FctpError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for FctpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FctpError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FctpError {
    fn from(e: std::io::Error) -> Self {
        FctpError::Io(e)
    }
}
