use std::fmt;

// Simulation-level errors. These are programming defects (bad type tags),
// caught by tests rather than recovered from at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The factory was asked for a satellite type it cannot build.
    InvalidVariant(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidVariant(tag) => write!(f, "invalid satellite variant: {tag}"),
        }
    }
}

impl std::error::Error for SimError {}
