use std::time;
use thiserror::Error;

/// Error produced when a search fails.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No solution found after expanding {0} nodes")]
    NoSolution(usize),

    #[error("Step limit exhausted after {0} steps")]
    StepLimitExhausted(usize),

    #[error("Time limit exhausted after {0:?}")]
    TimeLimitExhausted(time::Duration),
}

impl SearchError {
    /// Number of nodes expanded before the frontier ran dry.
    pub fn expanded(&self) -> Option<usize> {
        match self {
            SearchError::NoSolution(n) => Some(*n),
            SearchError::StepLimitExhausted(n) => Some(*n),
            SearchError::TimeLimitExhausted(_) => None,
        }
    }
}

/// Result when a search method might fail.
pub type Result<T> = std::result::Result<T, SearchError>;
