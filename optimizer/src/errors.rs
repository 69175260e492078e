use thiserror::Error;

/// Ways in which a local search can end without reaching its goal.
///
/// None of these are fatal: callers usually restart from a fresh
/// candidate, or accept the best candidate they have.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Local optimum reached after {0} iterations")]
    LocalOptimumReached(usize),

    #[error("Beam emptied after {0} iterations")]
    FrontierExhausted(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Step limit exhausted after {0} steps")]
    StepLimitExhausted(usize),
}

/// Result when an optimizer might fail.
pub type Result<T> = std::result::Result<T, OptimizeError>;
