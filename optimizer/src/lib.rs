//! Local search and metaheuristics over complete candidate solutions.
//!
//! Implement [Objective] for a problem (or wrap closures in an
//! [FnObjective]), then improve a starting candidate with one of
//! [hill_climb], [beam], [vnd] or [anneal].
//!
//! Quality is always minimized: lower is better. An objective with a
//! target quality (or its own goal predicate) succeeds only when a
//! candidate reaches the goal. Without a goal, the best candidate found
//! is returned when the strategy terminates.

pub mod algorithm;
mod errors;
mod problem;
mod traits;

pub use errors::OptimizeError;
pub use errors::Result as OptimizeResult;
pub use problem::FnObjective;
pub use traits::{Neighborhood, Objective};

pub use algorithm::anneal::{anneal, Schedule};
pub use algorithm::beam::beam;
pub use algorithm::climb::{hill_climb, vnd};
pub use algorithm::{optimize, OptimizeOptions, Scored, Strategy};
