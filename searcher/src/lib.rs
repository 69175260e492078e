//! Generalized state-space search, for puzzles and graph traversal.
//!
//! To use these search algorithms, implement the trait [SearchProblem]
//! (or wrap a few closures in a [FnProblem]) and pick a [Strategy].
//!
//! Every search returns the path from the origin to the first goal state
//! popped from the frontier, along with the number of nodes expanded.
//! A* only guarantees the cheapest path when the heuristic is admissible
//! and consistent; that is a precondition on the caller, and is not checked.

pub mod algorithm;
mod errors;
mod problem;
mod traits;

pub use errors::Result as SearchResult;
pub use errors::SearchError;
pub use problem::FnProblem;
pub use traits::Cost;
pub use traits::SearchProblem;

pub use algorithm::astar::{astar, greedy};
pub use algorithm::basic::{bfs, dfs};
pub use algorithm::{search, search_with};
pub use algorithm::{SearchAlgorithm, SearchOptions, Solution, Strategy};
