//! Provides the building blocks shared by the local search strategies.

use std::fmt;

use log::debug;
use rand::Rng;

use crate::errors::{OptimizeError, Result};
use crate::traits::{Neighborhood, Objective};

pub(crate) mod anneal;
pub(crate) mod beam;
pub(crate) mod climb;

use self::anneal::Schedule;

/// A candidate paired with its quality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored<C, Q> {
    candidate: C,
    quality: Q,
}

impl<C, Q> Scored<C, Q>
where
    Q: Copy,
{
    pub(crate) fn new<O>(objective: &O, candidate: C) -> Self
    where
        O: Objective<Candidate = C, Quality = Q> + ?Sized,
    {
        let quality = objective.quality(&candidate);
        Self { candidate, quality }
    }

    pub fn candidate(&self) -> &C {
        &self.candidate
    }

    pub fn into_candidate(self) -> C {
        self.candidate
    }

    pub fn quality(&self) -> Q {
        self.quality
    }
}

/// Options which control an optimizer.
#[derive(Debug, Clone, Default)]
pub struct OptimizeOptions {
    /// Log progress every this many iterations.
    pub verbose: Option<usize>,

    /// Maximum number of iterations.
    pub limit: Option<usize>,
}

/// Counts iterations, and enforces the iteration limit.
#[derive(Debug)]
pub(crate) struct Iterations {
    current: usize,
    maximum: Option<usize>,
    verbose: Option<usize>,
}

impl Iterations {
    pub(crate) fn new(options: &OptimizeOptions) -> Self {
        Self {
            current: 0,
            maximum: options.limit,
            verbose: options.verbose,
        }
    }

    pub(crate) fn increment(&mut self) -> Result<()> {
        if self.exhausted() {
            return Err(OptimizeError::StepLimitExhausted(self.current));
        }

        self.current += 1;
        Ok(())
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.maximum.map_or(false, |m| self.current >= m)
    }

    pub(crate) fn count(&self) -> usize {
        self.current
    }

    /// Should progress be logged on this iteration?
    pub(crate) fn report(&self) -> bool {
        match self.verbose {
            Some(every) if every > 0 => self.current % every == 0,
            _ => false,
        }
    }
}

/// Decide the outcome once a strategy stops improving.
pub(crate) fn settle<O>(
    objective: &O,
    current: Scored<O::Candidate, O::Quality>,
    iterations: &Iterations,
) -> Result<Scored<O::Candidate, O::Quality>>
where
    O: Objective + ?Sized,
{
    if !objective.has_goal() {
        debug!(
            "Settled at {:?} after {} iterations",
            current.quality,
            iterations.count()
        );
        return Ok(current);
    }

    if objective.is_goal(&current.candidate, current.quality) {
        return Ok(current);
    }

    debug!(
        "Stuck at {:?} after {} iterations",
        current.quality,
        iterations.count()
    );
    Err(OptimizeError::LocalOptimumReached(iterations.count()))
}

/// The local search strategy to apply.
pub enum Strategy<'n, C> {
    /// Steepest-ascent hill climbing from the first candidate.
    HillClimb,

    /// Beam search over all the initial candidates.
    Beam { width: usize },

    /// Variable neighborhood descent, trying each neighborhood in order.
    Vnd(&'n [Neighborhood<'n, C>]),

    /// Simulated annealing from the first candidate.
    Anneal(Schedule),
}

impl<'n, C> fmt::Debug for Strategy<'n, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::HillClimb => write!(f, "HillClimb"),
            Strategy::Beam { width } => f.debug_struct("Beam").field("width", width).finish(),
            Strategy::Vnd(neighborhoods) => write!(f, "Vnd({} neighborhoods)", neighborhoods.len()),
            Strategy::Anneal(schedule) => f.debug_tuple("Anneal").field(schedule).finish(),
        }
    }
}

fn first<C>(mut candidates: Vec<C>) -> Result<C> {
    if candidates.is_empty() {
        return Err(OptimizeError::InvalidInput(
            "at least one initial candidate is required".to_string(),
        ));
    }
    Ok(candidates.swap_remove(0))
}

/// Improve the initial candidates with the chosen strategy.
///
/// Single-candidate strategies start from the first candidate; beam
/// search starts from all of them.
pub fn optimize<O, R>(
    objective: &O,
    initial: Vec<O::Candidate>,
    strategy: Strategy<'_, O::Candidate>,
    options: OptimizeOptions,
    rng: &mut R,
) -> Result<Scored<O::Candidate, O::Quality>>
where
    O: Objective,
    R: Rng + ?Sized,
{
    match strategy {
        Strategy::HillClimb => climb::hill_climb(objective, first(initial)?, options),
        Strategy::Beam { width } => beam::beam(objective, initial, width, options),
        Strategy::Vnd(neighborhoods) => climb::vnd(objective, first(initial)?, neighborhoods, options),
        Strategy::Anneal(schedule) => {
            anneal::anneal(objective, first(initial)?, schedule, options, rng)
        }
    }
}
