use std::fmt::Debug;
use std::hash::Hash;

use num::ToPrimitive;
use rand::Rng;

/// A single neighborhood structure, used by variable neighborhood descent.
pub type Neighborhood<'n, C> = &'n dyn Fn(&C) -> Vec<C>;

/// Provides an interface for improving candidate solutions.
///
/// Candidates are complete solutions (an assignment, a sequence). The
/// optimizer only ever holds a few of them, each paired with its quality.
pub trait Objective {
    type Candidate: Debug + Clone + Eq + Hash;

    /// Lower is better.
    type Quality: Debug + Copy + Ord + ToPrimitive;

    fn quality(&self, candidate: &Self::Candidate) -> Self::Quality;

    /// Every candidate reachable by one local move.
    fn neighbors(&self, candidate: &Self::Candidate) -> Vec<Self::Candidate>;

    /// A single random neighbor, used by simulated annealing.
    ///
    /// Defaults to a uniform pick from [Objective::neighbors]; override it
    /// when a random move is much cheaper than the full neighborhood.
    fn random_neighbor<R>(&self, candidate: &Self::Candidate, rng: &mut R) -> Option<Self::Candidate>
    where
        R: Rng + ?Sized,
    {
        let mut neighbors = self.neighbors(candidate);
        if neighbors.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..neighbors.len());
        Some(neighbors.swap_remove(idx))
    }

    /// Quality at or below which a candidate is a solution.
    fn target(&self) -> Option<Self::Quality> {
        None
    }

    /// Does this candidate solve the problem?
    ///
    /// Objectives overriding this should also override [Objective::has_goal].
    fn is_goal(&self, _candidate: &Self::Candidate, quality: Self::Quality) -> bool {
        self.target().map_or(false, |target| quality <= target)
    }

    /// Whether any candidate could be reported as a goal. Objectives
    /// without a goal have their best candidate returned instead.
    fn has_goal(&self) -> bool {
        self.target().is_some()
    }
}

impl<'o, O> Objective for &'o O
where
    O: Objective + ?Sized,
{
    type Candidate = O::Candidate;
    type Quality = O::Quality;

    fn quality(&self, candidate: &Self::Candidate) -> Self::Quality {
        (**self).quality(candidate)
    }

    fn neighbors(&self, candidate: &Self::Candidate) -> Vec<Self::Candidate> {
        (**self).neighbors(candidate)
    }

    fn random_neighbor<R>(&self, candidate: &Self::Candidate, rng: &mut R) -> Option<Self::Candidate>
    where
        R: Rng + ?Sized,
    {
        (**self).random_neighbor(candidate, rng)
    }

    fn target(&self) -> Option<Self::Quality> {
        (**self).target()
    }

    fn is_goal(&self, candidate: &Self::Candidate, quality: Self::Quality) -> bool {
        (**self).is_goal(candidate, quality)
    }

    fn has_goal(&self) -> bool {
        (**self).has_goal()
    }
}
