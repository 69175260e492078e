use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Add;

use num::Zero;

/// Accumulated path cost and heuristic estimates.
///
/// Any totally ordered number with a zero works, so integer step
/// counts and weighted distances can share the same algorithms.
pub trait Cost: Debug + Copy + Ord + Add<Output = Self> + Zero {}

impl<T> Cost for T where T: Debug + Copy + Ord + Add<Output = T> + Zero {}

/// Provides an interface for conducting searches.
///
/// The state graph is implicit: it is discovered by asking for the
/// successors of each state as it is expanded. States are stored in
/// the visited set, so they must be hashable and cheap enough to clone.
pub trait SearchProblem {
    type State: Debug + Clone + Eq + Hash;
    type Cost: Cost;

    /// Indicates that this state solves the problem, and causes the
    /// search algorithm to stop and report the path to it.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Produces the states reachable in one step, along with the
    /// cost of taking that step.
    fn successors(&self, state: &Self::State) -> Vec<(Self::State, Self::Cost)>;

    /// Best guess of the remaining cost from this state to a goal.
    ///
    /// Only informed strategies consult the heuristic. The default
    /// of zero turns A* into uniform cost search.
    fn heuristic(&self, _state: &Self::State) -> Self::Cost {
        Self::Cost::zero()
    }
}

impl<'p, P> SearchProblem for &'p P
where
    P: SearchProblem + ?Sized,
{
    type State = P::State;
    type Cost = P::Cost;

    fn is_goal(&self, state: &Self::State) -> bool {
        (**self).is_goal(state)
    }

    fn successors(&self, state: &Self::State) -> Vec<(Self::State, Self::Cost)> {
        (**self).successors(state)
    }

    fn heuristic(&self, state: &Self::State) -> Self::Cost {
        (**self).heuristic(state)
    }
}
