//! Closure-backed search problems.

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::traits::{Cost, SearchProblem};

fn no_estimate<S, C: Cost>(_state: &S) -> C {
    C::zero()
}

/// A [SearchProblem] assembled from a goal predicate, a successor
/// function and, optionally, a heuristic.
pub struct FnProblem<S, C, G, F, H> {
    is_goal: G,
    successors: F,
    heuristic: H,
    marker: PhantomData<fn(&S) -> C>,
}

impl<S, C, G, F> FnProblem<S, C, G, F, fn(&S) -> C>
where
    C: Cost,
    G: Fn(&S) -> bool,
    F: Fn(&S) -> Vec<(S, C)>,
{
    /// Build an uninformed problem, whose heuristic is always zero.
    pub fn new(is_goal: G, successors: F) -> Self {
        Self {
            is_goal,
            successors,
            heuristic: no_estimate::<S, C>,
            marker: PhantomData,
        }
    }
}

impl<S, C, G, F, H> FnProblem<S, C, G, F, H> {
    /// Replace the heuristic used by informed strategies.
    pub fn with_heuristic<E>(self, heuristic: E) -> FnProblem<S, C, G, F, E>
    where
        E: Fn(&S) -> C,
    {
        FnProblem {
            is_goal: self.is_goal,
            successors: self.successors,
            heuristic,
            marker: PhantomData,
        }
    }
}

impl<S, C, G, F, H> Debug for FnProblem<S, C, G, F, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProblem").finish()
    }
}

impl<S, C, G, F, H> SearchProblem for FnProblem<S, C, G, F, H>
where
    S: Debug + Clone + Eq + Hash,
    C: Cost,
    G: Fn(&S) -> bool,
    F: Fn(&S) -> Vec<(S, C)>,
    H: Fn(&S) -> C,
{
    type State = S;
    type Cost = C;

    fn is_goal(&self, state: &S) -> bool {
        (self.is_goal)(state)
    }

    fn successors(&self, state: &S) -> Vec<(S, C)> {
        (self.successors)(state)
    }

    fn heuristic(&self, state: &S) -> C {
        (self.heuristic)(state)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn closures_answer_for_the_problem() {
        let problem = FnProblem::new(|s: &u32| *s == 3, |s: &u32| vec![(s + 1, 1u32)]);
        assert!(problem.is_goal(&3));
        assert!(!problem.is_goal(&2));
        assert_eq!(problem.successors(&2), vec![(3, 1)]);
        assert_eq!(problem.heuristic(&0), 0);

        let informed = problem.with_heuristic(|s: &u32| 3u32.saturating_sub(*s));
        assert_eq!(informed.heuristic(&1), 2);
        assert!(informed.is_goal(&3));
    }
}
