//! Closure-backed objectives.

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::marker::PhantomData;

use num::ToPrimitive;

use crate::traits::Objective;

/// An [Objective] assembled from a quality function and a
/// neighborhood function, with an optional target quality.
pub struct FnObjective<C, Q, F, N> {
    quality: F,
    neighbors: N,
    target: Option<Q>,
    marker: PhantomData<fn(&C)>,
}

impl<C, Q, F, N> FnObjective<C, Q, F, N>
where
    F: Fn(&C) -> Q,
    N: Fn(&C) -> Vec<C>,
{
    pub fn new(quality: F, neighbors: N) -> Self {
        Self {
            quality,
            neighbors,
            target: None,
            marker: PhantomData,
        }
    }

    /// Treat candidates at or below this quality as solutions.
    pub fn with_target(mut self, target: Q) -> Self {
        self.target = Some(target);
        self
    }
}

impl<C, Q, F, N> Debug for FnObjective<C, Q, F, N>
where
    Q: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjective")
            .field("target", &self.target)
            .finish()
    }
}

impl<C, Q, F, N> Objective for FnObjective<C, Q, F, N>
where
    C: Debug + Clone + Eq + Hash,
    Q: Debug + Copy + Ord + ToPrimitive,
    F: Fn(&C) -> Q,
    N: Fn(&C) -> Vec<C>,
{
    type Candidate = C;
    type Quality = Q;

    fn quality(&self, candidate: &C) -> Q {
        (self.quality)(candidate)
    }

    fn neighbors(&self, candidate: &C) -> Vec<C> {
        (self.neighbors)(candidate)
    }

    fn target(&self) -> Option<Q> {
        self.target
    }
}
