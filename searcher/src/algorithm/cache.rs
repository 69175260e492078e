//! Visited-state bookkeeping to eliminate already explored states.

use std::collections::hash_map::{Entry, HashMap};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::traits::Cost;

/// Defines the behavior required of a search cache.
pub trait Cache: Default {
    type State;
    type Cost;

    /// Should a newly generated node for this state, reached at this
    /// cost, be placed on the frontier?
    fn admit(&mut self, state: &Self::State, cost: Self::Cost) -> bool;

    /// Should a node popped from the frontier be expanded? Expanding
    /// marks the state as visited.
    fn expand(&mut self, state: &Self::State, cost: Self::Cost) -> bool;

    /// Number of states recorded.
    fn len(&self) -> usize;
}

/// Records every expanded state, and never expands a state twice.
#[derive(Debug)]
pub struct VisitedSet<S, C> {
    visited: HashSet<S>,
    marker: PhantomData<C>,
}

impl<S, C> Default for VisitedSet<S, C> {
    fn default() -> Self {
        VisitedSet {
            visited: HashSet::new(),
            marker: PhantomData,
        }
    }
}

impl<S, C> Cache for VisitedSet<S, C>
where
    S: Debug + Clone + Eq + Hash,
{
    type State = S;
    type Cost = C;

    fn admit(&mut self, state: &S, _cost: C) -> bool {
        !self.visited.contains(state)
    }

    fn expand(&mut self, state: &S, _cost: C) -> bool {
        if self.visited.contains(state) {
            return false;
        }
        self.visited.insert(state.clone())
    }

    fn len(&self) -> usize {
        self.visited.len()
    }
}

/// Remembers the cheapest known cost to reach each state.
///
/// Rediscovering a state on a strictly cheaper path admits it
/// to the frontier again, and older, more expensive entries are
/// discarded when they are popped. This stands in for a priority
/// queue with decrease-key.
#[derive(Debug)]
pub struct CostCache<S, C> {
    cache: HashMap<S, C>,
}

impl<S, C> Default for CostCache<S, C> {
    fn default() -> Self {
        CostCache {
            cache: HashMap::default(),
        }
    }
}

impl<S, C> Cache for CostCache<S, C>
where
    S: Debug + Clone + Eq + Hash,
    C: Cost,
{
    type State = S;
    type Cost = C;

    fn admit(&mut self, state: &S, cost: C) -> bool {
        // (a) For states which are not in the cache, add them.
        // (b) If the state is already in the cache at a lower or equal
        //     cost, ignore this node.
        // (c) If the cached cost is higher, this node is the new winner.
        match self.cache.entry(state.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(cost);
                true
            }
            Entry::Occupied(mut entry) => {
                if cost < *entry.get() {
                    entry.insert(cost);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn expand(&mut self, state: &S, cost: C) -> bool {
        self.cache.get(state).map_or(true, |best| cost <= *best)
    }

    fn len(&self) -> usize {
        self.cache.len()
    }
}
