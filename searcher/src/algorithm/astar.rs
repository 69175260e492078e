use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd};
use std::collections::BinaryHeap;

use super::cache::{CostCache, VisitedSet};
use super::{Pending, SearchAlgorithm, Solution, Strategy};
use crate::algorithm::SearchQueue;
use crate::errors::Result;
use crate::traits::{Cost, SearchProblem};

/// Frontier entry ordered by priority, then by insertion order.
#[derive(Debug)]
struct Prioritized<C> {
    sequence: usize,
    pending: Pending<C>,
}

impl<C> PartialEq for Prioritized<C>
where
    C: Cost,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C> Eq for Prioritized<C> where C: Cost {}

impl<C> Ord for Prioritized<C>
where
    C: Cost,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.pending
            .priority
            .cmp(&other.pending.priority)
            .then(self.sequence.cmp(&other.sequence))
            .reverse()
    }
}

impl<C> PartialOrd for Prioritized<C>
where
    C: Cost,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A min-priority queue which is stable: among entries of equal
/// priority, the one pushed first is popped first.
#[derive(Debug)]
pub struct PriorityQueue<C>
where
    C: Cost,
{
    queue: BinaryHeap<Prioritized<C>>,
    sequence: usize,
}

impl<C> Default for PriorityQueue<C>
where
    C: Cost,
{
    fn default() -> Self {
        PriorityQueue {
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }
}

impl<C> SearchQueue for PriorityQueue<C>
where
    C: Cost,
{
    type Candidate = Pending<C>;

    fn pop(&mut self) -> Option<Self::Candidate> {
        self.queue.pop().map(|p| p.pending)
    }

    fn push(&mut self, item: Self::Candidate) {
        self.queue.push(Prioritized {
            sequence: self.sequence,
            pending: item,
        });
        self.sequence += 1;
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

pub type AStarSearcher<P> = SearchAlgorithm<
    P,
    PriorityQueue<<P as SearchProblem>::Cost>,
    CostCache<<P as SearchProblem>::State, <P as SearchProblem>::Cost>,
>;

pub type GreedySearcher<P> = SearchAlgorithm<
    P,
    PriorityQueue<<P as SearchProblem>::Cost>,
    VisitedSet<<P as SearchProblem>::State, <P as SearchProblem>::Cost>,
>;

pub fn build<P>(problem: P, origin: P::State) -> AStarSearcher<P>
where
    P: SearchProblem,
{
    SearchAlgorithm::new(problem, origin, Strategy::AStar)
}

pub fn build_greedy<P>(problem: P, origin: P::State) -> GreedySearcher<P>
where
    P: SearchProblem,
{
    SearchAlgorithm::new(problem, origin, Strategy::Greedy)
}

/// A* search, ordered by path cost plus heuristic.
///
/// The path returned is the cheapest one when the heuristic never
/// overestimates the remaining cost and is consistent. States found
/// again along a cheaper path are re-opened.
pub fn astar<P>(problem: P, origin: P::State) -> Result<Solution<P::State, P::Cost>>
where
    P: SearchProblem,
{
    build(problem, origin).run()
}

/// Greedy best-first search, ordered by the heuristic alone.
///
/// Usually expands far fewer nodes than A*, but the path found
/// need not be the cheapest.
pub fn greedy<P>(problem: P, origin: P::State) -> Result<Solution<P::State, P::Cost>>
where
    P: SearchProblem,
{
    build_greedy(problem, origin).run()
}
