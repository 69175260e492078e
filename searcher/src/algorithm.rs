//! Provides the building blocks for search algorithms

use std::time::{Duration, Instant};

use log::{debug, trace};

use self::cache::Cache;
use crate::errors::{Result, SearchError};
use crate::traits::SearchProblem;

pub(crate) mod astar;
pub(crate) mod basic;
pub(crate) mod cache;

/// Trait used to implement queues of search candidates
/// which should be checked for completion.
pub trait SearchQueue: Default {
    type Candidate;

    fn pop(&mut self) -> Option<Self::Candidate>;

    fn push(&mut self, item: Self::Candidate);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The order in which the frontier is explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Oldest node first.
    BreadthFirst,

    /// Newest node first.
    DepthFirst,

    /// Lowest heuristic estimate first.
    Greedy,

    /// Lowest path cost plus heuristic estimate first.
    AStar,
}

/// A node waiting in the frontier, referring into the node arena.
#[derive(Debug, Clone, Copy)]
pub struct Pending<C> {
    pub(crate) node: usize,
    pub(crate) priority: C,
}

#[derive(Debug)]
struct Node<S, C> {
    state: S,
    parent: Option<usize>,
    cost: C,
}

#[derive(Debug)]
struct StepLimit {
    current: usize,
    maximum: usize,
}

impl StepLimit {
    fn new(limit: usize) -> Self {
        Self {
            current: 0,
            maximum: limit,
        }
    }

    fn increment(&mut self) -> Result<()> {
        if self.current >= self.maximum {
            return Err(SearchError::StepLimitExhausted(self.current));
        }

        self.current += 1;
        Ok(())
    }
}

/// Options which control a search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Log progress every this many expansions.
    pub verbose: Option<usize>,

    /// Maximum number of nodes to expand.
    pub limit: Option<usize>,

    /// Maximum wall-clock time to spend searching.
    pub timeout: Option<Duration>,
}

/// A path from the origin to a goal state.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<S, C> {
    path: Vec<S>,
    cost: C,
    expanded: usize,
}

impl<S, C> Solution<S, C>
where
    C: Copy,
{
    /// States visited, starting with the origin and ending at the goal.
    pub fn path(&self) -> &[S] {
        &self.path
    }

    pub fn into_path(self) -> Vec<S> {
        self.path
    }

    /// Accumulated cost of every step along the path.
    pub fn cost(&self) -> C {
        self.cost
    }

    /// Number of steps taken along the path.
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Number of nodes expanded while looking for this solution.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn destination(&self) -> Option<&S> {
        self.path.last()
    }
}

/// Implementation of search, using generic components.
///
/// Uses a generic queue (Q) and a generic cache (K) to provide
/// a single foundation for multiple search algorithms. Nodes are
/// kept in an arena and refer to their parents by index, so the
/// path can be rebuilt once a goal is found.
#[derive(Debug)]
pub struct SearchAlgorithm<P, Q, K>
where
    P: SearchProblem,
    Q: SearchQueue<Candidate = Pending<P::Cost>>,
    K: Cache<State = P::State, Cost = P::Cost>,
{
    problem: P,
    strategy: Strategy,
    nodes: Vec<Node<P::State, P::Cost>>,
    cache: K,
    queue: Q,
    options: SearchOptions,
}

impl<P, Q, K> SearchAlgorithm<P, Q, K>
where
    P: SearchProblem,
    Q: SearchQueue<Candidate = Pending<P::Cost>>,
    K: Cache<State = P::State, Cost = P::Cost>,
{
    pub(crate) fn new(problem: P, origin: P::State, strategy: Strategy) -> Self {
        let mut sr = SearchAlgorithm {
            problem,
            strategy,
            nodes: Vec::new(),
            cache: K::default(),
            queue: Q::default(),
            options: SearchOptions::default(),
        };
        let zero = num::zero();
        sr.cache.admit(&origin, zero);
        sr.push(origin, None, zero);
        sr
    }

    /// Replace the options for this search.
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set a step limit for this search algorithm.
    ///
    /// When this many nodes have been expanded,
    /// the search algorithm will return an error.
    pub fn set_limit(&mut self, limit: usize) {
        self.options.limit = Some(limit);
    }

    fn priority(&self, state: &P::State, cost: P::Cost) -> P::Cost {
        match self.strategy {
            Strategy::BreadthFirst | Strategy::DepthFirst => cost,
            Strategy::Greedy => self.problem.heuristic(state),
            Strategy::AStar => cost + self.problem.heuristic(state),
        }
    }

    fn push(&mut self, state: P::State, parent: Option<usize>, cost: P::Cost) {
        let priority = self.priority(&state, cost);
        let node = self.nodes.len();
        self.nodes.push(Node {
            state,
            parent,
            cost,
        });
        self.queue.push(Pending { node, priority });
    }

    fn solution(&self, goal: usize, expanded: usize) -> Solution<P::State, P::Cost> {
        let mut path = Vec::new();
        let mut cursor = Some(goal);
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            path.push(node.state.clone());
            cursor = node.parent;
        }
        path.reverse();

        Solution {
            path,
            cost: self.nodes[goal].cost,
            expanded,
        }
    }

    /// Run the search until a goal state is expanded.
    pub fn run(mut self) -> Result<Solution<P::State, P::Cost>> {
        let started = Instant::now();
        let mut counter = self.options.limit.map(StepLimit::new);
        let mut expanded = 0;

        while let Some(pending) = self.queue.pop() {
            let node = &self.nodes[pending.node];

            // Stale or duplicate frontier entries are dropped without counting.
            if !self.cache.expand(&node.state, node.cost) {
                trace!("Skipping {:?}", node.state);
                continue;
            }

            if let Some(c) = counter.as_mut() {
                c.increment()?;
            }
            if let Some(timeout) = self.options.timeout {
                let elapsed = started.elapsed();
                if elapsed > timeout {
                    return Err(SearchError::TimeLimitExhausted(elapsed));
                }
            }
            expanded += 1;

            if let Some(every) = self.options.verbose {
                if every > 0 && expanded % every == 0 {
                    debug!(
                        "Q{} C{} N{} ({:?} {:?}) {}",
                        self.queue.len(),
                        self.cache.len(),
                        self.nodes.len(),
                        node.cost,
                        pending.priority,
                        expanded
                    );
                }
            }

            if self.problem.is_goal(&node.state) {
                debug!(
                    "Goal {:?} reached at cost {:?} after {} expansions",
                    node.state, node.cost, expanded
                );
                return Ok(self.solution(pending.node, expanded));
            }

            let cost = node.cost;
            let children = self.problem.successors(&node.state);
            for (state, step) in children {
                let g = cost + step;
                if self.cache.admit(&state, g) {
                    self.push(state, Some(pending.node), g);
                }
            }
        }

        debug!("Frontier exhausted after {} expansions", expanded);
        Err(SearchError::NoSolution(expanded))
    }
}

/// Search from `origin` using the given strategy and default options.
pub fn search<P>(problem: P, origin: P::State, strategy: Strategy) -> Result<Solution<P::State, P::Cost>>
where
    P: SearchProblem,
{
    search_with(problem, origin, strategy, SearchOptions::default())
}

/// Search from `origin` using the given strategy and options.
pub fn search_with<P>(
    problem: P,
    origin: P::State,
    strategy: Strategy,
    options: SearchOptions,
) -> Result<Solution<P::State, P::Cost>>
where
    P: SearchProblem,
{
    match strategy {
        Strategy::BreadthFirst => basic::bfs::build(problem, origin)
            .with_options(options)
            .run(),
        Strategy::DepthFirst => basic::dfs::build(problem, origin)
            .with_options(options)
            .run(),
        Strategy::Greedy => astar::build_greedy(problem, origin)
            .with_options(options)
            .run(),
        Strategy::AStar => astar::build(problem, origin).with_options(options).run(),
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;
    use crate::FnProblem;

    /// A small weighted, directed graph with a fixed goal.
    #[derive(Debug, Default)]
    struct Graph {
        edges: HashMap<char, Vec<(char, u32)>>,
        estimates: HashMap<char, u32>,
        goal: char,
    }

    impl Graph {
        fn new(goal: char, edges: &[(char, char, u32)]) -> Self {
            let mut graph = Graph {
                goal,
                ..Graph::default()
            };
            for &(from, to, cost) in edges {
                graph.edges.entry(from).or_default().push((to, cost));
            }
            graph
        }

        fn estimate(mut self, estimates: &[(char, u32)]) -> Self {
            self.estimates = estimates.iter().cloned().collect();
            self
        }
    }

    impl SearchProblem for Graph {
        type State = char;
        type Cost = u32;

        fn is_goal(&self, state: &char) -> bool {
            *state == self.goal
        }

        fn successors(&self, state: &char) -> Vec<(char, u32)> {
            self.edges.get(state).cloned().unwrap_or_default()
        }

        fn heuristic(&self, state: &char) -> u32 {
            self.estimates.get(state).copied().unwrap_or(0)
        }
    }

    fn diamond() -> Graph {
        // Two routes to g: a short one through b, and a long one.
        Graph::new(
            'g',
            &[
                ('s', 'a', 1),
                ('a', 'c', 1),
                ('c', 'g', 1),
                ('s', 'b', 5),
                ('b', 'g', 5),
            ],
        )
    }

    #[test_log::test]
    fn bfs_finds_fewest_steps() {
        let solution = crate::bfs(&diamond(), 's').unwrap();
        assert_eq!(solution.path(), &['s', 'b', 'g']);
        assert_eq!(solution.moves(), 2);
        assert_eq!(solution.cost(), 10);
    }

    #[test_log::test]
    fn astar_finds_cheapest_path() {
        let solution = crate::astar(&diamond(), 's').unwrap();
        assert_eq!(solution.path(), &['s', 'a', 'c', 'g']);
        assert_eq!(solution.cost(), 3);
    }

    #[test]
    fn astar_without_heuristic_matches_bfs_on_unit_costs() {
        let graph = Graph::new(
            'f',
            &[
                ('a', 'b', 1),
                ('a', 'c', 1),
                ('b', 'd', 1),
                ('c', 'd', 1),
                ('d', 'e', 1),
                ('c', 'e', 1),
                ('e', 'f', 1),
            ],
        );

        let bfs = crate::bfs(&graph, 'a').unwrap();
        let astar = crate::astar(&graph, 'a').unwrap();
        assert_eq!(bfs.moves(), 3);
        assert_eq!(astar.cost(), bfs.cost());
        assert_eq!(astar.path(), bfs.path());
    }

    #[test]
    fn astar_with_admissible_heuristic_is_optimal() {
        let graph = Graph::new(
            'g',
            &[
                ('s', 'a', 2),
                ('s', 'b', 1),
                ('a', 'g', 2),
                ('b', 'c', 1),
                ('c', 'g', 4),
            ],
        )
        .estimate(&[('s', 4), ('a', 2), ('b', 3), ('c', 4)]);

        let solution = crate::astar(&graph, 's').unwrap();
        assert_eq!(solution.cost(), 4);
        assert_eq!(solution.path(), &['s', 'a', 'g']);
    }

    #[test]
    fn greedy_follows_the_heuristic() {
        // The heuristic is admissible, but greedy search ignores the
        // cost already paid and takes the expensive route.
        let graph = Graph::new(
            'g',
            &[('s', 'a', 1), ('s', 'b', 9), ('a', 'g', 1), ('b', 'g', 1)],
        )
        .estimate(&[('a', 1)]);

        let greedy = crate::greedy(&graph, 's').unwrap();
        assert_eq!(greedy.path(), &['s', 'b', 'g']);
        assert_eq!(greedy.cost(), 10);

        let astar = crate::astar(&graph, 's').unwrap();
        assert_eq!(astar.cost(), 2);
    }

    #[test]
    fn astar_reopens_states_found_on_cheaper_paths() {
        // h(a) is admissible but inconsistent, so c is first expanded
        // through b at cost 4 and must be re-opened through a at cost 2.
        let graph = Graph::new(
            'g',
            &[
                ('s', 'a', 1),
                ('s', 'b', 1),
                ('a', 'c', 1),
                ('b', 'c', 3),
                ('c', 'g', 3),
            ],
        )
        .estimate(&[('a', 4)]);

        let solution = crate::astar(&graph, 's').unwrap();
        assert_eq!(solution.cost(), 5);
        assert_eq!(solution.path(), &['s', 'a', 'c', 'g']);
    }

    #[test]
    fn dfs_explores_last_successor_first() {
        let solution = crate::dfs(&diamond(), 's').unwrap();
        assert_eq!(solution.path(), &['s', 'b', 'g']);
        assert_eq!(solution.expanded(), 3);
    }

    #[test]
    fn origin_can_be_the_goal() {
        for strategy in &[
            Strategy::BreadthFirst,
            Strategy::DepthFirst,
            Strategy::Greedy,
            Strategy::AStar,
        ] {
            let solution = search(&diamond(), 'g', *strategy).unwrap();
            assert_eq!(solution.path(), &['g']);
            assert_eq!(solution.moves(), 0);
            assert_eq!(solution.cost(), 0);
            assert_eq!(solution.expanded(), 1);
        }
    }

    #[test]
    fn unreachable_goal_exhausts_every_strategy() {
        // A cycle with a dead end, and no way to reach z.
        let graph = Graph::new(
            'z',
            &[('a', 'b', 1), ('b', 'c', 1), ('c', 'a', 1), ('c', 'd', 1)],
        );

        for strategy in &[
            Strategy::BreadthFirst,
            Strategy::DepthFirst,
            Strategy::Greedy,
            Strategy::AStar,
        ] {
            match search(&graph, 'a', *strategy) {
                Err(SearchError::NoSolution(expanded)) => assert_eq!(expanded, 4),
                other => panic!("Expected no solution, got {:?}", other),
            }
        }
    }

    #[test]
    fn repeated_searches_are_identical() {
        let graph = diamond();
        for strategy in &[
            Strategy::BreadthFirst,
            Strategy::DepthFirst,
            Strategy::Greedy,
            Strategy::AStar,
        ] {
            let first = search(&graph, 's', *strategy).unwrap();
            let second = search(&graph, 's', *strategy).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn step_limit_stops_an_infinite_search() {
        let problem = FnProblem::new(|_: &u64| false, |n: &u64| vec![(n + 1, 1u64)]);
        let options = SearchOptions {
            limit: Some(100),
            ..SearchOptions::default()
        };

        match search_with(&problem, 0, Strategy::BreadthFirst, options) {
            Err(SearchError::StepLimitExhausted(n)) => assert_eq!(n, 100),
            other => panic!("Expected step limit, got {:?}", other),
        }
    }

    #[test]
    fn timeout_stops_an_infinite_search() {
        let problem = FnProblem::new(|_: &u64| false, |n: &u64| vec![(n + 1, 1u64)]);
        let options = SearchOptions {
            timeout: Some(Duration::from_millis(5)),
            ..SearchOptions::default()
        };

        let result = search_with(&problem, 0, Strategy::DepthFirst, options);
        assert!(matches!(result, Err(SearchError::TimeLimitExhausted(_))));
    }

    #[test_log::test]
    fn closures_solve_a_counting_problem() {
        // Reach 10 from 1 by doubling or adding one.
        let problem = FnProblem::new(
            |n: &u32| *n == 10,
            |n: &u32| vec![(n * 2, 1u32), (n + 1, 1u32)],
        )
        .with_heuristic(|n: &u32| if *n > 10 { 100 } else { 0 });

        let options = SearchOptions {
            verbose: Some(1),
            ..SearchOptions::default()
        };
        let solution = search_with(&problem, 1, Strategy::AStar, options).unwrap();
        assert_eq!(solution.path(), &[1, 2, 4, 5, 10]);
        assert_eq!(solution.cost(), 4);
    }
}
