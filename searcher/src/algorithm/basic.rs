pub use bfs::bfs;
pub use dfs::dfs;

pub(crate) mod bfs {
    use std::collections::VecDeque;

    use crate::algorithm::cache::VisitedSet;
    use crate::algorithm::{Pending, SearchAlgorithm, SearchQueue, Solution, Strategy};
    use crate::errors::Result;
    use crate::SearchProblem;

    #[derive(Debug)]
    pub struct BreadthQueue<S> {
        queue: VecDeque<S>,
    }

    impl<S> SearchQueue for BreadthQueue<S> {
        type Candidate = S;

        fn pop(&mut self) -> Option<Self::Candidate> {
            self.queue.pop_front()
        }

        fn push(&mut self, item: Self::Candidate) {
            self.queue.push_back(item);
        }

        fn len(&self) -> usize {
            self.queue.len()
        }
    }

    impl<S> Default for BreadthQueue<S> {
        fn default() -> Self {
            BreadthQueue {
                queue: VecDeque::new(),
            }
        }
    }

    pub type BreadthFirstSearcher<P> = SearchAlgorithm<
        P,
        BreadthQueue<Pending<<P as SearchProblem>::Cost>>,
        VisitedSet<<P as SearchProblem>::State, <P as SearchProblem>::Cost>,
    >;

    pub fn build<P>(problem: P, origin: P::State) -> BreadthFirstSearcher<P>
    where
        P: SearchProblem,
    {
        SearchAlgorithm::new(problem, origin, Strategy::BreadthFirst)
    }

    /// Breadth-first search, where ties are broken by the order
    /// of states returned by [SearchProblem::successors].
    ///
    /// Finds a path with the fewest steps, whatever the step costs.
    pub fn bfs<P>(problem: P, origin: P::State) -> Result<Solution<P::State, P::Cost>>
    where
        P: SearchProblem,
    {
        build(problem, origin).run()
    }
}

pub(crate) mod dfs {
    use std::collections::VecDeque;

    use crate::algorithm::cache::VisitedSet;
    use crate::algorithm::{Pending, SearchAlgorithm, SearchQueue, Solution, Strategy};
    use crate::errors::Result;
    use crate::SearchProblem;

    #[derive(Debug)]
    pub struct DepthQueue<S> {
        queue: VecDeque<S>,
    }

    impl<S> Default for DepthQueue<S> {
        fn default() -> Self {
            DepthQueue {
                queue: VecDeque::new(),
            }
        }
    }

    impl<S> SearchQueue for DepthQueue<S> {
        type Candidate = S;

        fn pop(&mut self) -> Option<Self::Candidate> {
            self.queue.pop_front()
        }

        fn push(&mut self, item: Self::Candidate) {
            self.queue.push_front(item);
        }

        fn len(&self) -> usize {
            self.queue.len()
        }
    }

    pub type DepthFirstSearcher<P> = SearchAlgorithm<
        P,
        DepthQueue<Pending<<P as SearchProblem>::Cost>>,
        VisitedSet<<P as SearchProblem>::State, <P as SearchProblem>::Cost>,
    >;

    pub fn build<P>(problem: P, origin: P::State) -> DepthFirstSearcher<P>
    where
        P: SearchProblem,
    {
        SearchAlgorithm::new(problem, origin, Strategy::DepthFirst)
    }

    /// Depth-first search, which follows the most recently
    /// discovered state first. The last successor returned by
    /// [SearchProblem::successors] is explored first.
    pub fn dfs<P>(problem: P, origin: P::State) -> Result<Solution<P::State, P::Cost>>
    where
        P: SearchProblem,
    {
        build(problem, origin).run()
    }
}
