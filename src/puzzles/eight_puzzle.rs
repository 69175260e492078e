use anyhow::Error;
use log::info;
use num::Integer;
use searcher::{SearchOptions, SearchProblem, SearchResult, Solution, Strategy};

use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::cartesian::{Direction, Point};
use crate::puzzles::timed;
use crate::{LabError, Settings};

const SIDE: usize = 3;
const TILES: usize = SIDE * SIDE;
const BLANK: u8 = 0;

/// Tiles in row-major order, with zero for the blank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) struct Board([u8; TILES]);

impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiles = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid(s))?;

        if tiles.len() != TILES {
            return Err(invalid(s).into());
        }

        let distinct: HashSet<u8> = tiles.iter().copied().collect();
        if distinct.len() != TILES || tiles.iter().any(|t| *t as usize >= TILES) {
            return Err(invalid(s).into());
        }

        let mut board = [BLANK; TILES];
        board.copy_from_slice(&tiles);
        Ok(Board(board))
    }
}

fn invalid(s: &str) -> LabError {
    LabError::InvalidInput(format!(
        "Expected 9 numbers from 0 to 8 without duplicates, got {:?}",
        s
    ))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.chunks(SIDE) {
            for (i, tile) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                match *tile {
                    BLANK => write!(f, "_")?,
                    t => write!(f, "{}", t)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Board {
    pub(crate) fn solved() -> Board {
        Board([1, 2, 3, 4, 5, 6, 7, 8, BLANK])
    }

    fn blank(&self) -> Point {
        let idx = self.0.iter().position(|t| *t == BLANK).unwrap_or_default();
        Point::from_index(idx, SIDE)
    }

    /// Only boards with an even number of inversions can reach the solved board.
    pub(crate) fn is_solvable(&self) -> bool {
        let tiles: Vec<u8> = self.0.iter().copied().filter(|t| *t != BLANK).collect();
        let inversions: usize = tiles
            .iter()
            .enumerate()
            .map(|(i, a)| tiles[i + 1..].iter().filter(|b| a > *b).count())
            .sum();
        inversions.is_even()
    }

    /// Boards reachable by sliding one tile into the blank.
    fn slides(&self) -> Vec<Board> {
        let blank = self.blank();
        let from = match blank.index(SIDE, SIDE) {
            Some(idx) => idx,
            None => return Vec::new(),
        };

        Direction::all()
            .iter()
            .filter_map(|d| blank.step(*d).index(SIDE, SIDE))
            .map(|to| {
                let mut next = *self;
                next.0.swap(from, to);
                next
            })
            .collect()
    }

    /// Sum of the distance of each tile from its home.
    fn manhattan(&self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, t)| **t != BLANK)
            .map(|(i, t)| {
                let here = Point::from_index(i, SIDE);
                let home = Point::from_index(*t as usize - 1, SIDE);
                here.manhattan(&home) as u32
            })
            .sum()
    }
}

#[derive(Debug)]
struct SlidingPuzzle;

impl SearchProblem for SlidingPuzzle {
    type State = Board;
    type Cost = u32;

    fn is_goal(&self, state: &Board) -> bool {
        *state == Board::solved()
    }

    fn successors(&self, state: &Board) -> Vec<(Board, u32)> {
        state.slides().into_iter().map(|b| (b, 1)).collect()
    }

    fn heuristic(&self, state: &Board) -> u32 {
        state.manhattan()
    }
}

fn solve(board: Board, strategy: Strategy, options: SearchOptions) -> SearchResult<Solution<Board, u32>> {
    searcher::search_with(SlidingPuzzle, board, strategy, options)
}

pub(crate) fn main(input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let reader = BufReader::new(input);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let board: Board = line.parse()?;
        print!("{}", board);

        if !board.is_solvable() {
            println!("This board is not solvable.");
            continue;
        }

        let mut steps = Vec::new();
        for (name, strategy) in &[
            ("A*", Strategy::AStar),
            ("BFS", Strategy::BreadthFirst),
            ("DFS", Strategy::DepthFirst),
        ] {
            let (solution, elapsed) = timed(|| solve(board, *strategy, settings.search_options()));
            let solution = solution?;
            info!("{} expanded {} nodes in {:?}", name, solution.expanded(), elapsed);
            println!(
                "{}: {} moves, {} nodes expanded, {:.3}s",
                name,
                solution.moves(),
                solution.expanded(),
                elapsed.as_secs_f64()
            );
            if *strategy == Strategy::AStar {
                steps = solution.into_path();
            }
        }

        for (step, board) in steps.iter().enumerate().skip(1) {
            println!("Step {}:", step);
            print!("{}", board);
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn adjacent(a: &Board, b: &Board) -> bool {
        a.slides().contains(b)
    }

    #[test]
    fn parse_board() {
        assert_eq!(board("1 2 3 4 5 6 7 8 0"), Board::solved());
        assert_eq!(board("1,2,3, 4,5,6, 7,8,0"), Board::solved());
        assert_eq!(format!("{}", Board::solved()), "1 2 3\n4 5 6\n7 8 _\n");
    }

    #[test]
    fn reject_bad_boards() {
        assert!("1 2 3 4 5 6 7 8".parse::<Board>().is_err());
        assert!("1 2 3 4 5 6 7 8 0 0".parse::<Board>().is_err());
        assert!("1 1 3 4 5 6 7 8 0".parse::<Board>().is_err());
        assert!("1 2 3 4 5 6 7 9 0".parse::<Board>().is_err());
        assert!("1 2 3 4 5 6 7 x 0".parse::<Board>().is_err());
    }

    #[test]
    fn solvability() {
        assert!(Board::solved().is_solvable());
        assert!(board("8 6 7 2 5 4 3 0 1").is_solvable());
        assert!(!board("1 2 3 4 5 6 8 7 0").is_solvable());
        assert!(!board("2 1 3 4 5 6 7 8 0").is_solvable());
    }

    #[test]
    fn slides_from_corner_and_centre() {
        assert_eq!(Board::solved().slides().len(), 2);
        assert_eq!(board("1 2 3 4 0 5 6 7 8").slides().len(), 4);
        assert_eq!(board("1 0 3 4 2 5 6 7 8").slides().len(), 3);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Board::solved().manhattan(), 0);
        assert_eq!(board("1 2 3 4 5 6 0 7 8").manhattan(), 2);
        assert_eq!(board("8 6 7 2 5 4 3 0 1").manhattan(), 21);
    }

    #[test]
    fn solved_board_needs_no_moves() {
        let solution = solve(Board::solved(), Strategy::BreadthFirst, SearchOptions::default()).unwrap();
        assert_eq!(solution.moves(), 0);
        assert_eq!(solution.expanded(), 1);
    }

    #[test]
    fn astar_matches_bfs() {
        for (start, moves) in &[
            ("1 2 3 4 5 6 0 7 8", 2),
            ("1 2 3 0 4 6 7 5 8", 3),
            ("4 1 3 7 2 6 0 5 8", 6),
        ] {
            let bfs = solve(board(start), Strategy::BreadthFirst, SearchOptions::default()).unwrap();
            let astar = solve(board(start), Strategy::AStar, SearchOptions::default()).unwrap();
            assert_eq!(bfs.moves(), *moves);
            assert_eq!(astar.moves(), *moves);
            assert!(astar.expanded() <= bfs.expanded());
        }
    }

    #[test]
    fn hardest_board() {
        let solution = solve(board("8 6 7 2 5 4 3 0 1"), Strategy::AStar, SearchOptions::default()).unwrap();
        assert_eq!(solution.moves(), 31);
        assert_eq!(solution.cost(), 31);
    }

    #[test]
    fn dfs_finds_a_valid_path() {
        let solution = solve(board("1 2 3 4 5 6 0 7 8"), Strategy::DepthFirst, SearchOptions::default()).unwrap();
        assert_eq!(solution.destination(), Some(&Board::solved()));
        for pair in solution.path().windows(2) {
            assert!(adjacent(&pair[0], &pair[1]));
        }
    }
}
