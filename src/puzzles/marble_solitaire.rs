use anyhow::Error;
use log::info;
use searcher::{SearchError, SearchOptions, SearchProblem, SearchResult, Solution, Strategy};

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::cartesian::{Direction, Point};
use crate::puzzles::timed;
use crate::{LabError, Settings};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum Cell {
    Blocked,
    Hole,
    Marble,
}

impl Cell {
    fn parse(c: char) -> Result<Cell, LabError> {
        match c {
            'o' | 'O' | '1' => Ok(Cell::Marble),
            '.' | '0' => Ok(Cell::Hole),
            ' ' | '#' | 'x' => Ok(Cell::Blocked),
            _ => Err(LabError::InvalidInput(format!("Unknown cell: {:?}", c))),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Blocked => write!(f, " "),
            Cell::Hole => write!(f, "."),
            Cell::Marble => write!(f, "o"),
        }
    }
}

/// A peg solitaire board. The puzzle is solved when a single
/// marble remains, sitting in the centre.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub(crate) struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(LabError::InvalidInput("Empty board".to_string()).into());
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for line in lines {
            let mut width = 0;
            for c in line.chars() {
                cells.push(Cell::parse(c)?);
                width += 1;
            }
            cells.extend((width..cols).map(|_| Cell::Blocked));
        }

        Ok(Board { rows, cols, cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Board {
    /// The standard 33 hole cross shaped board, with only the centre empty.
    pub(crate) fn english() -> Board {
        let mut cells = Vec::with_capacity(49);
        for row in 0..7 {
            for col in 0..7 {
                let arm = (2..5).contains(&row) || (2..5).contains(&col);
                cells.push(match (arm, row == 3 && col == 3) {
                    (false, _) => Cell::Blocked,
                    (true, true) => Cell::Hole,
                    (true, false) => Cell::Marble,
                });
            }
        }
        Board {
            rows: 7,
            cols: 7,
            cells,
        }
    }

    fn centre(&self) -> Point {
        Point::from((self.rows / 2, self.cols / 2))
    }

    fn get(&self, point: Point) -> Option<Cell> {
        point
            .index(self.rows, self.cols)
            .map(|idx| self.cells[idx])
    }

    fn marbles(&self) -> impl Iterator<Item = Point> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Marble)
            .map(move |(i, _)| Point::from_index(i, cols))
    }

    fn remaining(&self) -> u32 {
        self.marbles().count() as u32
    }

    /// Total distance of every marble from the centre.
    fn spread(&self) -> u32 {
        let centre = self.centre();
        self.marbles().map(|p| p.manhattan(&centre) as u32).sum()
    }

    fn is_solved(&self) -> bool {
        self.remaining() == 1 && self.get(self.centre()) == Some(Cell::Marble)
    }

    /// Boards reachable by jumping one marble over a neighbour into a hole.
    fn jumps(&self) -> Vec<Board> {
        let mut boards = Vec::new();
        for from in self.marbles() {
            for direction in Direction::all().iter() {
                let over = from.step(*direction);
                let to = from.jump(*direction, 2);

                if self.get(over) != Some(Cell::Marble) || self.get(to) != Some(Cell::Hole) {
                    continue;
                }

                let mut next = self.clone();
                for (point, cell) in &[(from, Cell::Hole), (over, Cell::Hole), (to, Cell::Marble)] {
                    if let Some(idx) = point.index(self.rows, self.cols) {
                        next.cells[idx] = *cell;
                    }
                }
                boards.push(next);
            }
        }
        boards
    }
}

/// Estimates of how far a board is from being solved.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Heuristic {
    /// Marbles left on the board.
    Marbles,

    /// Summed distance of marbles from the centre.
    Manhattan,

    /// Both of the above.
    Combined,
}

impl Heuristic {
    fn estimate(self, board: &Board) -> u32 {
        match self {
            Heuristic::Marbles => board.remaining(),
            Heuristic::Manhattan => board.spread(),
            Heuristic::Combined => board.remaining() + board.spread(),
        }
    }
}

#[derive(Debug)]
struct Solitaire {
    heuristic: Heuristic,
}

impl SearchProblem for Solitaire {
    type State = Board;
    type Cost = u32;

    fn is_goal(&self, state: &Board) -> bool {
        state.is_solved()
    }

    fn successors(&self, state: &Board) -> Vec<(Board, u32)> {
        state.jumps().into_iter().map(|b| (b, 1)).collect()
    }

    fn heuristic(&self, state: &Board) -> u32 {
        self.heuristic.estimate(state)
    }
}

fn solve(
    board: &Board,
    heuristic: Heuristic,
    strategy: Strategy,
    options: SearchOptions,
) -> SearchResult<Solution<Board, u32>> {
    searcher::search_with(Solitaire { heuristic }, board.clone(), strategy, options)
}

const RUNS: [(&str, Heuristic, Strategy); 3] = [
    ("Best-first (marbles)", Heuristic::Marbles, Strategy::Greedy),
    ("Best-first (manhattan)", Heuristic::Manhattan, Strategy::Greedy),
    ("A* (marbles + manhattan)", Heuristic::Combined, Strategy::AStar),
];

pub(crate) fn main(mut input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let mut boards = Vec::new();
    let mut block = Vec::new();
    for line in text.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !block.is_empty() {
                boards.push(block.join("\n").parse::<Board>()?);
                block.clear();
            }
        } else {
            block.push(line);
        }
    }
    if boards.is_empty() {
        boards.push(Board::english());
    }

    for board in boards {
        print!("{}", board);
        println!("{} marbles", board.remaining());

        for (name, heuristic, strategy) in RUNS.iter() {
            let (outcome, elapsed) = timed(|| solve(&board, *heuristic, *strategy, settings.search_options()));
            match outcome {
                Ok(solution) => {
                    info!("{} expanded {} nodes in {:?}", name, solution.expanded(), elapsed);
                    println!(
                        "{}: {} jumps, {} nodes expanded, {:.3}s",
                        name,
                        solution.moves(),
                        solution.expanded(),
                        elapsed.as_secs_f64()
                    );
                }
                Err(SearchError::NoSolution(expanded)) => {
                    println!(
                        "{}: no solution after {} nodes, {:.3}s",
                        name,
                        expanded,
                        elapsed.as_secs_f64()
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const CROSS: &str = "  ...  \n  .o.  \n..ooo..\n...o...\n...o...\n  ...  \n  ...  ";

    #[test]
    fn parse_board() {
        let board: Board = CROSS.parse().unwrap();
        assert_eq!((board.rows, board.cols), (7, 7));
        assert_eq!(board.remaining(), 6);
        assert_eq!(board.get(Point::new(0, 0)), Some(Cell::Blocked));
        assert_eq!(board.get(Point::new(1, 3)), Some(Cell::Marble));

        assert!("oo?".parse::<Board>().is_err());
        assert!("\n\n".parse::<Board>().is_err());
    }

    #[test]
    fn english_board() {
        let board = Board::english();
        assert_eq!(board.remaining(), 32);
        assert_eq!(board.get(board.centre()), Some(Cell::Hole));
        assert_eq!(board.jumps().len(), 4);
        assert_eq!(board.to_string().lines().next(), Some("  ooo  "));
    }

    #[test]
    fn heuristics() {
        let board: Board = "o.o\n...\n..o".parse().unwrap();
        assert_eq!(Heuristic::Marbles.estimate(&board), 3);
        assert_eq!(Heuristic::Manhattan.estimate(&board), 6);
        assert_eq!(Heuristic::Combined.estimate(&board), 9);
    }

    #[test]
    fn single_jump_to_centre() {
        let board: Board = "oo...".parse().unwrap();
        for (_, heuristic, strategy) in RUNS.iter() {
            let solution = solve(&board, *heuristic, *strategy, SearchOptions::default()).unwrap();
            assert_eq!(solution.moves(), 1);
            assert!(solution.destination().unwrap().is_solved());
        }
    }

    #[test]
    fn cross_is_solved_by_every_search() {
        let board: Board = CROSS.parse().unwrap();
        for (_, heuristic, strategy) in RUNS.iter() {
            let solution = solve(&board, *heuristic, *strategy, SearchOptions::default()).unwrap();
            // Every jump removes one marble.
            assert_eq!(solution.moves(), 5);
            for pair in solution.path().windows(2) {
                assert!(pair[0].jumps().contains(&pair[1]));
            }
        }
    }

    #[test]
    fn stranded_marbles() {
        let board: Board = "o.o..".parse().unwrap();
        match solve(&board, Heuristic::Marbles, Strategy::Greedy, SearchOptions::default()) {
            Err(SearchError::NoSolution(expanded)) => assert_eq!(expanded, 1),
            other => panic!("Expected no solution, got {:?}", other),
        }
    }
}
