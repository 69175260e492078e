use anyhow::Error;
use searcher::{SearchError, SearchOptions, SearchProblem, SearchResult, Solution, Strategy};

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::{LabError, Settings};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum Bank {
    Left,
    Right,
}

/// Everyone still on the left bank, and where the boat is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) struct Crossing {
    missionaries: u32,
    cannibals: u32,
    boat: Bank,
}

/// A river crossing puzzle: ferry everyone across without
/// missionaries ever being outnumbered on either bank.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct River {
    missionaries: u32,
    cannibals: u32,
    capacity: u32,
}

impl FromStr for River {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers = s
            .split_whitespace()
            .map(|n| n.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()?;

        match numbers.as_slice() {
            [m, c] => Ok(River::new(*m, *c, 2)),
            [m, c, b] if *b > 0 => Ok(River::new(*m, *c, *b)),
            _ => Err(LabError::InvalidInput(format!(
                "Expected 'missionaries cannibals [capacity]', got {:?}",
                s
            ))
            .into()),
        }
    }
}

impl fmt::Display for River {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} missionaries, {} cannibals, boat for {}",
            self.missionaries, self.cannibals, self.capacity
        )
    }
}

impl River {
    fn new(missionaries: u32, cannibals: u32, capacity: u32) -> Self {
        Self {
            missionaries,
            cannibals,
            capacity,
        }
    }

    fn start(&self) -> Crossing {
        Crossing {
            missionaries: self.missionaries,
            cannibals: self.cannibals,
            boat: Bank::Left,
        }
    }

    fn is_safe(&self, missionaries: i64, cannibals: i64) -> bool {
        let (total_m, total_c) = (i64::from(self.missionaries), i64::from(self.cannibals));
        if missionaries < 0 || cannibals < 0 || missionaries > total_m || cannibals > total_c {
            return false;
        }

        let (right_m, right_c) = (total_m - missionaries, total_c - cannibals);
        (missionaries == 0 || missionaries >= cannibals) && (right_m == 0 || right_m >= right_c)
    }

    fn describe(&self, crossing: &Crossing) -> String {
        format!(
            "Left: {}M {}C | Right: {}M {}C | Boat: {:?}",
            crossing.missionaries,
            crossing.cannibals,
            self.missionaries - crossing.missionaries,
            self.cannibals - crossing.cannibals,
            crossing.boat
        )
    }
}

impl SearchProblem for River {
    type State = Crossing;
    type Cost = u32;

    fn is_goal(&self, state: &Crossing) -> bool {
        state.missionaries == 0 && state.cannibals == 0
    }

    fn successors(&self, state: &Crossing) -> Vec<(Crossing, u32)> {
        let (direction, boat) = match state.boat {
            Bank::Left => (-1, Bank::Right),
            Bank::Right => (1, Bank::Left),
        };

        let mut crossings = Vec::new();
        for m in 0..=self.capacity {
            for c in 0..=(self.capacity - m) {
                if m + c == 0 {
                    continue;
                }

                let left_m = i64::from(state.missionaries) + direction * i64::from(m);
                let left_c = i64::from(state.cannibals) + direction * i64::from(c);
                if self.is_safe(left_m, left_c) {
                    crossings.push((
                        Crossing {
                            missionaries: left_m as u32,
                            cannibals: left_c as u32,
                            boat,
                        },
                        1,
                    ));
                }
            }
        }
        crossings
    }
}

fn solve(river: &River, strategy: Strategy, options: SearchOptions) -> SearchResult<Solution<Crossing, u32>> {
    searcher::search_with(river, river.start(), strategy, options)
}

pub(crate) fn main(input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let reader = BufReader::new(input);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let river: River = line.parse()?;
        println!("{}", river);

        for (name, strategy) in &[("DFS", Strategy::DepthFirst), ("BFS", Strategy::BreadthFirst)] {
            match solve(&river, *strategy, settings.search_options()) {
                Ok(solution) => {
                    println!(
                        "{}: {} crossings, {} states visited",
                        name,
                        solution.moves(),
                        solution.expanded()
                    );
                    for crossing in solution.path() {
                        println!("  {}", river.describe(crossing));
                    }
                }
                Err(SearchError::NoSolution(visited)) => {
                    println!("{}: no solution, {} states visited", name, visited);
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

    #[test]
    fn parse_river() {
        assert_eq!("3 3".parse::<River>().unwrap(), River::new(3, 3, 2));
        assert_eq!("4 4 3".parse::<River>().unwrap(), River::new(4, 4, 3));
        assert!("3".parse::<River>().is_err());
        assert!("3 3 0".parse::<River>().is_err());
        assert!("three 3".parse::<River>().is_err());
    }

    #[test]
    fn first_crossings() {
        let river = River::new(3, 3, 2);
        let moves: Vec<(u32, u32)> = river
            .successors(&river.start())
            .into_iter()
            .map(|(c, _)| (c.missionaries, c.cannibals))
            .collect();
        // Sending one missionary alone leaves them outnumbered.
        assert_eq!(moves, vec![(3, 2), (3, 1), (2, 2)]);
    }

    #[test]
    fn classic_bfs() {
        let solution = solve(&River::new(3, 3, 2), Strategy::BreadthFirst, SearchOptions::default()).unwrap();
        assert_eq!(solution.moves(), 11);
    }

    #[test]
    fn classic_dfs() {
        let river = River::new(3, 3, 2);
        let solution = solve(&river, Strategy::DepthFirst, SearchOptions::default()).unwrap();
        assert!(solution.moves() >= 11);
        assert!(river.is_goal(solution.destination().unwrap()));
        for crossing in solution.path() {
            assert!(river.is_safe(crossing.missionaries.into(), crossing.cannibals.into()));
        }
    }

    #[test]
    fn bigger_boat() {
        let solution = solve(&River::new(4, 4, 3), Strategy::BreadthFirst, SearchOptions::default()).unwrap();
        assert_eq!(solution.moves(), 9);
    }

    #[test]
    fn four_couples_cannot_cross_in_pairs() {
        for strategy in &[Strategy::BreadthFirst, Strategy::DepthFirst] {
            match solve(&River::new(4, 4, 2), *strategy, SearchOptions::default()) {
                Err(SearchError::NoSolution(visited)) => assert_eq!(visited, 11),
                other => panic!("Expected no solution, got {:?}", other),
            }
        }
    }
}
