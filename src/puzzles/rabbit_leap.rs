use anyhow::Error;
use log::info;
use searcher::{SearchOptions, SearchProblem, SearchResult, Solution, Strategy};

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::{LabError, Settings};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum Stone {
    East,
    West,
    Empty,
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::East => write!(f, "E"),
            Stone::West => write!(f, "W"),
            Stone::Empty => write!(f, "_"),
        }
    }
}

/// A row of stepping stones with rabbits facing each other,
/// and a single empty stone.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub(crate) struct Pond(Vec<Stone>);

impl FromStr for Pond {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stones = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'E' | 'e' => Ok(Stone::East),
                'W' | 'w' => Ok(Stone::West),
                '_' | '.' => Ok(Stone::Empty),
                _ => Err(LabError::InvalidInput(format!("Unknown stone: {}", c))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let empty = stones.iter().filter(|s| **s == Stone::Empty).count();
        if empty != 1 {
            return Err(LabError::InvalidInput(format!(
                "Expected exactly one empty stone, found {}",
                empty
            ))
            .into());
        }

        Ok(Pond(stones))
    }
}

impl fmt::Display for Pond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stone in &self.0 {
            write!(f, "{}", stone)?;
        }
        Ok(())
    }
}

impl Pond {
    fn empty(&self) -> usize {
        self.0
            .iter()
            .position(|s| *s == Stone::Empty)
            .unwrap_or_default()
    }

    /// The pond with every rabbit on the far side.
    fn mirrored(&self) -> Pond {
        Pond(self.0.iter().rev().copied().collect())
    }

    /// A rabbit may step into the empty stone next to it,
    /// or leap over one rabbit into it.
    fn leaps(&self) -> Vec<Pond> {
        let empty = self.empty() as isize;
        let mut ponds = Vec::with_capacity(4);

        for offset in &[-1, 1, -2, 2] {
            let from = empty + offset;
            if from < 0 || from as usize >= self.0.len() {
                continue;
            }

            let mut next = self.clone();
            next.0.swap(empty as usize, from as usize);
            ponds.push(next);
        }

        ponds
    }
}

#[derive(Debug)]
struct Leapfrog {
    goal: Pond,
}

impl SearchProblem for Leapfrog {
    type State = Pond;
    type Cost = usize;

    fn is_goal(&self, state: &Pond) -> bool {
        *state == self.goal
    }

    fn successors(&self, state: &Pond) -> Vec<(Pond, usize)> {
        state.leaps().into_iter().map(|p| (p, 1)).collect()
    }
}

fn solve(
    pond: &Pond,
    strategy: Strategy,
    options: SearchOptions,
) -> SearchResult<Solution<Pond, usize>> {
    let problem = Leapfrog {
        goal: pond.mirrored(),
    };
    searcher::search_with(&problem, pond.clone(), strategy, options)
}

pub(crate) fn main(input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let reader = BufReader::new(input);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let pond: Pond = line.parse()?;
        println!("Pond {}", pond);

        for (name, strategy) in &[("BFS", Strategy::BreadthFirst), ("DFS", Strategy::DepthFirst)] {
            let solution = solve(&pond, *strategy, settings.search_options())?;
            info!("{} expanded {} nodes", name, solution.expanded());
            println!(
                "{}: {} moves, {} nodes expanded",
                name,
                solution.moves(),
                solution.expanded()
            );
            for step in solution.path() {
                println!("  {}", step);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_path(path: &[Pond]) {
        for pair in path.windows(2) {
            assert!(pair[0].leaps().contains(&pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn parse_pond() {
        let pond: Pond = "E E E _ W W W".parse().unwrap();
        assert_eq!(pond.to_string(), "EEE_WWW");
        assert_eq!(pond.mirrored().to_string(), "WWW_EEE");
        assert_eq!(pond.leaps().len(), 4);

        assert!("EE_W_W".parse::<Pond>().is_err());
        assert!("EEWW".parse::<Pond>().is_err());
        assert!("EEXWW_".parse::<Pond>().is_err());
    }

    #[test]
    fn leaps_at_the_edge() {
        let pond: Pond = "_EW".parse().unwrap();
        let leaps: Vec<String> = pond.leaps().iter().map(|p| p.to_string()).collect();
        assert_eq!(leaps, vec!["E_W", "WE_"]);
    }

    #[test]
    fn examples_small() {
        let pond: Pond = "E_W".parse().unwrap();
        let solution = solve(&pond, Strategy::BreadthFirst, SearchOptions::default()).unwrap();
        assert_eq!(solution.path().len(), 4);

        let pond: Pond = "EE_WW".parse().unwrap();
        let solution = solve(&pond, Strategy::BreadthFirst, SearchOptions::default()).unwrap();
        assert_eq!(solution.path().len(), 9);
        check_path(solution.path());
    }

    #[test]
    fn three_against_three_bfs() {
        let pond: Pond = "EEE_WWW".parse().unwrap();
        let solution = solve(&pond, Strategy::BreadthFirst, SearchOptions::default()).unwrap();

        // 15 moves is the known minimum for three rabbits a side.
        assert_eq!(solution.path().len(), 16);
        assert_eq!(solution.moves(), 15);
        assert_eq!(solution.path()[0], pond);
        assert_eq!(solution.destination().unwrap().to_string(), "WWW_EEE");
        check_path(solution.path());
    }

    #[test]
    fn three_against_three_dfs() {
        let pond: Pond = "EEE_WWW".parse().unwrap();
        let solution = solve(&pond, Strategy::DepthFirst, SearchOptions::default()).unwrap();
        assert!(solution.moves() >= 15);
        assert_eq!(solution.destination().unwrap().to_string(), "WWW_EEE");
        check_path(solution.path());
    }
}
