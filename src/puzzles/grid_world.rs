use anyhow::Error;
use log::{debug, info, warn};

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::cartesian::{Direction, Point};
use crate::{LabError, Settings};

const INTENDED: f64 = 0.8;
const SLIP: f64 = 0.1;

/// A grid shaped Markov decision process.
///
/// Every action moves in the chosen direction with probability 0.8,
/// and slips to either side with probability 0.1 each. Moving off the
/// grid leaves the agent where it was. Rewards are collected on
/// entering a cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GridWorld {
    rows: usize,
    cols: usize,
    gamma: f64,
    living: f64,
    tolerance: f64,
    terminals: HashMap<Point, f64>,
}

impl Default for GridWorld {
    fn default() -> Self {
        let mut terminals = HashMap::new();
        terminals.insert(Point::new(3, 1), -1.0);
        terminals.insert(Point::new(3, 2), 1.0);
        Self {
            rows: 4,
            cols: 3,
            gamma: 0.9,
            living: -0.04,
            tolerance: 1e-6,
            terminals,
        }
    }
}

fn number<T: FromStr>(line: &str, word: Option<&str>) -> Result<T, LabError> {
    word.and_then(|w| w.parse().ok())
        .ok_or_else(|| LabError::InvalidInput(format!("Can't parse {:?}", line)))
}

impl FromStr for GridWorld {
    type Err = Error;

    /// Reads `key value` lines on top of the default world. A `terminal
    /// ROW COL REWARD` line replaces the default terminals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut world = GridWorld::default();
        let mut terminals = HashMap::new();

        for line in s.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut words = line.split_whitespace();
            match words.next() {
                Some("rows") => world.rows = number(line, words.next())?,
                Some("cols") => world.cols = number(line, words.next())?,
                Some("gamma") => world.gamma = number(line, words.next())?,
                Some("reward") => world.living = number(line, words.next())?,
                Some("tolerance") => world.tolerance = number(line, words.next())?,
                Some("terminal") => {
                    let row = number(line, words.next())?;
                    let col = number(line, words.next())?;
                    let reward = number(line, words.next())?;
                    terminals.insert(Point::new(row, col), reward);
                }
                _ => return Err(LabError::InvalidInput(format!("Unknown setting {:?}", line)).into()),
            }
        }

        if !terminals.is_empty() {
            world.terminals = terminals;
        }
        world.validate()?;
        Ok(world)
    }
}

impl GridWorld {
    fn validate(&self) -> Result<(), LabError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(LabError::InvalidInput("The grid must not be empty".to_string()));
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(LabError::InvalidInput(format!(
                "Discount must be in [0, 1), got {}",
                self.gamma
            )));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(LabError::InvalidInput(format!(
                "Tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if let Some(p) = self
            .terminals
            .keys()
            .find(|p| p.index(self.rows, self.cols).is_none())
        {
            return Err(LabError::InvalidInput(format!("Terminal {} is off the grid", p)));
        }
        Ok(())
    }

    fn cells(&self) -> usize {
        self.rows * self.cols
    }

    fn reward(&self, cell: Point) -> f64 {
        self.terminals.get(&cell).copied().unwrap_or(self.living)
    }

    fn is_terminal(&self, cell: Point) -> bool {
        self.terminals.contains_key(&cell)
    }

    fn step(&self, cell: Point, direction: Direction) -> Point {
        let next = cell.step(direction);
        match next.index(self.rows, self.cols) {
            Some(_) => next,
            None => cell,
        }
    }

    /// Possible outcomes of an action, with their probabilities.
    fn transitions(&self, cell: Point, direction: Direction) -> Vec<(f64, Point)> {
        let mut outcomes = vec![(INTENDED, self.step(cell, direction))];
        for side in direction.orthogonal().iter() {
            outcomes.push((SLIP, self.step(cell, *side)));
        }
        outcomes
    }

    fn q_value(&self, values: &[f64], cell: Point, direction: Direction) -> f64 {
        self.transitions(cell, direction)
            .into_iter()
            .map(|(p, next)| {
                let idx = next.index(self.rows, self.cols).unwrap_or_default();
                p * (self.reward(next) + self.gamma * values[idx])
            })
            .sum()
    }

    /// The best action from a cell, and its expected value.
    fn best(&self, values: &[f64], cell: Point) -> (Direction, f64) {
        let mut best = (Direction::Up, f64::NEG_INFINITY);
        for direction in Direction::all().iter() {
            let q = self.q_value(values, cell, *direction);
            if q > best.1 {
                best = (*direction, q);
            }
        }
        best
    }

    /// Value iteration, sweeping until no value moves by more than the
    /// tolerance or `limit` sweeps have been made.
    pub(crate) fn value_iteration(&self, limit: Option<usize>, verbose: Option<usize>) -> Values {
        let mut values = vec![0.0; self.cells()];
        let mut sweeps = 0;

        loop {
            if limit.map_or(false, |l| sweeps >= l) {
                warn!("Stopped after {} sweeps without converging", sweeps);
                return Values {
                    values,
                    sweeps,
                    converged: false,
                };
            }

            let mut next = values.clone();
            for (idx, value) in next.iter_mut().enumerate() {
                let cell = Point::from_index(idx, self.cols);
                if !self.is_terminal(cell) {
                    *value = self.best(&values, cell).1;
                }
            }

            let delta = next
                .iter()
                .zip(values.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            values = next;
            sweeps += 1;

            if let Some(every) = verbose {
                if every > 0 && sweeps % every == 0 {
                    debug!("Sweep {} delta {:e}", sweeps, delta);
                }
            }

            if delta <= self.tolerance {
                return Values {
                    values,
                    sweeps,
                    converged: true,
                };
            }
        }
    }

    /// The greedy action in every non-terminal cell.
    pub(crate) fn policy(&self, values: &Values) -> Vec<Option<Direction>> {
        (0..self.cells())
            .map(|idx| {
                let cell = Point::from_index(idx, self.cols);
                if self.is_terminal(cell) {
                    None
                } else {
                    Some(self.best(&values.values, cell).0)
                }
            })
            .collect()
    }
}

/// State values found by value iteration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Values {
    values: Vec<f64>,
    sweeps: usize,
    converged: bool,
}

impl Values {
    fn rows<'v>(&'v self, cols: usize) -> impl Iterator<Item = &'v [f64]> + 'v {
        self.values.chunks(cols)
    }
}

struct Arrows<'p>(&'p [Option<Direction>], usize);

impl<'p> fmt::Display for Arrows<'p> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.chunks(self.1) {
            for action in row {
                let arrow = match action {
                    Some(Direction::Up) => '^',
                    Some(Direction::Down) => 'v',
                    Some(Direction::Left) => '<',
                    Some(Direction::Right) => '>',
                    None => '*',
                };
                write!(f, "{}", arrow)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub(crate) fn main(mut input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let world: GridWorld = text.parse()?;

    let values = world.value_iteration(settings.limit, settings.verbose);
    info!(
        "Value iteration {} after {} sweeps",
        if values.converged { "converged" } else { "stopped" },
        values.sweeps
    );

    println!("Value function after {} sweeps:", values.sweeps);
    for row in values.rows(world.cols) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>8.4}", v)).collect();
        println!("{}", cells.join(" "));
    }

    println!("Policy:");
    print!("{}", Arrows(&world.policy(&values), world.cols));

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn transitions_are_distributions() {
        let world = GridWorld::default();
        for idx in 0..world.cells() {
            let cell = Point::from_index(idx, world.cols);
            for direction in Direction::all().iter() {
                let outcomes = world.transitions(cell, *direction);
                let total: f64 = outcomes.iter().map(|(p, _)| p).sum();
                assert!(close(total, 1.0));
                assert!(outcomes.iter().all(|(_, p)| p.index(world.rows, world.cols).is_some()));
            }
        }
    }

    #[test]
    fn walls_bounce_back() {
        let world = GridWorld::default();
        let corner = Point::new(0, 0);
        assert_eq!(world.step(corner, Direction::Up), corner);
        assert_eq!(world.step(corner, Direction::Right), Point::new(0, 1));
    }

    #[test]
    fn value_iteration_converges() {
        let world = GridWorld::default();
        let values = world.value_iteration(None, None);
        assert!(values.converged);
        assert!(values.sweeps < 100);

        assert_eq!(values.values[10], 0.0);
        assert_eq!(values.values[11], 0.0);
        assert!(close(values.values[0], 0.3877));
        assert!(close(values.values[8], 0.9283));
        assert!(close(values.values[9], 0.2000));
    }

    #[test]
    fn policy_heads_for_the_reward() {
        let world = GridWorld::default();
        let values = world.value_iteration(None, None);
        let policy = world.policy(&values);

        assert_eq!(policy[0], Some(Direction::Right));
        assert_eq!(policy[2], Some(Direction::Down));
        assert_eq!(policy[8], Some(Direction::Down));
        assert_eq!(policy[9], Some(Direction::Up));
        assert_eq!(policy[10], None);
        assert_eq!(policy[11], None);
        assert_eq!(Arrows(&policy, world.cols).to_string(), ">>v\n>>v\n>>v\n^**\n");
    }

    #[test]
    fn sweep_limit() {
        let values = GridWorld::default().value_iteration(Some(3), None);
        assert!(!values.converged);
        assert_eq!(values.sweeps, 3);
    }

    #[test]
    fn parse_world() {
        let world: GridWorld = "gamma 0.5\n# comment\nterminal 0 2 10\n".parse().unwrap();
        assert_eq!(world.gamma, 0.5);
        assert_eq!(world.terminals.len(), 1);
        assert_eq!(world.reward(Point::new(0, 2)), 10.0);
        assert_eq!(world.reward(Point::new(3, 2)), -0.04);

        assert_eq!("".parse::<GridWorld>().unwrap(), GridWorld::default());
        assert!("gamma 1.5".parse::<GridWorld>().is_err());
        assert!("terminal 9 9 1".parse::<GridWorld>().is_err());
        assert!("rows".parse::<GridWorld>().is_err());
        assert!("wind 3".parse::<GridWorld>().is_err());
    }
}
