use anyhow::Error;
use lazy_static::lazy_static;
use log::{debug, info};
use optimizer::{Neighborhood, Objective, OptimizeError, OptimizeOptions, OptimizeResult, Scored, Strategy};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::{LabError, Settings};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct Literal {
    variable: usize,
    negated: bool,
}

impl Literal {
    fn value(&self, assignment: &Assignment) -> bool {
        assignment.0[self.variable] != self.negated
    }
}

/// A disjunction of literals.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Clause(Vec<Literal>);

impl Clause {
    fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.0.iter().any(|l| l.value(assignment))
    }
}

/// A boolean formula in conjunctive normal form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Formula {
    names: Vec<String>,
    clauses: Vec<Clause>,
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref AND: Regex = Regex::new(r"∧|&|\bAND\b|\band\b").unwrap();
            static ref OR: Regex = Regex::new(r"∨|\||\bOR\b|\bor\b").unwrap();
            static ref LITERAL: Regex = Regex::new(r"^(-|!|¬|~)?\s*([A-Za-z_][A-Za-z0-9_]*)$").unwrap();
        }

        let mut names = Vec::new();
        let mut indices: HashMap<String, usize> = HashMap::new();
        let mut clauses = Vec::new();

        for clause in AND.split(s) {
            let clause = clause.trim().trim_start_matches('(').trim_end_matches(')').trim();
            if clause.is_empty() {
                return Err(LabError::InvalidInput(format!("Empty clause in {:?}", s)).into());
            }

            let mut literals = Vec::new();
            for literal in OR.split(clause) {
                let cap = LITERAL
                    .captures(literal.trim())
                    .ok_or_else(|| LabError::InvalidInput(format!("Can't parse literal {:?}", literal)))?;

                let name = &cap[2];
                let variable = *indices.entry(name.to_string()).or_insert_with(|| {
                    names.push(name.to_string());
                    names.len() - 1
                });
                literals.push(Literal {
                    variable,
                    negated: cap.get(1).is_some(),
                });
            }
            clauses.push(Clause(literals));
        }

        Ok(Formula { names, clauses })
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "(")?;
            for (j, literal) in clause.0.iter().enumerate() {
                if j > 0 {
                    write!(f, " ∨ ")?;
                }
                if literal.negated {
                    write!(f, "-")?;
                }
                write!(f, "{}", self.names[literal.variable])?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl Formula {
    /// A random k-SAT formula over `n` variables with `m` clauses.
    ///
    /// Every clause mentions `k` distinct variables, each negated with
    /// even odds. Variables are named `a` to `z` while there are few
    /// enough of them.
    pub(crate) fn random<R>(k: usize, m: usize, n: usize, rng: &mut R) -> Result<Formula, LabError>
    where
        R: Rng + ?Sized,
    {
        if k == 0 || k > n {
            return Err(LabError::InvalidInput(format!(
                "Clauses of {} distinct variables can't be drawn from {}",
                k, n
            )));
        }

        let names = (0..n)
            .map(|i| {
                if n <= 26 {
                    ((b'a' + i as u8) as char).to_string()
                } else {
                    format!("v{}", i + 1)
                }
            })
            .collect();

        let mut variables: Vec<usize> = (0..n).collect();
        let clauses = (0..m)
            .map(|_| {
                variables.shuffle(rng);
                Clause(
                    variables[..k]
                        .iter()
                        .map(|v| Literal {
                            variable: *v,
                            negated: rng.random_bool(0.5),
                        })
                        .collect(),
                )
            })
            .collect();

        Ok(Formula { names, clauses })
    }

    pub(crate) fn variables(&self) -> usize {
        self.names.len()
    }

    fn unsatisfied(&self, assignment: &Assignment) -> usize {
        self.clauses
            .iter()
            .filter(|c| !c.is_satisfied(assignment))
            .count()
    }

    pub(crate) fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.unsatisfied(assignment) == 0
    }

    fn describe(&self, assignment: &Assignment) -> String {
        self.names
            .iter()
            .zip(assignment.0.iter())
            .map(|(name, value)| format!("{}={}", name, *value as u8))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A truth value for every variable of a formula.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub(crate) struct Assignment(Vec<bool>);

impl Assignment {
    fn random<R>(variables: usize, rng: &mut R) -> Assignment
    where
        R: Rng + ?Sized,
    {
        Assignment((0..variables).map(|_| rng.random_bool(0.5)).collect())
    }

    fn flipped(&self, variables: &[usize]) -> Assignment {
        let mut next = self.clone();
        for v in variables {
            next.0[*v] = !next.0[*v];
        }
        next
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in &self.0 {
            write!(f, "{}", *value as u8)?;
        }
        Ok(())
    }
}

/// Every assignment one variable away.
pub(crate) fn flip_one(assignment: &Assignment) -> Vec<Assignment> {
    let n = assignment.0.len();
    (0..n).map(|i| assignment.flipped(&[i])).collect()
}

/// Every assignment with exactly two variables flipped.
pub(crate) fn flip_two(assignment: &Assignment) -> Vec<Assignment> {
    let n = assignment.0.len();
    let mut neighbors = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            neighbors.push(assignment.flipped(&[i, j]));
        }
    }
    neighbors
}

/// Every assignment with exactly three variables flipped.
pub(crate) fn flip_three(assignment: &Assignment) -> Vec<Assignment> {
    let n = assignment.0.len();
    let mut neighbors = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                neighbors.push(assignment.flipped(&[i, j, k]));
            }
        }
    }
    neighbors
}

/// Counts unsatisfied clauses; any assignment scoring zero is a model.
#[derive(Debug)]
struct Satisfiability<'f> {
    formula: &'f Formula,
}

impl<'f> Objective for Satisfiability<'f> {
    type Candidate = Assignment;
    type Quality = usize;

    fn quality(&self, candidate: &Assignment) -> usize {
        self.formula.unsatisfied(candidate)
    }

    fn neighbors(&self, candidate: &Assignment) -> Vec<Assignment> {
        flip_one(candidate)
    }

    fn target(&self) -> Option<usize> {
        Some(0)
    }
}

type Outcome = OptimizeResult<Scored<Assignment, usize>>;

/// Hill climbing, restarting from a fresh random assignment whenever
/// it gets stuck.
fn climb_with_restarts<R>(formula: &Formula, restarts: usize, settings: &Settings, rng: &mut R) -> Outcome
where
    R: Rng + ?Sized,
{
    let objective = Satisfiability { formula };
    let mut attempt = 0;

    loop {
        let start = Assignment::random(formula.variables(), rng);
        match optimizer::hill_climb(&objective, start, settings.optimize_options()) {
            Err(OptimizeError::LocalOptimumReached(_)) if attempt < restarts => {
                attempt += 1;
                debug!("Restart {} after a local optimum", attempt);
            }
            outcome => return outcome,
        }
    }
}

fn beam<R>(formula: &Formula, width: usize, options: OptimizeOptions, rng: &mut R) -> Outcome
where
    R: Rng + ?Sized,
{
    let objective = Satisfiability { formula };
    let initial = (0..width.max(1))
        .map(|_| Assignment::random(formula.variables(), rng))
        .collect();
    optimizer::optimize(&objective, initial, Strategy::Beam { width }, options, rng)
}

fn vnd<R>(formula: &Formula, options: OptimizeOptions, rng: &mut R) -> Outcome
where
    R: Rng + ?Sized,
{
    let objective = Satisfiability { formula };
    let neighborhoods: [Neighborhood<'_, Assignment>; 3] = [&flip_one, &flip_two, &flip_three];
    let initial = vec![Assignment::random(formula.variables(), rng)];
    optimizer::optimize(&objective, initial, Strategy::Vnd(&neighborhoods), options, rng)
}

const RESTARTS: usize = 20;

/// Reads either a formula, or `random k m n` to generate one.
fn read_formula<R>(line: &str, rng: &mut R) -> Result<Formula, Error>
where
    R: Rng + ?Sized,
{
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["random", k, m, n] => Ok(Formula::random(k.parse()?, m.parse()?, n.parse()?, rng)?),
        _ => line.parse(),
    }
}

fn report(name: &str, formula: &Formula, outcome: Outcome) {
    match outcome {
        Ok(scored) => {
            info!("{} satisfied the formula", name);
            println!(
                "{}: {} ({})",
                name,
                scored.candidate(),
                formula.describe(scored.candidate())
            );
        }
        Err(e) => println!("{}: {}", name, e),
    }
}

pub(crate) fn main(input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let reader = BufReader::new(input);
    let mut rng = settings.rng();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let formula = read_formula(line.trim(), &mut rng)?;
        println!("{}", formula);

        report(
            "Hill climbing",
            &formula,
            climb_with_restarts(&formula, RESTARTS, settings, &mut rng),
        );
        report(
            "Beam search",
            &formula,
            beam(&formula, settings.beam_width, settings.optimize_options(), &mut rng),
        );
        report(
            "Variable neighborhood descent",
            &formula,
            vnd(&formula, settings.optimize_options(), &mut rng),
        );
    }

    Ok(())
}
