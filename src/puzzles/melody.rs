use anyhow::Error;
use log::info;
use optimizer::{Objective, OptimizeOptions, OptimizeResult, Schedule, Scored, Strategy};
use permutohedron::Heap;
use rand::seq::SliceRandom;
use rand::Rng;

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::{LabError, Settings};

/// Pools at most this long are also solved by trying every ordering.
const EXHAUSTIVE: usize = 8;

/// An ordering of notes.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub(crate) struct Melody(Vec<String>);

impl FromStr for Melody {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notes: Vec<String> = s
            .split(',')
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string())
            .collect();

        if notes.is_empty() {
            return Err(LabError::InvalidInput(format!("No notes in {:?}", s)).into());
        }
        Ok(Melody(notes))
    }
}

impl fmt::Display for Melody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl Melody {
    fn swapped(&self, i: usize, j: usize) -> Melody {
        let mut next = self.clone();
        next.0.swap(i, j);
        next
    }

    fn shuffled<R>(&self, rng: &mut R) -> Melody
    where
        R: Rng + ?Sized,
    {
        let mut next = self.clone();
        next.0.shuffle(rng);
        next
    }
}

/// Penalizes every `Sa` which isn't resolved by a `Re`.
#[derive(Debug)]
struct Raga;

const PENALTY: u32 = 10;

impl Objective for Raga {
    type Candidate = Melody;
    type Quality = u32;

    fn quality(&self, melody: &Melody) -> u32 {
        melody
            .0
            .windows(2)
            .filter(|pair| pair[0] == "Sa" && pair[1] != "Re")
            .count() as u32
            * PENALTY
    }

    /// Every ordering with two notes swapped.
    fn neighbors(&self, melody: &Melody) -> Vec<Melody> {
        let n = melody.0.len();
        let mut neighbors = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                neighbors.push(melody.swapped(i, j));
            }
        }
        neighbors
    }

    fn random_neighbor<R>(&self, melody: &Melody, rng: &mut R) -> Option<Melody>
    where
        R: Rng + ?Sized,
    {
        let n = melody.0.len();
        if n < 2 {
            return None;
        }

        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        Some(melody.swapped(i, j))
    }
}

/// Anneal from a random ordering of the pool.
fn compose<R>(
    pool: &Melody,
    schedule: Schedule,
    options: OptimizeOptions,
    rng: &mut R,
) -> OptimizeResult<Scored<Melody, u32>>
where
    R: Rng + ?Sized,
{
    let start = pool.shuffled(rng);
    optimizer::optimize(&Raga, vec![start], Strategy::Anneal(schedule), options, rng)
}

/// The best ordering of the pool, by trying all of them.
fn exhaustive(pool: &Melody) -> (Melody, u32) {
    let mut notes = pool.0.clone();
    let mut best = (pool.clone(), Raga.quality(pool));

    for ordering in Heap::new(&mut notes) {
        let melody = Melody(ordering);
        let quality = Raga.quality(&melody);
        if quality < best.1 {
            best = (melody, quality);
        }
    }
    best
}

pub(crate) fn main(input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let reader = BufReader::new(input);
    let mut rng = settings.rng();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let pool: Melody = line.parse()?;
        println!("Notes: {}", pool);

        let best = compose(&pool, Schedule::default(), settings.optimize_options(), &mut rng)?;
        info!("Annealed melody scores {}", best.quality());
        println!("Annealed melody: {} (penalty {})", best.candidate(), best.quality());

        if pool.0.len() <= EXHAUSTIVE {
            let (melody, quality) = exhaustive(&pool);
            println!("Optimal melody: {} (penalty {})", melody, quality);
        }
    }

    Ok(())
}
