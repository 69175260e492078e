//! Simulated annealing with a geometric cooling schedule.

use log::debug;
use num::ToPrimitive;
use rand::Rng;

use super::{Iterations, OptimizeOptions, Scored};
use crate::errors::{OptimizeError, Result};
use crate::traits::Objective;

/// Geometric cooling: the temperature starts at `init_temp` and is
/// multiplied by `cool_rate` after every move, until it falls to
/// `stop_temp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub init_temp: f64,
    pub cool_rate: f64,
    pub stop_temp: f64,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            init_temp: 1000.0,
            cool_rate: 0.95,
            stop_temp: 0.01,
        }
    }
}

impl Schedule {
    pub fn new(init_temp: f64, cool_rate: f64, stop_temp: f64) -> Self {
        Self {
            init_temp,
            cool_rate,
            stop_temp,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.cool_rate > 0.0 && self.cool_rate < 1.0) {
            return Err(OptimizeError::InvalidInput(format!(
                "cooling rate must be in (0, 1), got {}",
                self.cool_rate
            )));
        }
        if !(self.stop_temp > 0.0 && self.stop_temp.is_finite()) {
            return Err(OptimizeError::InvalidInput(format!(
                "stopping temperature must be positive, got {}",
                self.stop_temp
            )));
        }
        if !self.init_temp.is_finite() {
            return Err(OptimizeError::InvalidInput(format!(
                "initial temperature must be finite, got {}",
                self.init_temp
            )));
        }
        Ok(())
    }

    /// Number of moves attempted before the schedule freezes.
    pub fn steps(&self) -> usize {
        let mut temperature = self.init_temp;
        let mut steps = 0;
        while temperature > self.stop_temp {
            temperature *= self.cool_rate;
            steps += 1;
        }
        steps
    }
}

/// Metropolis acceptance: always take improvements, and take a worse
/// candidate with probability `exp(-delta / temperature)`.
fn accept<Q, R>(current: Q, next: Q, temperature: f64, rng: &mut R) -> bool
where
    Q: Ord + ToPrimitive,
    R: Rng + ?Sized,
{
    if next < current {
        return true;
    }

    let delta = match (next.to_f64(), current.to_f64()) {
        (Some(n), Some(c)) => n - c,
        _ => return false,
    };

    if temperature <= 0.0 {
        return false;
    }

    let probability = (-delta / temperature).exp();
    rng.random::<f64>() < probability
}

/// Simulated annealing.
///
/// Each move draws one random neighbor and accepts it by the
/// Metropolis criterion. The best candidate ever visited is tracked
/// separately and returned once the schedule freezes, or as soon as
/// it reaches the goal. An iteration limit ends the run early with
/// the best candidate so far, rather than an error.
pub fn anneal<O, R>(
    objective: &O,
    initial: O::Candidate,
    schedule: Schedule,
    options: OptimizeOptions,
    rng: &mut R,
) -> Result<Scored<O::Candidate, O::Quality>>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    schedule.validate()?;

    let mut iterations = Iterations::new(&options);
    let mut current = Scored::new(objective, initial);
    let mut best = current.clone();
    let mut temperature = schedule.init_temp;

    while temperature > schedule.stop_temp {
        if objective.is_goal(&best.candidate, best.quality) {
            debug!("Goal reached at temperature {}", temperature);
            return Ok(best);
        }

        if iterations.increment().is_err() {
            debug!("Stopped after {} iterations", iterations.count());
            break;
        }

        if let Some(neighbor) = objective.random_neighbor(&current.candidate, rng) {
            let next = Scored::new(objective, neighbor);
            if accept(current.quality, next.quality, temperature, rng) {
                current = next;
                if current.quality < best.quality {
                    best = current.clone();
                }
            }
        }

        if iterations.report() {
            debug!(
                "T{:.4} current {:?} best {:?} ({})",
                temperature,
                current.quality,
                best.quality,
                iterations.count()
            );
        }

        temperature *= schedule.cool_rate;
    }

    Ok(best)
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::FnObjective;

    /// Records the quality of every candidate evaluated.
    struct Recorder {
        seen: RefCell<Vec<u32>>,
    }

    impl Objective for Recorder {
        type Candidate = i32;
        type Quality = u32;

        fn quality(&self, x: &i32) -> u32 {
            // A bumpy valley with its floor at 30.
            let q = ((x - 30).abs() + 3 * (x % 4).abs()) as u32;
            self.seen.borrow_mut().push(q);
            q
        }

        fn neighbors(&self, x: &i32) -> Vec<i32> {
            vec![x - 1, x + 1, x - 3, x + 3]
        }
    }

    #[test]
    fn steps_counts_the_schedule() {
        assert_eq!(Schedule::new(1.0, 0.5, 0.2).steps(), 3);
        assert_eq!(Schedule::default().steps(), 225);
    }

    #[test]
    fn invalid_schedules_are_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let objective = FnObjective::new(|x: &i32| x.abs() as u32, |x: &i32| vec![x - 1, x + 1]);

        for schedule in &[
            Schedule::new(10.0, 1.0, 0.1),
            Schedule::new(10.0, 0.0, 0.1),
            Schedule::new(10.0, 0.9, 0.0),
            Schedule::new(f64::INFINITY, 0.9, 0.1),
        ] {
            let result = anneal(&objective, 5, *schedule, OptimizeOptions::default(), &mut rng);
            assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
        }
    }

    #[test]
    fn best_is_never_worse_than_anything_visited() {
        let mut rng = StdRng::seed_from_u64(42);
        let recorder = Recorder {
            seen: RefCell::new(Vec::new()),
        };

        let best = anneal(
            &recorder,
            0,
            Schedule::new(50.0, 0.99, 0.1),
            OptimizeOptions::default(),
            &mut rng,
        )
        .unwrap();

        let seen = recorder.seen.borrow();
        assert!(seen.len() > 1);
        assert!(seen.iter().all(|q| best.quality() <= *q));
    }

    #[test_log::test]
    fn cold_annealing_finds_the_floor() {
        let mut rng = StdRng::seed_from_u64(7);
        let objective = FnObjective::new(
            |x: &i32| (x - 12).abs() as u32,
            |x: &i32| vec![x - 1, x + 1],
        )
        .with_target(0);

        let best = anneal(
            &objective,
            0,
            Schedule::new(1.0, 0.999, 0.001),
            OptimizeOptions::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(best.candidate(), &12);
    }

    #[test]
    fn limit_returns_the_best_so_far() {
        let mut rng = StdRng::seed_from_u64(9);
        let objective = FnObjective::new(|x: &i32| x.abs() as u32, |x: &i32| vec![x - 1, x + 1]);
        let options = OptimizeOptions {
            limit: Some(5),
            ..OptimizeOptions::default()
        };

        let best = anneal(&objective, 100, Schedule::default(), options, &mut rng).unwrap();
        assert!(best.quality() <= 100);
        assert!(best.quality() >= 95);
    }

    #[test]
    fn accepts_improvements_and_some_worse_moves() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(accept(5u32, 3u32, 1e-9, &mut rng));

        // Equal quality is always accepted: exp(0) = 1.
        assert!(accept(5u32, 5u32, 1.0, &mut rng));

        // Practically frozen: a worse move is never taken.
        assert!(!accept(5u32, 6u32, 1e-6, &mut rng));

        // Very hot: almost every worse move is taken.
        let taken = (0..1000)
            .filter(|_| accept(5u32, 6u32, 1e6, &mut rng))
            .count();
        assert!(taken > 990);
    }
}
