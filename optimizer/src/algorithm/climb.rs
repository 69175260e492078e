//! Descent strategies: steepest-ascent hill climbing and
//! variable neighborhood descent.

use log::debug;

use super::{settle, Iterations, OptimizeOptions, Scored};
use crate::errors::{OptimizeError, Result};
use crate::traits::{Neighborhood, Objective};

/// Steepest-ascent hill climbing.
///
/// Moves to the best neighbor while it is strictly better than the
/// current candidate. Among equally good neighbors the first one
/// generated wins. Never moves to a worse (or equal) candidate.
pub fn hill_climb<O>(
    objective: &O,
    initial: O::Candidate,
    options: OptimizeOptions,
) -> Result<Scored<O::Candidate, O::Quality>>
where
    O: Objective + ?Sized,
{
    let mut iterations = Iterations::new(&options);
    let mut current = Scored::new(objective, initial);

    loop {
        if objective.is_goal(&current.candidate, current.quality) {
            debug!("Goal reached after {} iterations", iterations.count());
            return Ok(current);
        }

        iterations.increment()?;

        let best = objective
            .neighbors(&current.candidate)
            .into_iter()
            .map(|c| Scored::new(objective, c))
            .min_by_key(|s| s.quality);

        match best {
            Some(next) if next.quality < current.quality => {
                if iterations.report() {
                    debug!("{:?} -> {:?} ({})", current.quality, next.quality, iterations.count());
                }
                current = next;
            }
            _ => break,
        }
    }

    settle(objective, current, &iterations)
}

/// Variable neighborhood descent.
///
/// Neighborhoods should be ordered from smallest to largest. Each is
/// searched in turn for the best strictly improving candidate; as soon
/// as one improves, the descent restarts from the first neighborhood.
/// Any candidate reaching the goal is returned immediately.
pub fn vnd<O>(
    objective: &O,
    initial: O::Candidate,
    neighborhoods: &[Neighborhood<'_, O::Candidate>],
    options: OptimizeOptions,
) -> Result<Scored<O::Candidate, O::Quality>>
where
    O: Objective + ?Sized,
{
    if neighborhoods.is_empty() {
        return Err(OptimizeError::InvalidInput(
            "variable neighborhood descent needs at least one neighborhood".to_string(),
        ));
    }

    let mut iterations = Iterations::new(&options);
    let mut current = Scored::new(objective, initial);

    'descent: loop {
        if objective.is_goal(&current.candidate, current.quality) {
            return Ok(current);
        }

        iterations.increment()?;

        for (k, neighborhood) in neighborhoods.iter().enumerate() {
            let mut best: Option<Scored<O::Candidate, O::Quality>> = None;

            for candidate in neighborhood(&current.candidate) {
                let scored = Scored::new(objective, candidate);
                if objective.is_goal(&scored.candidate, scored.quality) {
                    debug!("Goal found in neighborhood {}", k);
                    return Ok(scored);
                }

                let bar = best.as_ref().map_or(current.quality, |b| b.quality);
                if scored.quality < bar {
                    best = Some(scored);
                }
            }

            if let Some(next) = best {
                if iterations.report() {
                    debug!(
                        "N{} {:?} -> {:?} ({})",
                        k,
                        current.quality,
                        next.quality,
                        iterations.count()
                    );
                }
                current = next;
                continue 'descent;
            }
        }

        break;
    }

    settle(objective, current, &iterations)
}
