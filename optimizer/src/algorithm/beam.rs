//! Local beam search.

use std::collections::HashSet;
use std::hash::Hash;

use log::debug;

use super::{Iterations, OptimizeOptions, Scored};
use crate::errors::{OptimizeError, Result};
use crate::traits::Objective;

/// Rounds without a better candidate before a beam with a goal gives up.
pub(crate) const PATIENCE: usize = 100;

/// Keep the best `width` distinct candidates.
///
/// The sort is stable, so among equally good candidates the ones
/// generated first survive.
pub(crate) fn select<C, Q>(pool: Vec<Scored<C, Q>>, width: usize) -> Vec<Scored<C, Q>>
where
    C: Clone + Eq + Hash,
    Q: Copy + Ord,
{
    let mut seen = HashSet::with_capacity(pool.len());
    let mut pool: Vec<_> = pool
        .into_iter()
        .filter(|s| seen.insert(s.candidate.clone()))
        .collect();
    pool.sort_by_key(|s| s.quality);
    pool.truncate(width);
    pool
}

/// Local beam search.
///
/// Every round, all neighbors of every candidate in the beam are pooled
/// and the best `width` of them become the next beam. Returns as soon
/// as a candidate in the beam reaches the goal. For objectives without
/// a goal, the search stops once a round fails to find a better
/// candidate than any seen before. With a goal, the beam gets
/// `PATIENCE` rounds to improve before reporting a local optimum.
pub fn beam<O>(
    objective: &O,
    initial: Vec<O::Candidate>,
    width: usize,
    options: OptimizeOptions,
) -> Result<Scored<O::Candidate, O::Quality>>
where
    O: Objective + ?Sized,
{
    if width == 0 {
        return Err(OptimizeError::InvalidInput(
            "beam width must be at least one".to_string(),
        ));
    }

    let mut iterations = Iterations::new(&options);
    let mut pool = select(
        initial
            .into_iter()
            .map(|c| Scored::new(objective, c))
            .collect(),
        width,
    );

    let mut best = match pool.first() {
        Some(leader) => leader.clone(),
        None => {
            return Err(OptimizeError::InvalidInput(
                "at least one initial candidate is required".to_string(),
            ))
        }
    };

    let mut stale = 0;

    loop {
        if let Some(idx) = pool
            .iter()
            .position(|s| objective.is_goal(&s.candidate, s.quality))
        {
            debug!("Goal reached after {} iterations", iterations.count());
            return Ok(pool.swap_remove(idx));
        }

        iterations.increment()?;

        let expanded: Vec<_> = pool
            .iter()
            .flat_map(|s| objective.neighbors(&s.candidate))
            .map(|c| Scored::new(objective, c))
            .collect();
        let considered = expanded.len();
        pool = select(expanded, width);

        let leader = match pool.first() {
            Some(leader) => leader,
            None => {
                debug!("Beam emptied after {} iterations", iterations.count());
                return Err(OptimizeError::FrontierExhausted(iterations.count()));
            }
        };

        if iterations.report() {
            debug!(
                "B{} of {} best {:?} leader {:?} ({})",
                pool.len(),
                considered,
                best.quality,
                leader.quality,
                iterations.count()
            );
        }

        if leader.quality < best.quality {
            best = leader.clone();
            stale = 0;
        } else if !objective.has_goal() {
            return Ok(best);
        } else {
            stale += 1;
            if stale >= PATIENCE {
                debug!(
                    "Beam stalled at {:?} after {} iterations",
                    best.quality,
                    iterations.count()
                );
                return Err(OptimizeError::LocalOptimumReached(iterations.count()));
            }
        }
    }
}
