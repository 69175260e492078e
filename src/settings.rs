//! Run-time settings shared by every lab.

use optimizer::OptimizeOptions;
use rand::rngs::StdRng;
use rand::SeedableRng;
use searcher::SearchOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Seed for reproducible runs; drawn from the OS when absent.
    pub seed: Option<u64>,

    pub beam_width: usize,

    /// Maximum expansions (searches) or iterations (local search).
    pub limit: Option<usize>,

    /// Log progress every this many steps.
    pub verbose: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            beam_width: 3,
            limit: None,
            verbose: None,
        }
    }
}

impl Settings {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            verbose: self.verbose,
            limit: self.limit,
            ..SearchOptions::default()
        }
    }

    pub fn optimize_options(&self) -> OptimizeOptions {
        OptimizeOptions {
            verbose: self.verbose,
            limit: self.limit,
        }
    }
}
