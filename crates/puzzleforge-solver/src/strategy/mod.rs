//! Search strategies.
//!
//! A strategy owns its search state and exposes one iteration at a time;
//! the driver in [`crate::driver`] decides when to stop. Every strategy keeps
//! the best arrangement seen so far, which only ever improves.

mod annealing;
mod genetic;
mod restart;

pub use annealing::AnnealingSearch;
pub use genetic::GeneticSearch;
pub use restart::HeuristicRestartSearch;

use std::fmt::Debug;

use puzzleforge_config::SolverConfig;
use puzzleforge_core::{Algorithm, Arrangement, PuzzlePiece, Result};
use rand::rngs::StdRng;

use crate::stats::SearchStats;

/// One search algorithm driven iteration by iteration.
pub trait SearchStrategy: Send + Debug {
    /// Short name used in log events.
    fn strategy_name(&self) -> &'static str;

    /// Builds the initial state. Called once before the first step.
    fn start(&mut self, rng: &mut StdRng, stats: &mut SearchStats) -> Result<()>;

    /// Runs one iteration.
    fn step(&mut self, rng: &mut StdRng, stats: &mut SearchStats) -> Result<()>;

    /// Fitness of the best arrangement so far, if any.
    fn best_fitness(&self) -> Option<f64>;

    /// Best arrangement so far, if any.
    fn best(&self) -> Option<&Arrangement>;

    /// Consumes the strategy and yields its best arrangement.
    fn into_best(self: Box<Self>) -> Option<Arrangement>;
}

/// Creates the strategy for `algorithm` over `pieces`.
pub fn build_strategy<'a>(
    algorithm: Algorithm,
    pieces: &'a [PuzzlePiece],
    config: &SolverConfig,
) -> Box<dyn SearchStrategy + 'a> {
    match algorithm {
        Algorithm::Genetic => Box::new(GeneticSearch::new(
            pieces,
            config.arrangement.clone(),
            config.genetic.clone(),
        )),
        Algorithm::SimulatedAnnealing => Box::new(AnnealingSearch::new(
            pieces,
            config.arrangement.clone(),
            config.annealing.clone(),
        )),
        Algorithm::Heuristic => Box::new(HeuristicRestartSearch::new(
            pieces,
            config.arrangement.clone(),
        )),
    }
}
