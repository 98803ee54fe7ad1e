//! Independent restarts of the size-biased construction.

use puzzleforge_config::ArrangementConfig;
use puzzleforge_core::{fitness, Arrangement, PuzzleForgeError, PuzzlePiece, Result};
use rand::rngs::StdRng;
use tracing::trace;

use super::SearchStrategy;
use crate::factory::ArrangementFactory;
use crate::stats::SearchStats;

/// Keeps the best of many independent heuristic constructions.
///
/// No state beyond the best arrangement carries between iterations.
#[derive(Debug)]
pub struct HeuristicRestartSearch<'a> {
    factory: ArrangementFactory<'a>,
    best: Option<(Arrangement, f64)>,
}

impl<'a> HeuristicRestartSearch<'a> {
    pub fn new(pieces: &'a [PuzzlePiece], arrangement_config: ArrangementConfig) -> Self {
        Self {
            factory: ArrangementFactory::new(pieces, arrangement_config),
            best: None,
        }
    }
}

impl SearchStrategy for HeuristicRestartSearch<'_> {
    fn strategy_name(&self) -> &'static str {
        "heuristic"
    }

    fn start(&mut self, _rng: &mut StdRng, _stats: &mut SearchStats) -> Result<()> {
        self.best = None;
        Ok(())
    }

    fn step(&mut self, rng: &mut StdRng, stats: &mut SearchStats) -> Result<()> {
        if self.factory.piece_count() == 0 {
            return Ok(());
        }

        let candidate = self.factory.heuristic(rng);
        let score = fitness(&candidate);
        if !score.is_finite() {
            return Err(PuzzleForgeError::Compute(format!(
                "non-finite fitness {score} for heuristic construction"
            )));
        }
        stats.record_evaluations(1);

        let improved = self.best.as_ref().map_or(true, |(_, best)| score > *best);
        stats.record_move(improved);
        if improved {
            trace!(event = "improvement", strategy = "heuristic", fitness = score);
            self.best = Some((candidate, score));
            stats.record_improvement();
        }
        Ok(())
    }

    fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, f)| *f)
    }

    fn best(&self) -> Option<&Arrangement> {
        self.best.as_ref().map(|(a, _)| a)
    }

    fn into_best(self: Box<Self>) -> Option<Arrangement> {
        self.best.map(|(a, _)| a)
    }
}
