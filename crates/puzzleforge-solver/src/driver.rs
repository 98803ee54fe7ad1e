//! Shared search loop.
//!
//! Every strategy runs under the same driver: cancellation is observed before
//! each iteration, and the task yields to the scheduler after each one so that
//! other solves on the runtime keep making progress.

use std::time::Instant;

use puzzleforge_core::{fitness, Arrangement, PuzzleForgeError, Result};
use rand::rngs::StdRng;
use tokio::task;
use tracing::debug;

use crate::registry::ActiveJob;
use crate::stats::SearchStats;
use crate::strategy::SearchStrategy;

/// Result of one driven search.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Best arrangement found, `None` for an empty piece set.
    pub best: Option<Arrangement>,
    pub stats: SearchStats,
    /// True if the loop stopped because the job was no longer current.
    pub cancelled: bool,
}

/// Runs `strategy` for at most `max_iterations` iterations.
///
/// Stops early, keeping the best-so-far, the first time `job` reports itself
/// cancelled. The returned arrangement is validated against `piece_count`.
pub async fn run_search(
    mut strategy: Box<dyn SearchStrategy + '_>,
    piece_count: usize,
    max_iterations: u32,
    job: &ActiveJob<'_>,
    rng: &mut StdRng,
) -> Result<SearchOutcome> {
    let mut stats = SearchStats::default();
    stats.start();

    if piece_count == 0 {
        return Ok(SearchOutcome {
            best: None,
            stats,
            cancelled: false,
        });
    }

    strategy.start(rng, &mut stats)?;

    let mut cancelled = false;
    let mut last_progress_time = Instant::now();
    let mut last_progress_evaluations = 0u64;

    for _ in 0..max_iterations {
        if job.is_cancelled() {
            cancelled = true;
            break;
        }

        strategy.step(rng, &mut stats)?;
        stats.record_iteration();

        // Log progress every second
        let now = Instant::now();
        if now.duration_since(last_progress_time).as_secs() >= 1 {
            let evaluations_delta = stats.evaluations - last_progress_evaluations;
            let elapsed_secs = now.duration_since(last_progress_time).as_secs_f64();
            debug!(
                event = "progress",
                puzzle_id = job.puzzle_id(),
                strategy = strategy.strategy_name(),
                iterations = stats.iterations,
                speed = (evaluations_delta as f64 / elapsed_secs) as u64,
                best_fitness = strategy.best_fitness(),
            );
            last_progress_time = now;
            last_progress_evaluations = stats.evaluations;
        }

        task::yield_now().await;
    }

    let best = strategy.into_best();
    if let Some(arrangement) = &best {
        arrangement.validate(piece_count)?;
        let score = fitness(arrangement);
        if !score.is_finite() {
            return Err(PuzzleForgeError::Compute(format!(
                "best arrangement has non-finite fitness {score}"
            )));
        }
    }

    Ok(SearchOutcome {
        best,
        stats,
        cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::JobRegistry;
    use crate::strategy::build_strategy;
    use puzzleforge_config::SolverConfig;
    use puzzleforge_core::Algorithm;
    use puzzleforge_test::{arrangement_at, line_arrangement, uniform_pieces};
    use rand::SeedableRng;

    #[derive(Debug)]
    struct FailingStrategy {
        fail_at: u32,
        steps: u32,
    }

    impl SearchStrategy for FailingStrategy {
        fn strategy_name(&self) -> &'static str {
            "failing"
        }

        fn start(&mut self, _rng: &mut StdRng, _stats: &mut SearchStats) -> Result<()> {
            Ok(())
        }

        fn step(&mut self, _rng: &mut StdRng, _stats: &mut SearchStats) -> Result<()> {
            self.steps += 1;
            if self.steps == self.fail_at {
                return Err(PuzzleForgeError::Compute("strategy exploded".to_string()));
            }
            Ok(())
        }

        fn best_fitness(&self) -> Option<f64> {
            None
        }

        fn best(&self) -> Option<&Arrangement> {
            None
        }

        fn into_best(self: Box<Self>) -> Option<Arrangement> {
            None
        }
    }

    /// Returns a fixed arrangement regardless of the piece count.
    #[derive(Debug)]
    struct FixedStrategy(Arrangement);

    impl SearchStrategy for FixedStrategy {
        fn strategy_name(&self) -> &'static str {
            "fixed"
        }

        fn start(&mut self, _rng: &mut StdRng, _stats: &mut SearchStats) -> Result<()> {
            Ok(())
        }

        fn step(&mut self, _rng: &mut StdRng, _stats: &mut SearchStats) -> Result<()> {
            Ok(())
        }

        fn best_fitness(&self) -> Option<f64> {
            Some(fitness(&self.0))
        }

        fn best(&self) -> Option<&Arrangement> {
            Some(&self.0)
        }

        fn into_best(self: Box<Self>) -> Option<Arrangement> {
            Some(self.0)
        }
    }

    #[tokio::test]
    async fn test_runs_all_iterations() {
        let registry = JobRegistry::new();
        let job = registry.start_job("p");
        let pieces = uniform_pieces(4);
        let strategy = build_strategy(Algorithm::SimulatedAnnealing, &pieces, &SolverConfig::default());
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_search(strategy, pieces.len(), 25, &job, &mut rng).await.unwrap();
        assert!(!outcome.cancelled);
        assert_eq!(outcome.stats.iterations, 25);
        assert_eq!(outcome.best.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_pieces_skip_search() {
        let registry = JobRegistry::new();
        let job = registry.start_job("p");
        let pieces = uniform_pieces(0);
        let strategy = build_strategy(Algorithm::Genetic, &pieces, &SolverConfig::default());
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_search(strategy, 0, 100, &job, &mut rng).await.unwrap();
        assert!(outcome.best.is_none());
        assert_eq!(outcome.stats.iterations, 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_iteration() {
        let registry = JobRegistry::new();
        let job = registry.start_job("p");
        registry.cancel("p");
        let pieces = uniform_pieces(3);
        let strategy = build_strategy(Algorithm::Heuristic, &pieces, &SolverConfig::default());
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_search(strategy, 3, 100, &job, &mut rng).await.unwrap();
        assert!(outcome.cancelled);
        assert_eq!(outcome.stats.iterations, 0);
        assert!(outcome.best.is_none());
    }

    #[tokio::test]
    async fn test_strategy_error_releases_job() {
        let registry = JobRegistry::new();
        let result = {
            let job = registry.start_job("p");
            let strategy = Box::new(FailingStrategy { fail_at: 3, steps: 0 });
            let mut rng = StdRng::seed_from_u64(1);
            run_search(strategy, 2, 10, &job, &mut rng).await
        };
        let err = result.unwrap_err();
        assert!(matches!(err, PuzzleForgeError::Compute(_)));
        assert!(!registry.is_active("p"));
    }

    #[tokio::test]
    async fn test_length_mismatch_is_compute_error() {
        let registry = JobRegistry::new();
        let job = registry.start_job("p");
        let strategy = Box::new(FixedStrategy(arrangement_at(&[(0.0, 0.0, 0.0)])));
        let mut rng = StdRng::seed_from_u64(1);

        let err = run_search(strategy, 2, 1, &job, &mut rng).await.unwrap_err();
        assert!(matches!(err, PuzzleForgeError::Compute(_)));
    }

    #[tokio::test]
    async fn test_returns_strategy_best() {
        let registry = JobRegistry::new();
        let job = registry.start_job("p");
        // Neighbours sit at the optimal distance; the outer pair is 2.0 too far.
        let line = line_arrangement(3, 2.0);
        let strategy = Box::new(FixedStrategy(line.clone()));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_search(strategy, 3, 5, &job, &mut rng).await.unwrap();
        assert_eq!(outcome.stats.iterations, 5);
        let best = outcome.best.unwrap();
        assert_eq!(best, line);
        assert!((fitness(&best) - 99.8).abs() < 1e-9);
        assert_eq!(fitness(&line_arrangement(2, 2.0)), 100.0);
    }
}
