//! Solve orchestration.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use puzzleforge_config::SolverConfig;
use puzzleforge_core::{
    Algorithm, PuzzleForgeError, PuzzlePiece, Result, SolveResult, SolveStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::driver::run_search;
use crate::registry::{JobRegistry, JobStatus};
use crate::strategy::build_strategy;

/// Runs solves and tracks which puzzles have one in flight.
///
/// Clones share the same registry, so a solve started through one handle can
/// be queried or cancelled through another.
///
/// # Example
///
/// ```
/// use puzzleforge_core::PuzzlePiece;
/// use puzzleforge_solver::PuzzleSolver;
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let solver = PuzzleSolver::default();
/// let pieces = vec![PuzzlePiece::new("a", 4.0), PuzzlePiece::new("b", 1.0)];
///
/// let result = runtime
///     .block_on(solver.solve("puzzle-1", &pieces, "heuristic", 50))
///     .unwrap();
/// assert!(result.solved());
/// assert_eq!(result.solution().unwrap().len(), 2);
/// assert!(!solver.status("puzzle-1").is_solving);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PuzzleSolver {
    registry: Arc<JobRegistry>,
    config: Arc<SolverConfig>,
}

impl PuzzleSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            config: Arc::new(config),
        }
    }

    /// Loads and validates a TOML configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config =
            SolverConfig::load(path).map_err(|e| PuzzleForgeError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Uses an existing registry, e.g. one shared with another component.
    pub fn with_registry(config: SolverConfig, registry: Arc<JobRegistry>) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Solves `pieces` with the algorithm named `algorithm`.
    ///
    /// Unknown algorithm names and a zero iteration budget are rejected with
    /// [`PuzzleForgeError::InvalidArgument`] before any job is registered.
    pub async fn solve(
        &self,
        puzzle_id: &str,
        pieces: &[PuzzlePiece],
        algorithm: &str,
        max_iterations: u32,
    ) -> Result<SolveResult> {
        let algorithm: Algorithm = algorithm.parse()?;
        self.solve_with(puzzle_id, pieces, algorithm, max_iterations)
            .await
    }

    /// Solves `pieces` with an already parsed algorithm.
    ///
    /// The job is registered for the duration of the call and released on
    /// every exit path. A cancelled solve returns its best-so-far. A config
    /// that fails [`SolverConfig::validate`] is rejected with
    /// [`PuzzleForgeError::Config`] before registration.
    pub async fn solve_with(
        &self,
        puzzle_id: &str,
        pieces: &[PuzzlePiece],
        algorithm: Algorithm,
        max_iterations: u32,
    ) -> Result<SolveResult> {
        if max_iterations == 0 {
            return Err(PuzzleForgeError::InvalidArgument(
                "max_iterations must be positive".to_string(),
            ));
        }
        self.config
            .validate()
            .map_err(|e| PuzzleForgeError::Config(e.to_string()))?;

        let job = self.registry.start_job(puzzle_id);
        let started = Instant::now();

        info!(
            event = "solve_start",
            puzzle_id = puzzle_id,
            algorithm = %algorithm,
            piece_count = pieces.len(),
            max_iterations = max_iterations,
        );

        let strategy = build_strategy(algorithm, pieces, &self.config);
        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let outcome = match run_search(strategy, pieces.len(), max_iterations, &job, &mut rng).await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(event = "solve_failed", puzzle_id = puzzle_id, error = %e);
                return Err(e);
            }
        };

        let status = if outcome.cancelled {
            drop(job);
            JobStatus::Cancelled
        } else {
            job.finish()
        };

        let result = SolveResult::new(puzzle_id, outcome.best, started.elapsed());
        info!(
            event = "solve_end",
            puzzle_id = puzzle_id,
            algorithm = %algorithm,
            solved = result.solved(),
            confidence = result.confidence(),
            cancelled = status == JobStatus::Cancelled,
            iterations = outcome.stats.iterations,
            evaluations = outcome.stats.evaluations,
            elapsed_secs = result.processing_time(),
        );
        Ok(result)
    }

    /// Reports whether a solve for `puzzle_id` is in flight.
    pub fn status(&self, puzzle_id: &str) -> SolveStatus {
        SolveStatus::new(puzzle_id, self.registry.is_active(puzzle_id))
    }

    /// Requests cancellation; returns true iff a solve was in flight.
    pub fn cancel(&self, puzzle_id: &str) -> bool {
        self.registry.cancel(puzzle_id)
    }
}
