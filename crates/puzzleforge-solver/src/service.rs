//! Repository-backed puzzle service.
//!
//! Looks puzzles up by id, solves them, and stores solved arrangements back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use puzzleforge_core::{
    Algorithm, Arrangement, PuzzleForgeError, PuzzlePiece, Result, SolveResult, SolveStatus,
};
use tracing::info;

use crate::solver::PuzzleSolver;

/// A stored puzzle with its extracted pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    pub id: String,
    pub name: String,
    pub pieces: Vec<PuzzlePiece>,
    pub solved: bool,
    pub solution: Option<Arrangement>,
}

impl Puzzle {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pieces: Vec<PuzzlePiece>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pieces,
            solved: false,
            solution: None,
        }
    }
}

/// Storage for puzzles.
pub trait PuzzleRepository: Send + Sync {
    fn get(&self, puzzle_id: &str) -> Option<Puzzle>;

    /// Inserts or replaces the puzzle with the same id.
    fn save(&self, puzzle: Puzzle);
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryPuzzleRepository {
    puzzles: Mutex<HashMap<String, Puzzle>>,
}

impl InMemoryPuzzleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_puzzles(puzzles: impl IntoIterator<Item = Puzzle>) -> Self {
        let repository = Self::new();
        for puzzle in puzzles {
            repository.save(puzzle);
        }
        repository
    }

    pub fn len(&self) -> usize {
        self.puzzles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles().is_empty()
    }

    fn puzzles(&self) -> MutexGuard<'_, HashMap<String, Puzzle>> {
        self.puzzles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PuzzleRepository for InMemoryPuzzleRepository {
    fn get(&self, puzzle_id: &str) -> Option<Puzzle> {
        self.puzzles().get(puzzle_id).cloned()
    }

    fn save(&self, puzzle: Puzzle) {
        self.puzzles().insert(puzzle.id.clone(), puzzle);
    }
}

/// A solve request as received from a caller.
///
/// Unset fields fall back to the solver's configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveRequest {
    pub puzzle_id: String,
    pub algorithm: Option<String>,
    pub max_iterations: Option<i64>,
}

impl SolveRequest {
    pub fn new(puzzle_id: impl Into<String>) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            ..Self::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: i64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

/// Solves stored puzzles and persists their solutions.
#[derive(Debug)]
pub struct PuzzleService<R> {
    repository: Arc<R>,
    solver: PuzzleSolver,
}

impl<R> Clone for PuzzleService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            solver: self.solver.clone(),
        }
    }
}

impl<R: PuzzleRepository> PuzzleService<R> {
    pub fn new(repository: Arc<R>, solver: PuzzleSolver) -> Self {
        Self { repository, solver }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn solver(&self) -> &PuzzleSolver {
        &self.solver
    }

    /// Validates the request, solves the stored puzzle, and saves the
    /// solution if one was found.
    pub async fn solve(&self, request: &SolveRequest) -> Result<SolveResult> {
        let config = self.solver.config();
        let algorithm = match request.algorithm.as_deref() {
            Some(name) => name.parse::<Algorithm>()?,
            None => config.default_algorithm,
        };
        let max_iterations = match request.max_iterations {
            Some(n) => u32::try_from(n).ok().filter(|&n| n > 0).ok_or_else(|| {
                PuzzleForgeError::InvalidArgument(format!(
                    "max_iterations must be a positive 32-bit count, got {n}"
                ))
            })?,
            None => config.default_max_iterations,
        };

        let mut puzzle = self
            .repository
            .get(&request.puzzle_id)
            .ok_or_else(|| PuzzleForgeError::PuzzleNotFound(request.puzzle_id.clone()))?;

        let result = self
            .solver
            .solve_with(&puzzle.id, &puzzle.pieces, algorithm, max_iterations)
            .await?;

        if result.solved() {
            puzzle.solved = true;
            puzzle.solution = result.solution().cloned();
            self.repository.save(puzzle);
            info!(
                event = "solution_saved",
                puzzle_id = request.puzzle_id.as_str(),
                confidence = result.confidence(),
            );
        }

        Ok(result)
    }

    pub fn status(&self, puzzle_id: &str) -> SolveStatus {
        self.solver.status(puzzle_id)
    }

    pub fn cancel(&self, puzzle_id: &str) -> bool {
        self.solver.cancel(puzzle_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzleforge_config::SolverConfig;
    use puzzleforge_test::{described_pieces, uniform_pieces};

    fn service_with(puzzles: Vec<Puzzle>) -> PuzzleService<InMemoryPuzzleRepository> {
        let repository = Arc::new(InMemoryPuzzleRepository::with_puzzles(puzzles));
        let solver = PuzzleSolver::new(SolverConfig::default().with_random_seed(7));
        PuzzleService::new(repository, solver)
    }

    #[tokio::test]
    async fn test_solve_saves_solution() {
        let service = service_with(vec![Puzzle::new("p1", "Harbor", described_pieces(4))]);
        let request = SolveRequest::new("p1")
            .with_algorithm("simulated_annealing")
            .with_max_iterations(50);

        let result = service.solve(&request).await.unwrap();
        assert!(result.solved());

        let stored = service.repository().get("p1").unwrap();
        assert!(stored.solved);
        assert_eq!(stored.solution.as_ref(), result.solution());
        assert_eq!(stored.solution.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_missing_puzzle() {
        let service = service_with(Vec::new());
        let err = service.solve(&SolveRequest::new("ghost")).await.unwrap_err();
        assert!(matches!(err, PuzzleForgeError::PuzzleNotFound(id) if id == "ghost"));
        assert!(!service.status("ghost").is_solving);
    }

    #[tokio::test]
    async fn test_empty_puzzle_not_saved() {
        let service = service_with(vec![Puzzle::new("empty", "Blank", Vec::new())]);
        let result = service
            .solve(&SolveRequest::new("empty").with_max_iterations(10))
            .await
            .unwrap();

        assert!(!result.solved());
        assert_eq!(result.confidence(), 0.0);
        assert!(!service.repository().get("empty").unwrap().solved);
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let service = service_with(vec![Puzzle::new("p1", "Harbor", uniform_pieces(3))]);

        let unknown = SolveRequest::new("p1").with_algorithm("quantum");
        assert!(service.solve(&unknown).await.unwrap_err().is_invalid_argument());

        for bad in [0, -5, i64::from(u32::MAX) + 1] {
            let request = SolveRequest::new("p1").with_max_iterations(bad);
            assert!(service.solve(&request).await.unwrap_err().is_invalid_argument());
        }

        // Validation happens before the repository lookup.
        let missing = SolveRequest::new("ghost").with_algorithm("quantum");
        assert!(service.solve(&missing).await.unwrap_err().is_invalid_argument());

        assert!(!service.repository().get("p1").unwrap().solved);
        assert_eq!(service.solver().registry().active_count(), 0);
    }

    #[tokio::test]
    async fn test_default_request_uses_config() {
        let repository = Arc::new(InMemoryPuzzleRepository::new());
        repository.save(Puzzle::new("p1", "Harbor", uniform_pieces(2)));
        let solver = PuzzleSolver::new(
            SolverConfig::default()
                .with_random_seed(1)
                .with_default_algorithm(Algorithm::Heuristic)
                .with_default_max_iterations(5),
        );
        let service = PuzzleService::new(repository, solver);

        let request = SolveRequest {
            puzzle_id: "p1".to_string(),
            ..SolveRequest::default()
        };
        let result = service.solve(&request).await.unwrap();
        assert!(result.solved());
        assert_eq!(service.repository().len(), 1);
    }

    #[test]
    fn test_cancel_idle_puzzle() {
        let service = service_with(Vec::new());
        assert!(!service.cancel("p1"));
    }
}
