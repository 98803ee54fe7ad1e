//! Tests for solve orchestration.

use std::sync::Arc;
use std::time::Duration;

use puzzleforge_config::SolverConfig;
use puzzleforge_core::{fitness, Algorithm, PuzzleForgeError, PuzzlePiece};
use puzzleforge_test::{described_pieces, uniform_pieces};
use tokio::time::{sleep, timeout};

use crate::solver::PuzzleSolver;

fn seeded_solver(seed: u64) -> PuzzleSolver {
    PuzzleSolver::new(SolverConfig::default().with_random_seed(seed))
}

async fn wait_until_solving(solver: &PuzzleSolver, puzzle_id: &str) {
    timeout(Duration::from_secs(10), async {
        while !solver.status(puzzle_id).is_solving {
            sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("solve never became active");
}

#[tokio::test]
async fn test_empty_pieces_unsolved_for_every_algorithm() {
    let solver = PuzzleSolver::default();
    for algorithm in ["genetic", "simulated_annealing", "heuristic", "reinforcement_learning"] {
        let result = solver.solve("empty", &[], algorithm, 100).await.unwrap();
        assert!(!result.solved());
        assert!(result.solution().is_none());
        assert_eq!(result.confidence(), 0.0);
        assert!(result.processing_time() >= 0.0);
    }
    assert!(!solver.status("empty").is_solving);
}

#[tokio::test]
async fn test_unknown_algorithm_rejected_before_registration() {
    let solver = PuzzleSolver::default();
    let pieces = uniform_pieces(3);
    let err = solver.solve("p", &pieces, "quantum", 100).await.unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("quantum"));
    assert_eq!(solver.status("p").status(), "idle");
    assert_eq!(solver.registry().active_count(), 0);
}

#[tokio::test]
async fn test_zero_iterations_rejected() {
    let solver = PuzzleSolver::default();
    let pieces = uniform_pieces(3);
    let err = solver.solve("p", &pieces, "genetic", 0).await.unwrap_err();
    assert!(matches!(err, PuzzleForgeError::InvalidArgument(_)));
    assert!(!solver.status("p").is_solving);
}

#[tokio::test]
async fn test_solution_covers_every_piece() {
    let solver = seeded_solver(11);
    let pieces = described_pieces(5);

    for algorithm in Algorithm::ALL {
        let result = solver
            .solve_with("p", &pieces, algorithm, 40)
            .await
            .unwrap();
        assert!(result.solved(), "{algorithm} produced no solution");

        let solution = result.solution().unwrap();
        assert_eq!(solution.len(), pieces.len());
        for piece in &pieces {
            assert!(solution.iter().any(|p| p.piece_id == piece.id));
        }
        assert!((0.0..=1.0).contains(&result.confidence()));
        assert!(fitness(solution).is_finite());
    }
    assert!(!solver.status("p").is_solving);
}

#[tokio::test]
async fn test_single_iteration_annealing() {
    let solver = seeded_solver(3);
    let pieces = uniform_pieces(3);
    let result = solver
        .solve("p", &pieces, "simulated_annealing", 1)
        .await
        .unwrap();
    assert!(result.solved());
    assert_eq!(result.solution().unwrap().len(), 3);
}

#[tokio::test]
async fn test_seeded_runs_are_reproducible() {
    let pieces = uniform_pieces(6);
    for algorithm in Algorithm::ALL {
        let first = seeded_solver(42)
            .solve_with("p", &pieces, algorithm, 30)
            .await
            .unwrap();
        let second = seeded_solver(42)
            .solve_with("p", &pieces, algorithm, 30)
            .await
            .unwrap();
        assert_eq!(first.solution(), second.solution());
        assert_eq!(first.confidence(), second.confidence());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_running_solve() {
    let solver = seeded_solver(5);
    let pieces: Arc<[PuzzlePiece]> = uniform_pieces(10).into();

    let handle = {
        let solver = solver.clone();
        let pieces = Arc::clone(&pieces);
        tokio::spawn(async move {
            solver
                .solve("long", &pieces, "simulated_annealing", u32::MAX)
                .await
        })
    };

    wait_until_solving(&solver, "long").await;
    assert!(solver.cancel("long"));

    let result = timeout(Duration::from_secs(10), handle)
        .await
        .expect("cancelled solve did not stop")
        .unwrap()
        .unwrap();

    // Best-so-far is returned and the job is gone.
    assert!(result.solved());
    assert_eq!(result.solution().unwrap().len(), 10);
    assert!(!solver.status("long").is_solving);
    assert!(!solver.cancel("long"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_newer_solve_supersedes_older() {
    let solver = seeded_solver(9);
    let pieces: Arc<[PuzzlePiece]> = uniform_pieces(8).into();

    let older = {
        let solver = solver.clone();
        let pieces = Arc::clone(&pieces);
        tokio::spawn(async move { solver.solve("shared", &pieces, "heuristic", u32::MAX).await })
    };
    wait_until_solving(&solver, "shared").await;

    let newer = solver.solve("shared", &pieces, "heuristic", 20).await.unwrap();
    assert!(newer.solved());

    let older = timeout(Duration::from_secs(10), older)
        .await
        .expect("superseded solve did not stop")
        .unwrap()
        .unwrap();
    // The older run may be superseded before its first restart.
    assert!(older.solution().map_or(true, |s| s.len() == 8));
    assert!(!solver.status("shared").is_solving);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_distinct_puzzles_run_concurrently() {
    let solver = seeded_solver(1);
    let pieces: Arc<[PuzzlePiece]> = uniform_pieces(4).into();

    let long = {
        let solver = solver.clone();
        let pieces = Arc::clone(&pieces);
        tokio::spawn(async move {
            solver
                .solve("a", &pieces, "simulated_annealing", u32::MAX)
                .await
        })
    };
    wait_until_solving(&solver, "a").await;

    let short = solver.solve("b", &pieces, "genetic", 10).await.unwrap();
    assert!(short.solved());
    assert!(solver.status("a").is_solving);
    assert!(!solver.status("b").is_solving);

    assert!(solver.cancel("a"));
    let long = timeout(Duration::from_secs(10), long)
        .await
        .expect("cancelled solve did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(long.solution().unwrap().len(), 4);
}

#[tokio::test]
async fn test_config_file_errors_map_to_config() {
    let err = PuzzleSolver::from_config_file("/nonexistent/puzzleforge.toml").unwrap_err();
    assert!(matches!(err, PuzzleForgeError::Config(_)));
}

#[tokio::test]
async fn test_invalid_config_rejected_before_registration() {
    let config = SolverConfig::from_toml_str("[genetic]\nmutation_rate = 1.5\n").unwrap();
    let solver = PuzzleSolver::new(config);
    let pieces = uniform_pieces(4);

    let err = solver.solve("p", &pieces, "genetic", 5).await.unwrap_err();
    assert!(matches!(err, PuzzleForgeError::Config(_)));
    assert_eq!(solver.registry().active_count(), 0);
    assert!(!solver.status("p").is_solving);
}
