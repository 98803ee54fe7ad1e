//! PuzzleForge Solver Engine
//!
//! This crate provides the search engine including:
//! - Job registry with cooperative cancellation
//! - Arrangement factory (random and size-biased heuristic construction)
//! - Search strategies (genetic, simulated annealing, heuristic restart)
//! - The shared search driver loop and its statistics
//! - Solve orchestration and the repository-backed puzzle service
//!
//! Logging levels:
//! - **INFO**: Solve start/end, cancellations, saved solutions
//! - **DEBUG**: Job registration, progress (at most once per second)
//! - **TRACE**: Best-so-far improvements

pub mod driver;
pub mod factory;
pub mod registry;
pub mod service;
pub mod solver;
pub mod stats;
pub mod strategy;

#[cfg(test)]
mod solver_tests;

pub use driver::{run_search, SearchOutcome};
pub use factory::ArrangementFactory;
pub use registry::{ActiveJob, JobRegistry, JobStatus, JobTicket};
pub use service::{InMemoryPuzzleRepository, Puzzle, PuzzleRepository, PuzzleService, SolveRequest};
pub use solver::PuzzleSolver;
pub use stats::SearchStats;
pub use strategy::{
    build_strategy, AnnealingSearch, GeneticSearch, HeuristicRestartSearch, SearchStrategy,
};
