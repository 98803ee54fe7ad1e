//! PuzzleForge - Jigsaw arrangement search in Rust
//!
//! Give it the extracted pieces of a puzzle and an algorithm name; it returns
//! the best spatial arrangement found and a confidence in `[0, 1]`.
//!
//! # Example
//!
//! ```rust
//! use puzzleforge::prelude::*;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let solver = PuzzleSolver::new(SolverConfig::default().with_random_seed(7));
//! let pieces = vec![
//!     PuzzlePiece::new("corner", 9.0),
//!     PuzzlePiece::new("edge", 4.0),
//!     PuzzlePiece::new("middle", 1.0),
//! ];
//!
//! let result = runtime
//!     .block_on(solver.solve("harbor", &pieces, "genetic", 100))
//!     .unwrap();
//! assert!(result.solved());
//! assert_eq!(result.solution().unwrap().len(), 3);
//! ```

#[cfg(feature = "console")]
pub mod console;

mod solver;
pub use solver::{load_solver, CONFIG_FILE};

// Domain model
pub use puzzleforge_core::{
    confidence, fitness, solution_confidence, Algorithm, Arrangement, Placement,
    PuzzleForgeError, PuzzlePiece, Result, SolveResult, SolveStatus, Vector3,
};

// Configuration
pub use puzzleforge_config::{
    AnnealingConfig, ArrangementConfig, ConfigError, GeneticConfig, SolverConfig,
};

// Engine and service
pub use puzzleforge_solver::{
    InMemoryPuzzleRepository, JobRegistry, Puzzle, PuzzleRepository, PuzzleService,
    PuzzleSolver, SolveRequest,
};

/// Lower-level search building blocks.
pub mod search {
    pub use puzzleforge_solver::{
        build_strategy, run_search, ActiveJob, AnnealingSearch, ArrangementFactory,
        GeneticSearch, HeuristicRestartSearch, JobStatus, JobTicket, SearchOutcome,
        SearchStats, SearchStrategy,
    };
}

pub mod prelude {
    pub use super::{
        Algorithm, Arrangement, Placement, PuzzleForgeError, PuzzlePiece, SolveResult,
        SolveStatus, Vector3,
    };
    pub use super::{InMemoryPuzzleRepository, Puzzle, PuzzleRepository, PuzzleService};
    pub use super::{PuzzleSolver, SolveRequest, SolverConfig};
}
