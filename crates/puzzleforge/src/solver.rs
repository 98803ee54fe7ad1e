//! Solver entry point that hides configuration wiring.

use std::path::Path;

use puzzleforge_config::SolverConfig;
use puzzleforge_solver::PuzzleSolver;
use tracing::warn;

/// Configuration file read by [`load_solver`] from the working directory.
pub const CONFIG_FILE: &str = "puzzleforge.toml";

/// Builds a solver from [`CONFIG_FILE`], falling back to defaults when the
/// file is absent. A file that exists but fails to parse or validate is
/// reported and ignored.
///
/// With the `console` feature enabled this also installs the console layer.
pub fn load_solver() -> PuzzleSolver {
    #[cfg(feature = "console")]
    crate::console::init();

    PuzzleSolver::new(load_config(Path::new(CONFIG_FILE)))
}

fn load_config(path: &Path) -> SolverConfig {
    if !path.exists() {
        return SolverConfig::default();
    }
    SolverConfig::load(path).unwrap_or_else(|e| {
        warn!(event = "config_rejected", path = %path.display(), error = %e);
        SolverConfig::default()
    })
}
