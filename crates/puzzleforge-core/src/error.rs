//! Error types for PuzzleForge

use thiserror::Error;

/// Main error type for PuzzleForge operations
#[derive(Debug, Error)]
pub enum PuzzleForgeError {
    /// Request rejected before any job was registered
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected failure while a search strategy was running
    #[error("Compute error: {0}")]
    Compute(String),

    /// No puzzle with the requested id exists in the repository
    #[error("Puzzle not found: {0}")]
    PuzzleNotFound(String),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PuzzleForgeError {
    /// Returns true for errors raised before a job could be registered.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Result type alias for PuzzleForge operations
pub type Result<T> = std::result::Result<T, PuzzleForgeError>;
