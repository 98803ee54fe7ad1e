//! PuzzleForge Core
//!
//! Core types and the scoring model shared by every search strategy:
//! - Piece descriptors and 3D vectors
//! - Placements and arrangements
//! - Fitness evaluation and confidence estimation
//! - Algorithm selection and solve results
//! - Error types

pub mod algorithm;
pub mod arrangement;
pub mod error;
pub mod fitness;
pub mod piece;
pub mod result;

pub use algorithm::Algorithm;
pub use arrangement::{Arrangement, Placement};
pub use error::{PuzzleForgeError, Result};
pub use fitness::{
    confidence, fitness, solution_confidence, COMPACTNESS_WEIGHT, DISTANCE_PENALTY_WEIGHT,
    OPTIMAL_PAIR_DISTANCE,
};
pub use piece::{PuzzlePiece, Vector3};
pub use result::{SolveResult, SolveStatus};
