//! Shared test fixtures for PuzzleForge crates.
//!
//! - [`pieces`] - piece sets of various sizes and area profiles
//! - [`arrangements`] - hand-placed arrangements with known fitness
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! puzzleforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use puzzleforge_test::pieces::uniform_pieces;
//!
//! let pieces = uniform_pieces(3);
//! assert_eq!(pieces.len(), 3);
//! ```

pub mod arrangements;
pub mod pieces;

pub use arrangements::{arrangement_at, line_arrangement};
pub use pieces::{described_pieces, pieces_with_areas, uniform_pieces};
