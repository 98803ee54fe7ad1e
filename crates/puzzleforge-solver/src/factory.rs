//! Construction of starting arrangements.
//!
//! Two constructions are offered:
//! - [`ArrangementFactory::random`] scatters pieces uniformly in a cube
//! - [`ArrangementFactory::heuristic`] places larger pieces nearer the center

use puzzleforge_config::ArrangementConfig;
use puzzleforge_core::{Arrangement, Placement, PuzzlePiece, Vector3};
use rand::Rng;

/// Builds arrangements for a fixed piece set.
///
/// The area ordering used by the heuristic construction is computed once.
#[derive(Debug, Clone)]
pub struct ArrangementFactory<'a> {
    pieces: &'a [PuzzlePiece],
    by_area: Vec<usize>,
    config: ArrangementConfig,
}

impl<'a> ArrangementFactory<'a> {
    pub fn new(pieces: &'a [PuzzlePiece], config: ArrangementConfig) -> Self {
        let mut by_area: Vec<usize> = (0..pieces.len()).collect();
        // Stable: equal areas keep input order.
        by_area.sort_by(|&a, &b| pieces[b].shape_area.total_cmp(&pieces[a].shape_area));
        Self {
            pieces,
            by_area,
            config,
        }
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// One placement per piece, in input order, with every position
    /// component uniform in `[-extent, extent]` and every rotation
    /// component uniform in `[0, 360)`.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Arrangement {
        let extent = self.config.random_position_extent;
        self.pieces
            .iter()
            .map(|piece| {
                let position = Vector3::new(
                    rng.random_range(-extent..=extent),
                    rng.random_range(-extent..=extent),
                    rng.random_range(-extent..=extent),
                );
                Placement::new(piece.id.clone(), position, random_rotation(rng))
            })
            .collect()
    }

    /// One placement per piece, ordered by descending area.
    ///
    /// The piece at sorted index `i` of `n` gets bias `b = 1 - i/n`; its x and
    /// y are uniform in `[-xy·b, xy·b]` and z in `[-z, z]`. Rotations are as in
    /// [`random`](Self::random).
    pub fn heuristic<R: Rng + ?Sized>(&self, rng: &mut R) -> Arrangement {
        let n = self.pieces.len() as f64;
        let z = self.config.heuristic_z_extent;
        self.by_area
            .iter()
            .enumerate()
            .map(|(rank, &index)| {
                let bias = 1.0 - rank as f64 / n;
                let xy = self.config.heuristic_xy_extent * bias;
                let position = Vector3::new(
                    rng.random_range(-xy..=xy),
                    rng.random_range(-xy..=xy),
                    rng.random_range(-z..=z),
                );
                Placement::new(self.pieces[index].id.clone(), position, random_rotation(rng))
            })
            .collect()
    }
}

fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Vector3 {
    Vector3::new(
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..360.0),
    )
}
