//! Piece set fixtures.

use puzzleforge_core::{PuzzlePiece, Vector3};

/// Creates `n` pieces with ids `piece-0..piece-{n-1}` and unit area.
pub fn uniform_pieces(n: usize) -> Vec<PuzzlePiece> {
    (0..n)
        .map(|i| PuzzlePiece::new(format!("piece-{i}"), 1.0))
        .collect()
}

/// Creates one piece per area, ids `piece-0..`, in the given order.
pub fn pieces_with_areas(areas: &[f64]) -> Vec<PuzzlePiece> {
    areas
        .iter()
        .enumerate()
        .map(|(i, &area)| PuzzlePiece::new(format!("piece-{i}"), area))
        .collect()
}

/// Pieces carrying every descriptor field, as the extraction pipeline emits them.
pub fn described_pieces(n: usize) -> Vec<PuzzlePiece> {
    (0..n)
        .map(|i| {
            let side = 1.0 + i as f64;
            PuzzlePiece::new(format!("piece-{i}"), side * side)
                .with_image_path(format!("pieces/piece-{i}.png"))
                .with_dimensions(Vector3::new(side, side, 0.2))
                .with_color_profile(vec![[(i * 10 % 256) as u8, 128, 64]])
        })
        .collect()
}
