//! Arrangement fixtures.

use puzzleforge_core::{Arrangement, Placement, Vector3};

/// Places piece `piece-i` at `positions[i]` with zero rotation.
pub fn arrangement_at(positions: &[(f64, f64, f64)]) -> Arrangement {
    positions
        .iter()
        .enumerate()
        .map(|(i, &(x, y, z))| Placement::at(format!("piece-{i}"), Vector3::new(x, y, z)))
        .collect()
}

/// `n` pieces on the x axis, `spacing` apart, centered on the origin.
pub fn line_arrangement(n: usize, spacing: f64) -> Arrangement {
    let offset = (n.saturating_sub(1)) as f64 * spacing / 2.0;
    (0..n)
        .map(|i| {
            Placement::at(
                format!("piece-{i}"),
                Vector3::new(i as f64 * spacing - offset, 0.0, 0.0),
            )
        })
        .collect()
}
