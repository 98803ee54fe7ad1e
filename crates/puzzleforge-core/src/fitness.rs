//! Fitness evaluation and confidence estimation.
//!
//! Fitness rewards arrangements whose pieces sit roughly
//! [`OPTIMAL_PAIR_DISTANCE`] apart and whose centroid is near the origin.
//! Higher is better; the value is unbounded in both directions.
//!
//! The pairwise term visits every unordered pair of placements, so a single
//! evaluation is `O(n²)` in the piece count and dominates every strategy's
//! per-iteration cost.

use crate::arrangement::Arrangement;

/// Preferred distance between any two piece positions.
pub const OPTIMAL_PAIR_DISTANCE: f64 = 2.0;

/// Weight applied to each pair's deviation from the optimal distance.
pub const DISTANCE_PENALTY_WEIGHT: f64 = 0.1;

/// Maximum compactness bonus, reached when the centroid is at the origin.
pub const COMPACTNESS_WEIGHT: f64 = 100.0;

/// Scores an arrangement.
///
/// # Example
///
/// ```
/// use puzzleforge_core::{fitness, Arrangement, Placement, Vector3};
///
/// assert_eq!(fitness(&Arrangement::default()), 0.0);
///
/// let single: Arrangement = vec![Placement::at("a", Vector3::ZERO)].into();
/// assert_eq!(fitness(&single), 100.0);
/// ```
pub fn fitness(arrangement: &Arrangement) -> f64 {
    if arrangement.is_empty() {
        return 0.0;
    }

    let placements = arrangement.placements();
    let mut score = 0.0;

    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            let distance = a.position.distance(&b.position);
            score -= (distance - OPTIMAL_PAIR_DISTANCE).abs() * DISTANCE_PENALTY_WEIGHT;
        }
    }

    score + COMPACTNESS_WEIGHT / (1.0 + arrangement.centroid().norm())
}

/// Maps a fitness value into `[0, 1]`.
///
/// NaN maps to 0.
pub fn confidence(fitness: f64) -> f64 {
    let value = (fitness + 100.0) / 200.0;
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Confidence of an optional solution; no solution means zero confidence.
pub fn solution_confidence(solution: Option<&Arrangement>) -> f64 {
    match solution {
        Some(arrangement) if !arrangement.is_empty() => confidence(fitness(arrangement)),
        _ => 0.0,
    }
}
