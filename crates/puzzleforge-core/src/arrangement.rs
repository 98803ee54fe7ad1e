//! Placements and arrangements.
//!
//! An [`Arrangement`] is one candidate answer: a position and rotation for
//! every piece of a puzzle. Placement order is free, but a non-empty
//! arrangement always holds exactly one placement per input piece.

use std::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PuzzleForgeError, Result};
use crate::piece::Vector3;

/// Position and rotation of a single piece.
///
/// Rotation is in degrees and is never normalized; repeated perturbation may
/// drift it outside `[0, 360)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub piece_id: String,
    pub position: Vector3,
    pub rotation: Vector3,
}

impl Placement {
    pub fn new(piece_id: impl Into<String>, position: Vector3, rotation: Vector3) -> Self {
        Self {
            piece_id: piece_id.into(),
            position,
            rotation,
        }
    }

    /// Creates a placement at `position` with zero rotation.
    pub fn at(piece_id: impl Into<String>, position: Vector3) -> Self {
        Self::new(piece_id, position, Vector3::ZERO)
    }
}

/// Ordered sequence of placements, one per piece.
///
/// # Example
///
/// ```
/// use puzzleforge_core::{Arrangement, Placement, Vector3};
///
/// let arrangement: Arrangement = vec![
///     Placement::at("a", Vector3::new(-1.0, 0.0, 0.0)),
///     Placement::at("b", Vector3::new(1.0, 0.0, 0.0)),
/// ]
/// .into();
///
/// assert_eq!(arrangement.len(), 2);
/// assert_eq!(arrangement.centroid(), Vector3::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Arrangement {
    placements: Vec<Placement>,
}

impl Arrangement {
    pub fn new(placements: Vec<Placement>) -> Self {
        Self { placements }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            placements: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placements_mut(&mut self) -> &mut [Placement] {
        &mut self.placements
    }

    pub fn iter(&self) -> slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    pub fn into_placements(self) -> Vec<Placement> {
        self.placements
    }

    /// Mean of all positions; the origin for an empty arrangement.
    pub fn centroid(&self) -> Vector3 {
        if self.placements.is_empty() {
            return Vector3::ZERO;
        }
        let sum = self
            .placements
            .iter()
            .fold(Vector3::ZERO, |acc, p| acc + p.position);
        sum.scale(1.0 / self.placements.len() as f64)
    }

    /// Checks that a non-empty arrangement covers exactly `piece_count` pieces
    /// and holds only finite coordinates.
    pub fn validate(&self, piece_count: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        if self.len() != piece_count {
            return Err(PuzzleForgeError::Compute(format!(
                "arrangement has {} placements for {} pieces",
                self.len(),
                piece_count
            )));
        }
        if let Some(bad) = self
            .placements
            .iter()
            .find(|p| !p.position.is_finite() || !p.rotation.is_finite())
        {
            return Err(PuzzleForgeError::Compute(format!(
                "non-finite placement for piece {}",
                bad.piece_id
            )));
        }
        Ok(())
    }
}

impl From<Vec<Placement>> for Arrangement {
    fn from(placements: Vec<Placement>) -> Self {
        Self::new(placements)
    }
}

impl FromIterator<Placement> for Arrangement {
    fn from_iter<I: IntoIterator<Item = Placement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Arrangement {
    type Item = &'a Placement;
    type IntoIter = slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

impl IntoIterator for Arrangement {
    type Item = Placement;
    type IntoIter = std::vec::IntoIter<Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Arrangement {
        (0..n)
            .map(|i| Placement::at(format!("p{i}"), Vector3::new(i as f64, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_centroid() {
        let arrangement = line(3);
        assert_eq!(arrangement.centroid(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(Arrangement::default().centroid(), Vector3::ZERO);
    }

    #[test]
    fn test_validate_matching_length() {
        assert!(line(4).validate(4).is_ok());
    }

    #[test]
    fn test_validate_empty_is_no_solution() {
        assert!(Arrangement::default().validate(7).is_ok());
    }

    #[test]
    fn test_validate_length_mismatch() {
        let err = line(2).validate(3).unwrap_err();
        assert!(matches!(err, PuzzleForgeError::Compute(_)));
    }

    #[test]
    fn test_validate_non_finite() {
        let mut arrangement = line(2);
        arrangement.placements_mut()[1].rotation.y = f64::NAN;
        assert!(arrangement.validate(2).is_err());
    }

    #[test]
    fn test_iteration_order() {
        let ids: Vec<_> = line(3).iter().map(|p| p.piece_id.clone()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2"]);
    }
}
