//! Piece descriptors produced by the upstream feature extraction pipeline.
//!
//! The search engine only ever reads `id` and `shape_area`; every other
//! field is carried through untouched.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A real-valued 3D vector used for positions, rotations and dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Vector3) -> f64 {
        (*self - *other).norm()
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Immutable descriptor of a single puzzle piece.
///
/// # Example
///
/// ```
/// use puzzleforge_core::PuzzlePiece;
///
/// let piece = PuzzlePiece::new("corner-1", 12.5);
/// assert_eq!(piece.id, "corner-1");
/// assert_eq!(piece.shape_area, 12.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PuzzlePiece {
    /// Stable identifier, unique within a puzzle.
    pub id: String,
    /// Non-negative area used for size-based ordering.
    pub shape_area: f64,
    /// Source image of the piece, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_path: Option<String>,
    /// Bounding dimensions reported by the extraction pipeline.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dimensions: Option<Vector3>,
    /// Dominant RGB values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub color_profile: Vec<[u8; 3]>,
}

impl PuzzlePiece {
    /// Creates a piece with only the fields the search engine reads.
    pub fn new(id: impl Into<String>, shape_area: f64) -> Self {
        Self {
            id: id.into(),
            shape_area,
            image_path: None,
            dimensions: None,
            color_profile: Vec::new(),
        }
    }

    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_dimensions(mut self, dimensions: Vector3) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_color_profile(mut self, colors: Vec<[u8; 3]>) -> Self {
        self.color_profile = colors;
        self
    }
}
