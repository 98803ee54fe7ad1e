//! Search algorithm selection.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PuzzleForgeError;

/// The closed set of search strategies a solve can run.
///
/// Parsed from the request names `"genetic"`, `"simulated_annealing"` and
/// `"heuristic"`. The legacy name `"reinforcement_learning"` selects the
/// heuristic restart strategy; no learning takes place.
///
/// # Example
///
/// ```
/// use puzzleforge_core::Algorithm;
///
/// let algorithm: Algorithm = "simulated_annealing".parse().unwrap();
/// assert_eq!(algorithm, Algorithm::SimulatedAnnealing);
/// assert!("quantum".parse::<Algorithm>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    /// Population-based search with elitism, tournament selection,
    /// single-point crossover and mutation.
    #[default]
    Genetic,

    /// Single-solution search with Metropolis acceptance and geometric cooling.
    SimulatedAnnealing,

    /// Independent restarts of the size-biased heuristic construction.
    #[cfg_attr(feature = "serde", serde(alias = "reinforcement_learning"))]
    Heuristic,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Genetic,
        Algorithm::SimulatedAnnealing,
        Algorithm::Heuristic,
    ];

    /// Canonical request name.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Genetic => "genetic",
            Algorithm::SimulatedAnnealing => "simulated_annealing",
            Algorithm::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PuzzleForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "genetic" => Ok(Algorithm::Genetic),
            "simulated_annealing" => Ok(Algorithm::SimulatedAnnealing),
            "heuristic" | "reinforcement_learning" => Ok(Algorithm::Heuristic),
            other => Err(PuzzleForgeError::InvalidArgument(format!(
                "unknown algorithm: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_parse_legacy_alias() {
        let algorithm: Algorithm = "reinforcement_learning".parse().unwrap();
        assert_eq!(algorithm, Algorithm::Heuristic);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "quantum".parse::<Algorithm>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid argument: unknown algorithm: quantum");
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Genetic".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_default_is_genetic() {
        assert_eq!(Algorithm::default(), Algorithm::Genetic);
    }
}
