//! Results reported back to the surrounding service.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arrangement::Arrangement;
use crate::fitness::solution_confidence;

/// Outcome of one solve call.
///
/// Built once at the end of a solve and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult {
    puzzle_id: String,
    solved: bool,
    solution: Option<Arrangement>,
    confidence: f64,
    processing_time: f64,
}

impl SolveResult {
    /// Assembles a result; `solved` and `confidence` are derived from `solution`.
    pub fn new(
        puzzle_id: impl Into<String>,
        solution: Option<Arrangement>,
        processing_time: Duration,
    ) -> Self {
        let solution = solution.filter(|a| !a.is_empty());
        Self {
            puzzle_id: puzzle_id.into(),
            solved: solution.is_some(),
            confidence: solution_confidence(solution.as_ref()),
            solution,
            processing_time: processing_time.as_secs_f64(),
        }
    }

    /// Result for a puzzle that produced no arrangement.
    pub fn unsolved(puzzle_id: impl Into<String>, processing_time: Duration) -> Self {
        Self::new(puzzle_id, None, processing_time)
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn solution(&self) -> Option<&Arrangement> {
        self.solution.as_ref()
    }

    pub fn into_solution(self) -> Option<Arrangement> {
        self.solution
    }

    /// Quality score in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Wall-clock seconds spent in the solve call.
    pub fn processing_time(&self) -> f64 {
        self.processing_time
    }
}

/// Whether a puzzle currently has a solve in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveStatus {
    pub puzzle_id: String,
    pub is_solving: bool,
}

impl SolveStatus {
    pub fn new(puzzle_id: impl Into<String>, is_solving: bool) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            is_solving,
        }
    }

    /// `"solving"` or `"idle"`.
    pub fn status(&self) -> &'static str {
        if self.is_solving {
            "solving"
        } else {
            "idle"
        }
    }
}
