//! Search statistics.
//!
//! Counters shared by every strategy; the driver owns one instance per solve.

use std::time::{Duration, Instant};

/// Aggregate metrics of one search run.
///
/// # Example
///
/// ```
/// use puzzleforge_solver::SearchStats;
///
/// let mut stats = SearchStats::default();
/// stats.start();
/// stats.record_iteration();
/// stats.record_move(true);
/// stats.record_move(false);
/// stats.record_evaluations(10);
///
/// assert_eq!(stats.iterations, 1);
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.moves_accepted, 1);
/// assert_eq!(stats.evaluations, 10);
/// assert_eq!(stats.acceptance_rate(), 0.5);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    start_time: Option<Instant>,
    /// Completed iterations (generations, annealing steps or restarts).
    pub iterations: u64,
    /// Fitness evaluations performed.
    pub evaluations: u64,
    /// Candidate moves evaluated (annealing neighbors, restart candidates).
    pub moves_evaluated: u64,
    /// Candidate moves accepted.
    pub moves_accepted: u64,
    /// Times the best-so-far arrangement was replaced.
    pub improvements: u64,
}

impl SearchStats {
    /// Marks the start of the search.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Elapsed time since [`start`](Self::start), zero if never started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_iteration(&mut self) {
        self.iterations += 1;
    }

    pub fn record_evaluations(&mut self, count: u64) {
        self.evaluations += count;
    }

    /// Records a move evaluation and whether it was accepted.
    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn record_improvement(&mut self) {
        self.improvements += 1;
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }

    /// Fitness evaluations per second of elapsed time.
    pub fn evaluations_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.evaluations as f64 / secs
        } else {
            0.0
        }
    }
}
