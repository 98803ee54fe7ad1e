//! Registry of in-flight solve jobs.
//!
//! The registry is the only state shared between a running solve and the
//! callers that query or cancel it. Every operation takes the lock for a
//! short, non-blocking section; the underlying map is never handed out.
//!
//! Each registration is stamped with a generation. A second registration for
//! the same puzzle supersedes the first: the earlier run sees itself as
//! cancelled at its next check, and its cleanup leaves the newer entry alone.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

/// Lifecycle state of a solve job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Registered and still the current job for its puzzle.
    Running,
    /// Cancelled by a caller or superseded by a newer solve.
    Cancelled,
    /// Ran to the end of its iteration budget.
    Completed,
}

/// Proof of one registration: puzzle id plus generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTicket {
    puzzle_id: String,
    generation: u64,
}

impl JobTicket {
    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    jobs: HashMap<String, u64>,
    next_generation: u64,
}

/// Mutex-guarded set of puzzle ids with a solve in flight.
///
/// # Example
///
/// ```
/// use puzzleforge_solver::JobRegistry;
///
/// let registry = JobRegistry::new();
/// registry.register("puzzle-1");
/// assert!(registry.is_active("puzzle-1"));
///
/// assert!(registry.cancel("puzzle-1"));
/// assert!(!registry.is_active("puzzle-1"));
/// assert!(!registry.cancel("puzzle-1"));
/// ```
#[derive(Debug, Default)]
pub struct JobRegistry {
    state: Mutex<RegistryState>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-written.
    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `puzzle_id` active and returns the ticket of this registration.
    ///
    /// Registering an id that is already active keeps it active and
    /// supersedes the earlier ticket.
    pub fn register(&self, puzzle_id: &str) -> JobTicket {
        let mut state = self.state();
        state.next_generation += 1;
        let generation = state.next_generation;

        if let Some(previous) = state.jobs.insert(puzzle_id.to_string(), generation) {
            info!(
                event = "job_superseded",
                puzzle_id = puzzle_id,
                previous_generation = previous,
                generation = generation,
            );
        } else {
            debug!(event = "job_registered", puzzle_id = puzzle_id, generation = generation);
        }

        JobTicket {
            puzzle_id: puzzle_id.to_string(),
            generation,
        }
    }

    /// Returns true if a solve for `puzzle_id` is in flight.
    pub fn is_active(&self, puzzle_id: &str) -> bool {
        self.state().jobs.contains_key(puzzle_id)
    }

    /// Returns true if `ticket` is still the registered job for its puzzle.
    pub fn is_current(&self, ticket: &JobTicket) -> bool {
        self.state().jobs.get(&ticket.puzzle_id) == Some(&ticket.generation)
    }

    /// Cancels the job for `puzzle_id`.
    ///
    /// Returns true iff a job was active; the entry is removed either way.
    pub fn cancel(&self, puzzle_id: &str) -> bool {
        let removed = self.state().jobs.remove(puzzle_id).is_some();
        if removed {
            info!(event = "job_cancelled", puzzle_id = puzzle_id);
        }
        removed
    }

    /// Removes `puzzle_id` regardless of which registration owns it.
    pub fn deregister(&self, puzzle_id: &str) {
        self.state().jobs.remove(puzzle_id);
    }

    /// Removes the entry only if `ticket` is still the current registration.
    ///
    /// Returns false when the job was cancelled or superseded in the meantime.
    pub fn release(&self, ticket: &JobTicket) -> bool {
        let mut state = self.state();
        let current = state.jobs.get(&ticket.puzzle_id) == Some(&ticket.generation);
        if current {
            state.jobs.remove(&ticket.puzzle_id);
        }
        debug!(
            event = "job_released",
            puzzle_id = ticket.puzzle_id.as_str(),
            generation = ticket.generation,
            current = current,
        );
        current
    }

    /// Number of puzzles with a solve in flight.
    pub fn active_count(&self) -> usize {
        self.state().jobs.len()
    }

    /// Registers `puzzle_id` and returns a guard that releases it on drop.
    pub fn start_job(&self, puzzle_id: &str) -> ActiveJob<'_> {
        let ticket = self.register(puzzle_id);
        ActiveJob {
            registry: self,
            ticket,
            released: false,
        }
    }
}

/// Scoped registration of a running solve.
///
/// Dropping the guard releases the registration, so every exit path of a
/// solve (normal return, `?` propagation, panic unwinding) leaves no stale
/// entry behind.
#[derive(Debug)]
pub struct ActiveJob<'r> {
    registry: &'r JobRegistry,
    ticket: JobTicket,
    released: bool,
}

impl ActiveJob<'_> {
    pub fn puzzle_id(&self) -> &str {
        self.ticket.puzzle_id()
    }

    pub fn ticket(&self) -> &JobTicket {
        &self.ticket
    }

    /// True once the job was cancelled or superseded.
    pub fn is_cancelled(&self) -> bool {
        !self.registry.is_current(&self.ticket)
    }

    pub fn status(&self) -> JobStatus {
        if self.is_cancelled() {
            JobStatus::Cancelled
        } else {
            JobStatus::Running
        }
    }

    /// Releases the registration and reports how the job ended.
    pub fn finish(mut self) -> JobStatus {
        self.released = true;
        if self.registry.release(&self.ticket) {
            JobStatus::Completed
        } else {
            JobStatus::Cancelled
        }
    }
}

impl Drop for ActiveJob<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.registry.release(&self.ticket);
        }
    }
}
