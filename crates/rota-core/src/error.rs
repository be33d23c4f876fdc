//! Planning errors.
//!
//! `SlotUnfillable` is recoverable: the optimizer discards the attempt and
//! retries from a fresh ledger. The other two end the run.

/// Errors from plan building and the optimizer loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A slot ran out of eligible candidates mid-fill. Local to one attempt.
    #[error("no eligible worker for {task} on {day} ({assigned} of {required} placed)")]
    SlotUnfillable {
        day: String,
        task: String,
        assigned: usize,
        required: usize,
    },

    /// The roster can never fill some slot, no matter how often we retry.
    /// Caught by the feasibility precheck before the loop starts.
    #[error("roster of {roster} workers cannot staff {task} (needs {needed})")]
    InsufficientRoster {
        roster: usize,
        task: String,
        needed: usize,
    },

    /// The retry budget ran out without an acceptable plan.
    #[error("no acceptable plan within {attempts} attempts")]
    ThresholdNeverMet {
        attempts: u64,
        /// Best objective value seen across completed attempts, if any.
        best_objective: Option<u64>,
        /// Why the most recent attempt was discarded.
        last_rejection: Option<String>,
    },
}
