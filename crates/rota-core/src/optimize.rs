//! The outer accept/reject loop around plan building.
//!
//! Each attempt starts from a fresh ledger, so attempts are independent; the
//! one thing they share is the seeded random source, which makes the entire
//! accept/reject sequence reproducible for a fixed seed. The loop is bounded:
//! running out of attempts is an error, never a hang.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{Objective, PlanConfig, PlanMode};
use crate::error::PlanError;
use crate::ledger::AssignmentLedger;
use crate::plan::{WeekPlan, build_week};
use crate::roster::Roster;

/// An accepted plan plus everything needed to report on it.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: WeekPlan,
    pub ledger: AssignmentLedger,
    /// How many attempts it took, the accepted one included.
    pub attempts: u64,
    /// The aggregate objective value of the accepted plan.
    pub objective: u64,
}

/// The planner: configuration plus the retry loop.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlanConfig,
}

impl Planner {
    #[must_use]
    pub const fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Generate an acceptable plan for the roster.
    ///
    /// Runs the feasibility precheck, then retries fresh attempts until one
    /// passes the acceptance test or the attempt budget runs out.
    ///
    /// # Errors
    ///
    /// [`PlanError::InsufficientRoster`] when no attempt could ever succeed;
    /// [`PlanError::ThresholdNeverMet`] when the attempt budget runs out.
    pub fn run(&self, roster: &Roster) -> Result<PlanOutcome, PlanError> {
        self.check_feasibility(roster)?;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut best_objective: Option<u64> = None;
        let mut last_rejection: Option<String> = None;

        for attempt in 1..=self.config.max_attempts {
            let (plan, ledger) = match build_week(roster, &self.config, &mut rng) {
                Ok(built) => built,
                Err(err @ PlanError::SlotUnfillable { .. }) => {
                    debug!(attempt, %err, "attempt discarded");
                    last_rejection = Some(err.to_string());
                    continue;
                }
                Err(err) => return Err(err),
            };

            let objective = self.objective_value(roster, &ledger);
            match self.acceptance_failure(roster, &ledger, objective) {
                None => {
                    info!(attempt, objective, "plan accepted");
                    return Ok(PlanOutcome {
                        plan,
                        ledger,
                        attempts: attempt,
                        objective,
                    });
                }
                Some(reason) => {
                    debug!(
                        attempt,
                        objective,
                        per_worker = objective / roster.len() as u64,
                        %reason,
                        "attempt rejected"
                    );
                    best_objective = Some(best_objective.map_or(objective, |b| b.min(objective)));
                    last_rejection = Some(reason);
                }
            }
        }

        Err(PlanError::ThresholdNeverMet {
            attempts: self.config.max_attempts,
            best_objective,
            last_rejection,
        })
    }

    /// Reject rosters that can never fill some slot, before spinning on
    /// retries. Rotation mode additionally needs enough distinct workers to
    /// cover every occurrence of a task, since nobody repeats a task type.
    fn check_feasibility(&self, roster: &Roster) -> Result<(), PlanError> {
        for task in self.config.calendar.task_names() {
            let required = self.config.required_for(&task);
            let needed = match self.config.mode {
                PlanMode::Scoring => required,
                PlanMode::Rotation => required * self.config.calendar.task_occurrences(&task),
            };
            if needed > roster.len() {
                return Err(PlanError::InsufficientRoster {
                    roster: roster.len(),
                    task,
                    needed,
                });
            }
        }
        Ok(())
    }

    /// The aggregate penalty the acceptance test compares against budget.
    fn objective_value(&self, roster: &Roster, ledger: &AssignmentLedger) -> u64 {
        let per_worker = roster.workers().iter().map(|w| ledger.total_penalty(&w.id));
        match self.config.acceptance.objective {
            Objective::Sum => per_worker.sum(),
            Objective::Max => per_worker.max().unwrap_or(0),
        }
    }

    /// `None` means accepted; `Some(reason)` explains the rejection.
    fn acceptance_failure(
        &self,
        roster: &Roster,
        ledger: &AssignmentLedger,
        objective: u64,
    ) -> Option<String> {
        match self.config.mode {
            PlanMode::Scoring => {
                let budget = match self.config.acceptance.objective {
                    Objective::Sum => {
                        self.config.acceptance.per_worker_budget * roster.len() as u64
                    }
                    Objective::Max => self.config.acceptance.per_worker_budget,
                };
                (objective > budget).then(|| format!("objective {objective} over budget {budget}"))
            }
            PlanMode::Rotation => {
                let floor = self.config.acceptance.fairness_floor;
                roster
                    .workers()
                    .iter()
                    .find(|w| ledger.total_count(&w.id) < floor)
                    .map(|w| {
                        format!(
                            "worker {} has {} assignments, below floor {floor}",
                            w.id,
                            ledger.total_count(&w.id)
                        )
                    })
            }
        }
    }
}
