//! Building one full plan attempt across the calendar.
//!
//! Days and tasks are walked in declared order; that order is what defines
//! "earlier today" and "yesterday" for the penalty terms. Only the current
//! day in progress and the previous completed day are ever consulted, a
//! two-day rolling window.

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;
use tracing::trace;

use crate::assign::fill_slot;
use crate::config::{PlanConfig, PlanMode};
use crate::error::PlanError;
use crate::ledger::AssignmentLedger;
use crate::penalty::{PenaltyModel, SlotContext};
use crate::roster::Roster;

/// The workers assigned to one (day, task) slot, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAssignment {
    pub task: String,
    pub workers: Vec<String>,
}

/// All slots of one day, in calendar order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    pub day: String,
    pub slots: Vec<SlotAssignment>,
}

impl DayPlan {
    /// How many of this day's slots contain the worker.
    #[must_use]
    pub fn appearances(&self, worker_id: &str) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.workers.iter().any(|w| w == worker_id))
            .count()
    }

    /// Every worker assigned anywhere on this day.
    #[must_use]
    pub fn assigned_workers(&self) -> BTreeSet<String> {
        self.slots
            .iter()
            .flat_map(|slot| slot.workers.iter().cloned())
            .collect()
    }
}

/// A completed plan for the whole cycle. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekPlan {
    pub days: Vec<DayPlan>,
}

/// Build one complete plan from a fresh ledger.
///
/// Returns the plan together with the ledger that produced it, so callers
/// can evaluate fairness. Any unfillable slot aborts the whole attempt.
///
/// # Errors
///
/// Propagates [`PlanError::SlotUnfillable`] from the failing slot.
pub fn build_week<R: Rng>(
    roster: &Roster,
    config: &PlanConfig,
    rng: &mut R,
) -> Result<(WeekPlan, AssignmentLedger), PlanError> {
    let mut ledger = AssignmentLedger::new();
    let model = PenaltyModel::new(&config.weights, roster.has_groups());
    let mut week = WeekPlan { days: Vec::new() };
    // Rotation mode: the set that becomes available again at the next day
    // boundary, i.e. everyone who worked the previous day.
    let mut resting: BTreeSet<String> = BTreeSet::new();

    for day in &config.calendar.days {
        let mut today = DayPlan {
            day: day.name.clone(),
            slots: Vec::new(),
        };

        for task in &day.tasks {
            let required = config.required_for(task);
            let ctx = SlotContext {
                task,
                today: &today,
                yesterday: week.days.last(),
            };

            let workers = fill_slot(roster, &mut ledger, config.mode, &model, &ctx, required, rng)?;
            trace!(day = %day.name, task = %task, workers = ?workers, "slot filled");

            today.slots.push(SlotAssignment {
                task: task.clone(),
                workers,
            });
        }

        if config.mode == PlanMode::Rotation {
            for id in &resting {
                ledger.set_available(id, true);
            }
            resting = today.assigned_workers();
        }

        week.days.push(today);
    }

    Ok((week, ledger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Calendar, DaySchedule};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_meal_config() -> PlanConfig {
        PlanConfig {
            calendar: Calendar {
                days: vec![
                    DaySchedule::new("monday", &["breakfast", "dinner"]),
                    DaySchedule::new("tuesday", &["breakfast", "dinner"]),
                ],
            },
            required_workers: 2,
            ..PlanConfig::default()
        }
    }

    #[test]
    fn builds_every_slot_in_calendar_order() {
        let roster = Roster::parse("alice\nbob\ncarol\ndan\neve\nfay\n").expect("roster");
        let config = two_meal_config();
        let mut rng = StdRng::seed_from_u64(1);

        let (week, _ledger) = build_week(&roster, &config, &mut rng).expect("plan");

        assert_eq!(week.days.len(), 2);
        for day in &week.days {
            assert_eq!(day.slots[0].task, "breakfast");
            assert_eq!(day.slots[1].task, "dinner");
            for slot in &day.slots {
                assert_eq!(slot.workers.len(), 2);
            }
        }
    }

    #[test]
    fn ledger_counts_match_the_emitted_plan() {
        let roster = Roster::parse("alice\nbob\ncarol\ndan\neve\nfay\n").expect("roster");
        let config = two_meal_config();
        let mut rng = StdRng::seed_from_u64(2);

        let (week, ledger) = build_week(&roster, &config, &mut rng).expect("plan");

        for worker in roster.workers() {
            let in_plan: usize = week.days.iter().map(|d| d.appearances(&worker.id)).sum();
            assert_eq!(ledger.total_count(&worker.id) as usize, in_plan);
        }
    }

    #[test]
    fn rotation_restores_availability_one_day_later() {
        // One task per day, crew of 3, 12 workers: each worker can do the
        // task at most once, so all 12 get used and every slot stays
        // fillable despite the rest rule.
        let mut names = String::new();
        for i in 0..12 {
            names.push_str(&format!("w{i:02}\n"));
        }
        let roster = Roster::parse(&names).expect("roster");

        let config = PlanConfig {
            mode: PlanMode::Rotation,
            calendar: Calendar {
                days: (1..=4)
                    .map(|i| DaySchedule::new(&format!("day{i}"), &["kitchen"]))
                    .collect(),
            },
            required_workers: 3,
            ..PlanConfig::default()
        };

        let mut rng = StdRng::seed_from_u64(3);
        let (week, ledger) = build_week(&roster, &config, &mut rng).expect("plan");

        // Consecutive days never share a worker: day-d assignees rest on
        // day d+1 and only become available again at the next boundary.
        for pair in week.days.windows(2) {
            let first = pair[0].assigned_workers();
            let second = pair[1].assigned_workers();
            assert!(first.is_disjoint(&second));
        }

        // 4 slots x 3 seats over 12 workers, one kitchen shift each.
        for worker in roster.workers() {
            assert_eq!(ledger.total_count(&worker.id), 1);
        }
    }

    #[test]
    fn rotation_failure_propagates_from_the_slot() {
        // 4 workers, crew of 3, two tasks the same day: the second slot can
        // only draw from the single rested worker.
        let roster = Roster::parse("alice\nbob\ncarol\ndan\n").expect("roster");
        let config = PlanConfig {
            mode: PlanMode::Rotation,
            calendar: Calendar {
                days: vec![DaySchedule::new("monday", &["breakfast", "dinner"])],
            },
            required_workers: 3,
            ..PlanConfig::default()
        };

        let mut rng = StdRng::seed_from_u64(4);
        let err = build_week(&roster, &config, &mut rng).expect_err("unfillable");
        assert!(matches!(
            err,
            PlanError::SlotUnfillable { ref task, .. } if task == "dinner"
        ));
    }
}
