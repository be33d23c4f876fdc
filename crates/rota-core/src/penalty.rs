//! Penalty scoring for slot candidates.
//!
//! `penalty = same_day + day_before + total_shifts + known_partner
//!            + same_group + same_task`, each term an occurrence count times
//! its configured weight. All integer arithmetic; lower is better. The exact
//! weights are policy, so they live in [`PenaltyWeights`] and never in code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::AssignmentLedger;
use crate::plan::DayPlan;
use crate::roster::Worker;

/// Configurable weights for every penalty term.
///
/// Defaults follow the reference policy: working twice in one day is the
/// cardinal sin, balanced total load matters a lot, repeated pairings and
/// same-cohort crews matter a little.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    /// Per appearance earlier today.
    #[serde(default = "default_same_day")]
    pub same_day: u64,
    /// Per appearance on the previous day.
    #[serde(default = "default_day_before")]
    pub day_before: u64,
    /// Per prior assignment of any task.
    #[serde(default = "default_total_shifts")]
    pub total_shifts: u64,
    /// Per already-placed co-worker this candidate has worked with before.
    #[serde(default = "default_known_partner")]
    pub known_partner: u64,
    /// Per already-placed co-worker sharing the candidate's group tag.
    #[serde(default = "default_same_group")]
    pub same_group: u64,
    /// Per prior assignment of the slot's own task.
    #[serde(default = "default_same_task")]
    pub same_task: u64,
    /// Per-task overrides of `same_task`, e.g. breakfast heavier than lunch.
    #[serde(default)]
    pub same_task_overrides: BTreeMap<String, u64>,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            same_day: default_same_day(),
            day_before: default_day_before(),
            total_shifts: default_total_shifts(),
            known_partner: default_known_partner(),
            same_group: default_same_group(),
            same_task: default_same_task(),
            same_task_overrides: BTreeMap::new(),
        }
    }
}

impl PenaltyWeights {
    /// The `same_task` weight for a given task.
    #[must_use]
    pub fn same_task_for(&self, task: &str) -> u64 {
        self.same_task_overrides
            .get(task)
            .copied()
            .unwrap_or(self.same_task)
    }
}

/// Everything about the slot being filled that scoring needs to see.
///
/// `today` holds the current day's already completed slots; the one being
/// filled is not in it. `yesterday` is the previous calendar day, if any.
/// No older history is ever consulted.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    pub task: &'a str,
    pub today: &'a DayPlan,
    pub yesterday: Option<&'a DayPlan>,
}

/// The scoring model: immutable weights plus the group-term capability flag.
#[derive(Debug, Clone)]
pub struct PenaltyModel<'a> {
    weights: &'a PenaltyWeights,
    score_groups: bool,
}

impl<'a> PenaltyModel<'a> {
    /// `score_groups` should be true only when the roster carries group
    /// tags; otherwise the term is dead weight.
    #[must_use]
    pub fn new(weights: &'a PenaltyWeights, score_groups: bool) -> Self {
        Self {
            weights,
            score_groups,
        }
    }

    /// Penalty for placing `candidate` into the slot, given the workers
    /// already placed there. Callers must not pass a candidate that is
    /// already placed.
    #[must_use]
    pub fn score(
        &self,
        candidate: &Worker,
        placed: &[&Worker],
        ledger: &AssignmentLedger,
        ctx: &SlotContext<'_>,
    ) -> u64 {
        let w = self.weights;
        let mut penalty = 0u64;

        penalty += ctx.today.appearances(&candidate.id) as u64 * w.same_day;

        if let Some(yesterday) = ctx.yesterday {
            penalty += yesterday.appearances(&candidate.id) as u64 * w.day_before;
        }

        penalty += u64::from(ledger.total_count(&candidate.id)) * w.total_shifts;

        let placed_ids: Vec<String> = placed.iter().map(|p| p.id.clone()).collect();
        penalty += ledger.known_partner_count(&candidate.id, &placed_ids) * w.known_partner;

        if self.score_groups {
            if let Some(group) = &candidate.group {
                let same_group = placed
                    .iter()
                    .filter(|p| p.group.as_ref() == Some(group))
                    .count() as u64;
                penalty += same_group * w.same_group;
            }
        }

        penalty +=
            u64::from(ledger.task_count(&candidate.id, ctx.task)) * w.same_task_for(ctx.task);

        penalty
    }
}

const fn default_same_day() -> u64 {
    200
}

const fn default_day_before() -> u64 {
    50
}

const fn default_total_shifts() -> u64 {
    100
}

const fn default_known_partner() -> u64 {
    25
}

const fn default_same_group() -> u64 {
    10
}

const fn default_same_task() -> u64 {
    50
}
