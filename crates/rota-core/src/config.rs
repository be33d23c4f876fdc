//! Planner configuration: mode, calendar, crew sizes, weights, acceptance.
//!
//! Everything here is plain data with serde defaults so a TOML file only
//! needs to name the fields it changes. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::calendar::Calendar;
use crate::penalty::PenaltyWeights;

/// How slots are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Penalty scoring: every worker is always a candidate, the cheapest one
    /// (ties broken at random) wins the slot.
    #[default]
    Scoring,
    /// Hard rotation constraints and uniform random picks, no scoring.
    Rotation,
}

/// Which aggregate of per-worker penalties the optimizer compares against
/// the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Sum over all workers; accepted when `sum <= budget * roster size`.
    #[default]
    Sum,
    /// Worst single worker; accepted when `max <= budget`.
    Max,
}

/// Acceptance policy for a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptancePolicy {
    #[serde(default)]
    pub objective: Objective,
    /// Penalty allowance per roster member (scoring mode).
    #[serde(default = "default_per_worker_budget")]
    pub per_worker_budget: u64,
    /// Minimum total assignments per worker (rotation mode).
    #[serde(default = "default_fairness_floor")]
    pub fairness_floor: u32,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            objective: Objective::default(),
            per_worker_budget: default_per_worker_budget(),
            fairness_floor: default_fairness_floor(),
        }
    }
}

/// Full planner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default)]
    pub mode: PlanMode,
    #[serde(default)]
    pub calendar: Calendar,
    /// Crew size per slot unless overridden per task.
    #[serde(default = "default_required_workers")]
    pub required_workers: usize,
    /// Per-task crew-size overrides, e.g. `cleaning = 4`.
    #[serde(default)]
    pub required_overrides: BTreeMap<String, usize>,
    #[serde(default)]
    pub weights: PenaltyWeights,
    #[serde(default)]
    pub acceptance: AcceptancePolicy,
    /// Retry budget for the optimizer loop.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    /// Seed for the shared random source. Fixed seed, fixed output.
    #[serde(default)]
    pub seed: u64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            mode: PlanMode::default(),
            calendar: Calendar::default(),
            required_workers: default_required_workers(),
            required_overrides: BTreeMap::new(),
            weights: PenaltyWeights::default(),
            acceptance: AcceptancePolicy::default(),
            max_attempts: default_max_attempts(),
            seed: 0,
        }
    }
}

impl PlanConfig {
    /// Crew size for `task`.
    #[must_use]
    pub fn required_for(&self, task: &str) -> usize {
        self.required_overrides
            .get(task)
            .copied()
            .unwrap_or(self.required_workers)
    }
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_plan_config(path: &Path) -> Result<PlanConfig> {
    if !path.exists() {
        return Ok(PlanConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<PlanConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_required_workers() -> usize {
    3
}

const fn default_per_worker_budget() -> u64 {
    255
}

const fn default_fairness_floor() -> u32 {
    2
}

const fn default_max_attempts() -> u64 {
    10_000
}
