//! rota-core: roster model and penalty-driven slot assignment.
//!
//! The pipeline, outside in: [`Planner`](optimize::Planner) retries
//! [`build_week`](plan::build_week) attempts until one passes the acceptance
//! test; each attempt walks the [`Calendar`](calendar::Calendar) and fills
//! slots via scored or constraint-filtered random picks, with all per-worker
//! bookkeeping in an attempt-scoped [`AssignmentLedger`](ledger::AssignmentLedger).
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums in the library, `anyhow::Result` at the
//!   binary boundary.
//! - **Logging**: `tracing` macros (`info!`, `debug!`, `trace!`).
//! - **Randomness**: one `StdRng` per run, seeded from configuration; a
//!   fixed seed reproduces the entire accept/reject sequence byte for byte.

#![forbid(unsafe_code)]

pub mod assign;
pub mod calendar;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod ledger;
pub mod optimize;
pub mod penalty;
pub mod plan;
pub mod roster;

pub use calendar::{Calendar, DaySchedule};
pub use config::{AcceptancePolicy, Objective, PlanConfig, PlanMode, load_plan_config};
pub use error::PlanError;
pub use ledger::{AssignmentLedger, WorkerEntry};
pub use optimize::{PlanOutcome, Planner};
pub use penalty::{PenaltyModel, PenaltyWeights, SlotContext};
pub use plan::{DayPlan, SlotAssignment, WeekPlan, build_week};
pub use roster::{Roster, RosterError, Worker};
