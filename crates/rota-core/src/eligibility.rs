//! Rotation-mode candidate filtering.
//!
//! A worker may join a slot only when all of these hold:
//! 1. not already placed in this slot,
//! 2. the rotation availability flag is set,
//! 3. they have not done this task type yet this cycle,
//! 4. their partner history does not intersect the slot's accumulated
//!    partner pool (the union of all placed workers' partners).
//!
//! Rule 4 is intentionally about *shared prior partners*, not direct
//! pairings: two workers who both cooked with the same third person last
//! time are kept apart too.

use std::collections::HashSet;

use crate::ledger::AssignmentLedger;
use crate::roster::{Roster, Worker};

/// Candidates for the slot, in roster order.
#[must_use]
pub fn eligible_workers<'r>(
    roster: &'r Roster,
    ledger: &AssignmentLedger,
    task: &str,
    placed: &HashSet<&str>,
    slot_partners: &HashSet<String>,
) -> Vec<&'r Worker> {
    roster
        .workers()
        .iter()
        .filter(|w| !placed.contains(w.id.as_str()))
        .filter(|w| ledger.is_available(&w.id))
        .filter(|w| ledger.task_count(&w.id, task) == 0)
        .filter(|w| {
            ledger
                .partners(&w.id)
                .iter()
                .all(|p| !slot_partners.contains(p))
        })
        .collect()
}
