//! Per-attempt bookkeeping: who did what, with whom, at what cost.
//!
//! One ledger lives exactly as long as one plan-building attempt. Entries are
//! created lazily on first touch; reads on untouched workers return the
//! zero state (no counts, no partners, available).

use std::collections::BTreeMap;

/// Mutable bookkeeping for one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerEntry {
    /// Assignment count per task name. Absent task means zero.
    pub task_counts: BTreeMap<String, u32>,
    /// Penalty accumulated across the attempt. Only ever grows.
    pub total_penalty: u64,
    /// Multiset of co-worker ids, in assignment order. Symmetric across
    /// entries: recording (a, b) appends to both sides.
    pub partners: Vec<String>,
    /// Rotation flag: may this worker be considered for the next slot.
    pub available: bool,
}

impl Default for WorkerEntry {
    fn default() -> Self {
        Self {
            task_counts: BTreeMap::new(),
            total_penalty: 0,
            partners: Vec::new(),
            available: true,
        }
    }
}

impl WorkerEntry {
    /// Total assignments across all tasks.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.task_counts.values().sum()
    }
}

/// The attempt-scoped ledger, keyed by worker id.
///
/// `BTreeMap` keeps iteration deterministic, which matters for reproducible
/// summaries and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentLedger {
    entries: BTreeMap<String, WorkerEntry>,
}

impl AssignmentLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_mut(&mut self, id: &str) -> &mut WorkerEntry {
        self.entries.entry(id.to_string()).or_default()
    }

    /// Read access for one worker; untouched workers read as the zero state.
    #[must_use]
    pub fn entry(&self, id: &str) -> WorkerEntry {
        self.entries.get(id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn task_count(&self, id: &str, task: &str) -> u32 {
        self.entries
            .get(id)
            .and_then(|e| e.task_counts.get(task))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn total_count(&self, id: &str) -> u32 {
        self.entries.get(id).map_or(0, WorkerEntry::total_count)
    }

    #[must_use]
    pub fn total_penalty(&self, id: &str) -> u64 {
        self.entries.get(id).map_or(0, |e| e.total_penalty)
    }

    #[must_use]
    pub fn partners(&self, id: &str) -> &[String] {
        self.entries.get(id).map_or(&[], |e| e.partners.as_slice())
    }

    /// How many of `others` this worker has previously shared a slot with.
    /// Each listed co-worker counts at most once, regardless of how often
    /// the pairing occurred.
    #[must_use]
    pub fn known_partner_count(&self, id: &str, others: &[String]) -> u64 {
        let partners = self.partners(id);
        others
            .iter()
            .filter(|other| partners.contains(other))
            .count() as u64
    }

    #[must_use]
    pub fn is_available(&self, id: &str) -> bool {
        self.entries.get(id).is_none_or(|e| e.available)
    }

    /// Charge a penalty to a worker. Penalties are monotone: there is no
    /// way to take one back.
    pub fn charge_penalty(&mut self, id: &str, amount: u64) {
        self.entry_mut(id).total_penalty += amount;
    }

    /// Count one assignment of `task` against a worker.
    pub fn record_assignment(&mut self, id: &str, task: &str) {
        *self
            .entry_mut(id)
            .task_counts
            .entry(task.to_string())
            .or_insert(0) += 1;
    }

    /// Record a mutual pairing: `b` joins `a`'s partner list and vice versa.
    pub fn add_partners(&mut self, a: &str, b: &str) {
        self.entry_mut(a).partners.push(b.to_string());
        self.entry_mut(b).partners.push(a.to_string());
    }

    pub fn set_available(&mut self, id: &str, available: bool) {
        self.entry_mut(id).available = available;
    }
}
