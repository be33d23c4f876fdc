//! Participant roster: the immutable worker list fed into planning.
//!
//! The input format is one worker per line, either a bare identifier or
//! `identifier,group` (group tags enable the same-group penalty term).
//! Blank lines are skipped. Duplicate identifiers are rejected: silently
//! deduping them would skew every fairness count downstream.

use serde::Serialize;

/// One participant. Immutable for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worker {
    pub id: String,
    pub group: Option<String>,
}

/// Errors from roster parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// The same identifier appeared on more than one line.
    #[error("duplicate worker {id:?} on line {line}")]
    DuplicateWorker { id: String, line: usize },

    /// No non-blank lines at all.
    #[error("roster is empty")]
    Empty,
}

/// The ordered worker list. Order is the declaration order of the input file
/// and is the tie-break order used everywhere downstream, so it matters for
/// reproducibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    workers: Vec<Worker>,
}

impl Roster {
    /// Parse roster text, one worker per line.
    ///
    /// # Errors
    ///
    /// Duplicate identifiers and all-blank input are rejected.
    pub fn parse(text: &str) -> Result<Self, RosterError> {
        let mut workers: Vec<Worker> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (id, group) = match line.split_once(',') {
                Some((id, group)) => (id.trim(), Some(group.trim().to_string())),
                None => (line, None),
            };

            if workers.iter().any(|w| w.id == id) {
                return Err(RosterError::DuplicateWorker {
                    id: id.to_string(),
                    line: idx + 1,
                });
            }

            workers.push(Worker {
                id: id.to_string(),
                group: group.filter(|g| !g.is_empty()),
            });
        }

        if workers.is_empty() {
            return Err(RosterError::Empty);
        }

        Ok(Self { workers })
    }

    /// Build a roster from pre-split parts. Mostly a test convenience.
    ///
    /// # Errors
    ///
    /// Same rules as [`Roster::parse`]: no duplicates, no empty roster.
    pub fn from_workers(workers: Vec<Worker>) -> Result<Self, RosterError> {
        for (idx, worker) in workers.iter().enumerate() {
            if workers[..idx].iter().any(|w| w.id == worker.id) {
                return Err(RosterError::DuplicateWorker {
                    id: worker.id.clone(),
                    line: idx + 1,
                });
            }
        }
        if workers.is_empty() {
            return Err(RosterError::Empty);
        }
        Ok(Self { workers })
    }

    #[must_use]
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Whether any worker carries a group tag. Gates the same-group term.
    #[must_use]
    pub fn has_groups(&self) -> bool {
        self.workers.iter().any(|w| w.group.is_some())
    }
}
