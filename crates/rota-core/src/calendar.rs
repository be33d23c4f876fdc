//! The fixed duty calendar: ordered days, each with an ordered task list.
//!
//! Declaration order is load-bearing. The plan builder walks days and tasks
//! in exactly this order, and the penalty model's same-day / day-before terms
//! are defined relative to it.

use serde::{Deserialize, Serialize};

/// One calendar day: its name and the tasks run that day, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub name: String,
    pub tasks: Vec<String>,
}

impl DaySchedule {
    /// Convenience constructor used by tests and the default calendar.
    #[must_use]
    pub fn new(name: &str, tasks: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            tasks: tasks.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The full cycle calendar. Static configuration, never derived data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub days: Vec<DaySchedule>,
}

impl Default for Calendar {
    /// The classic seminar week: arrival Sunday through departure Sunday,
    /// three meals a day except a breakfast-only departure day.
    fn default() -> Self {
        const FULL: [&str; 3] = ["breakfast", "lunch", "dinner"];
        let mut days: Vec<DaySchedule> = [
            "sunday_arrival",
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
        ]
        .iter()
        .map(|name| DaySchedule::new(name, &FULL))
        .collect();
        days.push(DaySchedule::new("sunday_departure", &["breakfast"]));
        Self { days }
    }
}

impl Calendar {
    /// Distinct task names in first-appearance order.
    #[must_use]
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for day in &self.days {
            for task in &day.tasks {
                if !names.contains(task) {
                    names.push(task.clone());
                }
            }
        }
        names
    }

    /// How many times `task` occurs across the whole cycle.
    #[must_use]
    pub fn task_occurrences(&self, task: &str) -> usize {
        self.days
            .iter()
            .map(|day| day.tasks.iter().filter(|t| *t == task).count())
            .sum()
    }

    /// Total number of slots in the cycle.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|day| day.tasks.len()).sum()
    }
}
