//! Rendering of an accepted plan: pretty for humans, compact text for
//! pipes, stable JSON for machines.
//!
//! The pretty layout mirrors the printed roster people pin to the kitchen
//! door: one banner per day, one line per task, then the per-worker summary
//! table for fairness review.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use rota_core::{PlanConfig, PlanMode, PlanOutcome, Roster, WeekPlan};

/// Width of the `#`-filled day banners in pretty output.
const DAY_BANNER_WIDTH: usize = 34;

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized roster with banners and a summary table.
    Pretty,
    /// Tab-separated lines for pipes and scripts.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// One row of the fairness summary.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerSummary {
    pub id: String,
    pub group: Option<String>,
    pub task_counts: BTreeMap<String, u32>,
    pub total: u32,
    pub penalty: u64,
}

/// Everything the renderers need, and the exact shape of the JSON output.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub plan: &'a WeekPlan,
    pub summary: Vec<WorkerSummary>,
    /// Workers grouped by total load, lightest first. Rotation mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_distribution: Option<BTreeMap<u32, Vec<String>>>,
    pub attempts: u64,
    pub objective: u64,
}

/// Assemble the report from an accepted outcome.
#[must_use]
pub fn build_report<'a>(
    outcome: &'a PlanOutcome,
    roster: &Roster,
    config: &PlanConfig,
) -> Report<'a> {
    let tasks = config.calendar.task_names();
    let summary: Vec<WorkerSummary> = roster
        .workers()
        .iter()
        .map(|worker| {
            let task_counts: BTreeMap<String, u32> = tasks
                .iter()
                .map(|task| (task.clone(), outcome.ledger.task_count(&worker.id, task)))
                .collect();
            WorkerSummary {
                id: worker.id.clone(),
                group: worker.group.clone(),
                total: outcome.ledger.total_count(&worker.id),
                penalty: outcome.ledger.total_penalty(&worker.id),
                task_counts,
            }
        })
        .collect();

    let load_distribution = (config.mode == PlanMode::Rotation).then(|| {
        let mut by_load: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for row in &summary {
            by_load.entry(row.total).or_default().push(row.id.clone());
        }
        by_load
    });

    Report {
        plan: &outcome.plan,
        summary,
        load_distribution,
        attempts: outcome.attempts,
        objective: outcome.objective,
    }
}

/// Render the report in the requested mode.
///
/// # Errors
///
/// Propagates I/O failures from the writer and JSON serialization errors.
pub fn render(
    w: &mut dyn Write,
    mode: OutputMode,
    report: &Report<'_>,
    config: &PlanConfig,
) -> Result<()> {
    match mode {
        OutputMode::Pretty => render_pretty(w, report, config),
        OutputMode::Text => render_text(w, report),
        OutputMode::Json => {
            writeln!(w, "{}", serde_json::to_string_pretty(report)?)?;
            Ok(())
        }
    }
}

fn render_pretty(w: &mut dyn Write, report: &Report<'_>, config: &PlanConfig) -> Result<()> {
    for day in &report.plan.days {
        writeln!(w, "{:#^width$}", format!("  {}  ", day.day), width = DAY_BANNER_WIDTH)?;
        for slot in &day.slots {
            let mut names = slot.workers.clone();
            names.sort();
            let line = names
                .iter()
                .map(|id| annotate(id, report))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(w, "  {:<15}: {line}", slot.task)?;
        }
        writeln!(w)?;
    }

    render_summary_table(w, report, config)?;

    if let Some(by_load) = &report.load_distribution {
        render_load_distribution(w, by_load)?;
    }

    writeln!(
        w,
        "\naccepted after {} attempt{} (objective {})",
        report.attempts,
        if report.attempts == 1 { "" } else { "s" },
        report.objective
    )?;
    Ok(())
}

/// `name` or `name (group)`.
fn annotate(id: &str, report: &Report<'_>) -> String {
    report
        .summary
        .iter()
        .find(|row| row.id == id)
        .and_then(|row| row.group.as_ref())
        .map_or_else(|| id.to_string(), |group| format!("{id} ({group})"))
}

fn render_summary_table(w: &mut dyn Write, report: &Report<'_>, config: &PlanConfig) -> Result<()> {
    let tasks = config.calendar.task_names();

    write!(w, "{:<25}", "Name")?;
    for task in &tasks {
        write!(w, " {task}")?;
    }
    writeln!(w, " {:>5} {:>7}", "total", "penalty")?;

    for row in &report.summary {
        write!(w, "{:<25}", row.id)?;
        for task in &tasks {
            let count = row.task_counts.get(task).copied().unwrap_or(0);
            write!(w, " {count:>width$}", width = task.len())?;
        }
        writeln!(w, " {:>5} {:>7}", row.total, row.penalty)?;
    }
    Ok(())
}

/// Rotation mode: group workers by total load, lightest first, so the
/// organizers can spot who got off easy this cycle.
fn render_load_distribution(w: &mut dyn Write, by_load: &BTreeMap<u32, Vec<String>>) -> Result<()> {
    writeln!(w, "\nLoad distribution:")?;
    for (load, ids) in by_load {
        writeln!(w, "  {load} shifts: {}", ids.join(", "))?;
    }
    Ok(())
}

fn render_text(w: &mut dyn Write, report: &Report<'_>) -> Result<()> {
    for day in &report.plan.days {
        for slot in &day.slots {
            writeln!(w, "{}\t{}\t{}", day.day, slot.task, slot.workers.join(","))?;
        }
    }
    for row in &report.summary {
        writeln!(w, "{}\t{}\t{}", row.id, row.total, row.penalty)?;
    }
    if let Some(by_load) = &report.load_distribution {
        for (load, ids) in by_load {
            writeln!(w, "load\t{load}\t{}", ids.join(","))?;
        }
    }
    Ok(())
}
