#![forbid(unsafe_code)]

mod output;

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::OutputMode;
use rota_core::{PlanConfig, PlanError, PlanMode, Planner, Roster, load_plan_config};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rota: randomized duty-roster planner",
    long_about = None,
    after_help = "EXAMPLES:\n    # Plan the default week for a participant list\n    rota participants.txt\n\n    # Reproducible plan with an explicit seed\n    rota participants.txt --seed 7\n\n    # Rotation mode with machine-readable output\n    rota participants.txt --rotation --format json"
)]
struct Cli {
    /// Participant list: one worker per line, `name` or `name,group`.
    roster: PathBuf,

    /// TOML config with calendar, weights, and acceptance thresholds.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed; a fixed seed reproduces the whole run.
    #[arg(long)]
    seed: Option<u64>,

    /// Retry budget for the optimizer loop.
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Rotation mode: hard constraints and uniform picks instead of scoring.
    #[arg(long)]
    rotation: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "pretty")]
    format: OutputMode,

    /// Shortcut for `--format json`.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            self.format
        }
    }

    /// Fold command-line overrides into the loaded configuration.
    fn apply_to(&self, config: &mut PlanConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        if self.rotation {
            config.mode = PlanMode::Rotation;
        }
    }
}

/// Resolve the effective configuration. A config file named on the command
/// line must exist; without the flag the defaults apply.
fn resolve_config(path: Option<&Path>) -> Result<PlanConfig> {
    match path {
        Some(path) => {
            anyhow::ensure!(
                path.exists(),
                "config file {} does not exist",
                path.display()
            );
            load_plan_config(path)
        }
        None => Ok(PlanConfig::default()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ROTA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "rota=debug,info"
        } else {
            "rota=info,warn"
        })
    });

    let format = env::var("ROTA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(io::stderr)).init();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mut config = resolve_config(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    let text = fs::read_to_string(&cli.roster)
        .with_context(|| format!("Failed to read {}", cli.roster.display()))?;
    let roster = Roster::parse(&text)
        .with_context(|| format!("Invalid roster in {}", cli.roster.display()))?;
    info!(workers = roster.len(), groups = roster.has_groups(), "roster loaded");

    let planner = Planner::new(config.clone());
    let outcome = match planner.run(&roster) {
        Ok(outcome) => outcome,
        Err(PlanError::ThresholdNeverMet {
            attempts,
            best_objective,
            last_rejection,
        }) => {
            if let Some(best) = best_objective {
                error!(
                    best,
                    per_worker = best / roster.len() as u64,
                    "best objective across rejected attempts"
                );
            }
            if let Some(reason) = &last_rejection {
                error!(%reason, "last rejection");
            }
            anyhow::bail!(
                "no acceptable plan within {attempts} attempts; \
                 raise the budget, the attempt cap, or the roster size"
            );
        }
        Err(err) => return Err(err.into()),
    };

    let report = output::build_report(&outcome, &roster, &config);
    let stdout = io::stdout();
    output::render(&mut stdout.lock(), cli.output_mode(), &report, &config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_loaded_config() {
        let cli = Cli::parse_from([
            "rota",
            "people.txt",
            "--seed",
            "9",
            "--max-attempts",
            "3",
            "--rotation",
        ]);

        let mut config = PlanConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.seed, 9);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.mode, PlanMode::Rotation);
    }

    #[test]
    fn json_flag_wins_over_format() {
        let cli = Cli::parse_from(["rota", "people.txt", "--json"]);
        assert_eq!(cli.output_mode(), OutputMode::Json);

        let cli = Cli::parse_from(["rota", "people.txt", "--format", "text"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn named_config_file_must_exist() {
        let err = resolve_config(Some(Path::new("/no/such/dir/rota.toml")))
            .expect_err("missing explicit config");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn absent_config_flag_uses_defaults() {
        let config = resolve_config(None).expect("defaults");
        assert_eq!(config, PlanConfig::default());
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["rota", "people.txt"]);
        let mut config = PlanConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config, PlanConfig::default());
    }
}
