//! reflexion-modeler CLI
//!
//! ## Usage
//!
//! ```bash
//! # Classify a high-level model against extracted source facts
//! reflexion-modeler run --hlm hlm.toon --sm sm.toon --out reflexion-model.toon
//!
//! # Drop framework calls before matching
//! reflexion-modeler run --hlm hlm.json --sm sm.json --exclude-calls-file excluded.txt
//!
//! # Compare against the previous report
//! reflexion-modeler diff previous.toon reflexion-model.toon
//! ```
//!
//! ## Exit Codes
//!
//! - 0: no finding in a failing category / reports identical
//! - 1: findings present / reports differ
//! - 2: error

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reflexion_modeler::config::{Overrides, RunConfig};
use reflexion_modeler::mapping::delta::ReportDelta;
use reflexion_modeler::mapping::loader::{load_hlm, load_sm, CallExclusions};
use reflexion_modeler::mapping::report::{read_report, write_report};
use reflexion_modeler::{Category, ReflexionModel};

/// Check an architecture model against the dataflows observed in code
#[derive(Parser)]
#[command(name = "reflexion-modeler")]
#[command(version)]
#[command(about = "Classify architecture elements as Convergence, Absence or Divergence", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the high-level model against the source model and write the report
    Run {
        /// High-level model table (.toon or .json)
        #[arg(long)]
        hlm: Option<PathBuf>,

        /// Raw source model table (.toon or .json)
        #[arg(long)]
        sm: Option<PathBuf>,

        /// Report path; the extension picks the format
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// File with newline-separated external calls to exclude from the source model
        #[arg(long)]
        exclude_calls_file: Option<PathBuf>,

        /// Config file (.toon or .json); flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Categories that make the run exit with status 1 (comma separated)
        #[arg(long, value_delimiter = ',', value_parser = parse_category)]
        fail_on: Vec<Category>,
    },

    /// Compare two reflexion reports
    Diff {
        /// Earlier report
        previous: PathBuf,

        /// Later report
        current: PathBuf,
    },
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown category `{s}` (expected Convergence, Absence or Divergence)"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

const CLEAN: u8 = 0;
const FINDINGS: u8 = 1;
const FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    ExitCode::from(exit_status(dispatch(cli.command)))
}

//errors are printed once, here; library code only logs
fn exit_status(result: Result<u8>) -> u8 {
    match result {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {e:#}");
            FAILURE
        }
    }
}

fn dispatch(command: Commands) -> Result<u8> {
    match command {
        Commands::Run { hlm, sm, out, exclude_calls_file, config, fail_on } => {
            let base = match config {
                Some(path) => RunConfig::load(&path).with_context(|| format!("loading config {}", path.display()))?,
                None => RunConfig::default(),
            };
            let cfg = base.with_overrides(Overrides {
                hlm,
                sm,
                out,
                exclude_calls_file,
                fail_on: (!fail_on.is_empty()).then_some(fail_on),
            });
            run(&cfg)
        }
        Commands::Diff { previous, current } => diff(previous, current),
    }
}

fn run(cfg: &RunConfig) -> Result<u8> {
    cfg.validate()?;

    let exclusions = match &cfg.exclude_calls_file {
        Some(path) => CallExclusions::load(path).context("loading call exclusions")?,
        None => CallExclusions::default(),
    };

    let hlm = load_hlm(cfg.hlm_path()?).context("loading high-level model")?;
    let sm = load_sm(cfg.sm_path()?, &exclusions).context("loading source model")?;

    let reflexion = ReflexionModel::new(hlm, sm).run();
    write_report(&cfg.out, reflexion.entries()).context("writing reflexion report")?;

    let summary = reflexion.summary();
    println!(
        "{} convergence, {} absence, {} divergence -> {}",
        summary.convergence,
        summary.absence,
        summary.divergence,
        cfg.out.display()
    );

    if reflexion.has_any(&cfg.fail_on) {
        Ok(FINDINGS)
    } else {
        Ok(CLEAN)
    }
}

fn diff(previous: PathBuf, current: PathBuf) -> Result<u8> {
    let prev = read_report(&previous).with_context(|| format!("reading {}", previous.display()))?;
    let curr = read_report(&current).with_context(|| format!("reading {}", current.display()))?;

    let delta = ReportDelta::between(&prev, &curr);

    for r in &delta.added {
        println!("+ {} {} {}", r.entity_type, r.entity_key, r.category);
    }
    for r in &delta.removed {
        println!("- {} {} {}", r.entity_type, r.entity_key, r.category);
    }
    for c in &delta.changed {
        println!("~ {} {} {} -> {}", c.id.entity_type, c.id.entity_key, c.from, c.to);
    }

    if delta.is_empty() {
        Ok(CLEAN)
    } else {
        tracing::info!(new_violations = delta.new_violations(), "reports differ");
        Ok(FINDINGS)
    }
}
