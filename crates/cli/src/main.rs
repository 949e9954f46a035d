// wardpop CLI - census ward population extraction and boundary reconciliation

mod config;
mod exit_codes;
mod extract;
mod pipeline;
mod reconcile;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG, EXIT_MATCH_RATE, EXIT_OUTPUT, EXIT_SOURCE, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "wardpop")]
#[command(about = "Extract census ward populations and join them onto ward boundaries")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Only log warnings and errors; suppress summaries
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract ward population records from a page dump
    #[command(after_help = "\
Examples:
  wardpop extract --pages census_pages.jsonl --out population.csv
  wardpop extract --pages census_pages.jsonl --out population.csv --config pipeline.toml --json")]
    Extract {
        /// Page dump, one JSON object per page, in document order
        #[arg(long)]
        pages: PathBuf,

        /// Population CSV to write
        #[arg(long)]
        out: PathBuf,

        /// Pipeline config; only [extract] is used
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,
    },

    /// Join a population CSV onto ward geometry and derive area and density
    #[command(after_help = "\
Examples:
  wardpop reconcile --population population.csv --geometry wards.geojson --out wards_pop.geojson
  wardpop reconcile --population population.csv --geometry wards.geojson --out wards_pop.geojson \\
      --min-match-rate 95 --unmatched unmatched.csv --json")]
    Reconcile {
        /// Population CSV (Region,Council,Ward,Total_Pop,Male_Pop,Female_Pop)
        #[arg(long)]
        population: PathBuf,

        /// Ward boundaries as a GeoJSON FeatureCollection
        #[arg(long)]
        geometry: PathBuf,

        /// Annotated GeoJSON to write
        #[arg(long)]
        out: PathBuf,

        /// Write population records no ward took to this CSV
        #[arg(long)]
        unmatched: Option<PathBuf>,

        /// Pipeline config; [reconcile], [geometry] and [spatial] are used
        #[arg(long)]
        config: Option<PathBuf>,

        /// Exit with code 6 when the match rate (percent) is below this
        #[arg(long, value_name = "PCT")]
        min_match_rate: Option<f64>,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,
    },

    /// Run extraction then reconciliation from a pipeline config
    #[command(after_help = "\
Examples:
  wardpop run pipeline.toml
  wardpop run pipeline.toml --json > run.json
  RUST_LOG=debug wardpop run pipeline.toml")]
    Run {
        /// Path to the pipeline TOML
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,
    },

    /// Validate a pipeline config without running
    #[command(after_help = "\
Examples:
  wardpop validate pipeline.toml")]
    Validate {
        /// Path to the pipeline TOML
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("WARDPOP_GIT_HASH"),
        ")",
        "\ntarget:  ",
        env!("WARDPOP_TARGET"),
    )
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Extract { pages, out, config, json } => {
            extract::cmd_extract(pages, out, config, json, quiet)
        }
        Commands::Reconcile {
            population,
            geometry,
            out,
            unmatched,
            config,
            min_match_rate,
            json,
        } => reconcile::cmd_reconcile(
            reconcile::ReconcilePaths { population, geometry, output: out, unmatched },
            config,
            min_match_rate,
            json,
            quiet,
        ),
        Commands::Run { config, json } => pipeline::cmd_run(config, json, quiet),
        Commands::Validate { config } => pipeline::cmd_validate(config, quiet),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn source(msg: impl Into<String>) -> Self {
        Self { code: EXIT_SOURCE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    pub fn match_rate(msg: impl Into<String>) -> Self {
        Self { code: EXIT_MATCH_RATE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<wardpop_io::IoError> for CliError {
    fn from(err: wardpop_io::IoError) -> Self {
        use wardpop_io::IoError;
        match &err {
            IoError::Open { .. } => {
                CliError::source(err.to_string()).with_hint("check the path and permissions")
            }
            IoError::Parse { .. } | IoError::Geometry { .. } => CliError::source(err.to_string()),
            IoError::Write { .. } => CliError::output(err.to_string()),
            IoError::Config(_) => CliError::config(err.to_string()),
        }
    }
}

impl From<wardpop_extract::ExtractError> for CliError {
    fn from(err: wardpop_extract::ExtractError) -> Self {
        CliError::config(err.to_string())
    }
}

impl From<wardpop_recon::ReconError> for CliError {
    fn from(err: wardpop_recon::ReconError) -> Self {
        CliError::config(err.to_string())
    }
}

/// Serialize `value` for stdout or a report file.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::output(format!("JSON serialization error: {e}")))
}

/// Write a JSON report file.
pub(crate) fn write_report(path: &std::path::Path, json: &str) -> Result<(), CliError> {
    std::fs::write(path, json)
        .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))?;
    log::info!("wrote report to {}", path.display());
    Ok(())
}
