// wardpop reconcile - population CSV + ward geometry to annotated GeoJSON

use std::path::PathBuf;

use serde::Serialize;
use wardpop_io::GeometryConfig;
use wardpop_recon::{ReconConfig, ReconReport, Reconciler};
use wardpop_spatial::{AreaStats, SpatialConfig};

use crate::config::{check_match_rate, PipelineConfig};
use crate::{to_json, CliError};

pub struct ReconcilePaths {
    pub population: PathBuf,
    pub geometry: PathBuf,
    pub output: PathBuf,
    pub unmatched: Option<PathBuf>,
}

/// Sections of the pipeline config this stage reads.
#[derive(Debug, Clone, Default)]
pub struct ReconcileSettings {
    pub reconcile: ReconConfig,
    pub geometry: GeometryConfig,
    pub spatial: SpatialConfig,
}

impl From<PipelineConfig> for ReconcileSettings {
    fn from(config: PipelineConfig) -> Self {
        Self {
            reconcile: config.reconcile,
            geometry: config.geometry,
            spatial: config.spatial,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReconcileSummary {
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_output: Option<PathBuf>,
    pub recon: ReconReport,
    pub area: AreaStats,
}

pub fn cmd_reconcile(
    paths: ReconcilePaths,
    config: Option<PathBuf>,
    min_match_rate: Option<f64>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let (settings, config_floor) = match config {
        Some(path) => {
            let pipeline = PipelineConfig::load(&path)?;
            let floor = pipeline.min_match_rate;
            (ReconcileSettings::from(pipeline), floor)
        }
        None => (ReconcileSettings::default(), None),
    };
    if let Some(rate) = min_match_rate {
        check_match_rate(rate).map_err(|msg| {
            CliError::config(msg).with_hint("--min-match-rate takes a percentage, e.g. 95")
        })?;
    }
    let floor = min_match_rate.or(config_floor);

    let summary = run_reconcile(&paths, &settings)?;

    if json {
        println!("{}", to_json(&summary)?);
    } else if !quiet {
        print_summary(&summary);
    }
    enforce_match_rate(&summary.recon, floor)
}

/// Join, derive area and density, and write every output.
pub fn run_reconcile(paths: &ReconcilePaths, settings: &ReconcileSettings) -> Result<ReconcileSummary, CliError> {
    let reconciler = Reconciler::new(settings.reconcile.clone())?;
    settings.geometry.validate()?;
    settings
        .spatial
        .validate()
        .map_err(|e| CliError::config(format!("[spatial] {e}")))?;

    let records = wardpop_io::read_population(&paths.population)?;
    let units = wardpop_io::read_units(&paths.geometry, &settings.geometry)?;

    let mut outcome = reconciler.reconcile(&records, units);
    let area = wardpop_spatial::derive(&mut outcome.units, &settings.spatial);

    wardpop_io::write_units(&paths.output, &outcome.units)?;
    if let Some(path) = &paths.unmatched {
        wardpop_io::write_population(path, &outcome.unmatched_records)?;
    }

    Ok(ReconcileSummary {
        output: paths.output.clone(),
        unmatched_output: paths.unmatched.clone(),
        recon: outcome.report,
        area,
    })
}

/// Outputs are already written when this fails.
pub fn enforce_match_rate(report: &ReconReport, floor: Option<f64>) -> Result<(), CliError> {
    match floor {
        Some(floor) if report.match_rate_pct < floor => Err(CliError::match_rate(format!(
            "match rate {:.2}% is below the required {:.2}%",
            report.match_rate_pct, floor
        ))
        .with_hint("rerun with --unmatched to list the population records no ward took")),
        _ => Ok(()),
    }
}

pub fn print_summary(summary: &ReconcileSummary) {
    let report = &summary.recon;
    eprintln!(
        "reconcile: {} geometry units, {} population records",
        report.geometry_units, report.population_records
    );
    if report.excluded_units > 0 {
        eprintln!("  excluded units: {}", report.excluded_units);
    }
    if report.duplicate_records > 0 {
        eprintln!("  duplicate records dropped: {}", report.duplicate_records);
    }
    for (pass, rate) in report.matched_by_strategy.iter().zip(report.cumulative_match_rates()) {
        eprintln!(
            "  {:<14} matched {:>6}  unmatched after {:>6}  ({:.2}%)",
            pass.strategy.to_string(),
            pass.matched,
            pass.unmatched_after,
            rate
        );
    }
    eprintln!(
        "  match rate: {:.2}% ({} of {})",
        report.match_rate_pct, report.matched, report.geometry_units
    );
    eprintln!("  population records without a ward: {}", report.unmatched_population_records);

    let area = &summary.area;
    eprintln!(
        "  area: {:.1} km2 over {} units ({} without area), density for {} units",
        area.total_area_sqkm, area.units_with_area, area.zero_area_units, area.units_with_density
    );
    eprintln!("  wrote {}", summary.output.display());
    if let Some(path) = &summary.unmatched_output {
        eprintln!("  wrote {}", path.display());
    }
}

