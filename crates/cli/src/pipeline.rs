// wardpop run / validate - both stages driven by one pipeline config

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{require, PipelineConfig};
use crate::extract::{self, ExtractSummary};
use crate::reconcile::{self, ReconcilePaths, ReconcileSettings, ReconcileSummary};
use crate::{to_json, write_report, CliError};

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub engine_version: &'static str,
    pub extract: ExtractSummary,
    pub reconcile: ReconcileSummary,
}

pub fn cmd_run(config_path: PathBuf, json: bool, quiet: bool) -> Result<(), CliError> {
    let config = PipelineConfig::load(&config_path)?;
    let pages = require(&config.paths.pages, "pages")?.to_path_buf();
    let population = require(&config.paths.population, "population")?.to_path_buf();
    let paths = ReconcilePaths {
        population: population.clone(),
        geometry: require(&config.paths.geometry, "geometry")?.to_path_buf(),
        output: require(&config.paths.output, "output")?.to_path_buf(),
        unmatched: config.paths.unmatched.clone(),
    };
    let report_path = config.paths.report.clone();
    let floor = config.min_match_rate;
    let extract_config = config.extract.clone();
    let settings = ReconcileSettings::from(config);

    log::info!("pipeline: {}", config_path.display());
    let extracted = extract::run_extract(&pages, &population, extract_config)?;
    let reconciled = reconcile::run_reconcile(&paths, &settings)?;

    let summary = RunSummary {
        engine_version: env!("CARGO_PKG_VERSION"),
        extract: extracted,
        reconcile: reconciled,
    };

    if let Some(path) = &report_path {
        write_report(path, &to_json(&summary)?)?;
    }
    if json {
        println!("{}", to_json(&summary)?);
    } else if !quiet {
        extract::print_summary(&summary.extract);
        reconcile::print_summary(&summary.reconcile);
    }
    reconcile::enforce_match_rate(&summary.reconcile.recon, floor)
}

pub fn cmd_validate(config_path: PathBuf, quiet: bool) -> Result<(), CliError> {
    let config = PipelineConfig::load(&config_path)?;
    if !quiet {
        eprintln!("config OK: {}", config_path.display());
        eprintln!(
            "  strategies: {}",
            config
                .reconcile
                .strategies
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let missing: Vec<&str> = [
            ("pages", &config.paths.pages),
            ("population", &config.paths.population),
            ("geometry", &config.paths.geometry),
            ("output", &config.paths.output),
        ]
        .into_iter()
        .filter(|(_, path)| path.is_none())
        .map(|(key, _)| key)
        .collect();
        if !missing.is_empty() {
            eprintln!("  note: `wardpop run` also needs paths.{}", missing.join(", paths."));
        }
    }
    Ok(())
}
