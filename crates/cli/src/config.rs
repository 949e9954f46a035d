//! Pipeline configuration: one TOML file for every stage.
//!
//! ```toml
//! min_match_rate = 90.0
//!
//! [paths]
//! pages = "data/census_pages.jsonl"
//! population = "out/population.csv"
//! geometry = "data/wards.geojson"
//! output = "out/wards_population.geojson"
//!
//! [extract]
//! start_page = 51
//!
//! [reconcile]
//! strategies = ["exact_triple", "region_ward"]
//!
//! [geometry]
//! ward_field = "ward_name"
//!
//! [spatial]
//! center = [35.0, -6.0]
//! ```
//!
//! Every section is optional. Relative paths resolve against the directory
//! holding the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wardpop_extract::ExtractConfig;
use wardpop_io::GeometryConfig;
use wardpop_recon::ReconConfig;
use wardpop_spatial::SpatialConfig;

use crate::CliError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Fail with a distinct exit code when the final match rate (percent)
    /// is below this.
    pub min_match_rate: Option<f64>,
    pub paths: PathsConfig,
    pub extract: ExtractConfig,
    pub reconcile: ReconConfig,
    pub geometry: GeometryConfig,
    pub spatial: SpatialConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub pages: Option<PathBuf>,
    pub population: Option<PathBuf>,
    pub geometry: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Population records no unit took, as CSV.
    pub unmatched: Option<PathBuf>,
    /// Run report, as JSON.
    pub report: Option<PathBuf>,
}

impl PathsConfig {
    fn resolve(&mut self, base: &Path) {
        for path in [
            &mut self.pages,
            &mut self.population,
            &mut self.geometry,
            &mut self.output,
            &mut self.unmatched,
            &mut self.report,
        ]
        .into_iter()
        .flatten()
        {
            *path = base.join(&*path);
        }
    }
}

impl PipelineConfig {
    /// Read, parse and validate a config file; `[paths]` come back resolved.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml(&text)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e.message)))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.paths.resolve(base);
        Ok(config)
    }

    pub fn from_toml(input: &str) -> Result<Self, CliError> {
        let config: PipelineConfig =
            toml::from_str(input).map_err(|e| CliError::config(format!("config parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        self.extract.validate().map_err(|e| CliError::config(format!("[extract] {e}")))?;
        self.reconcile.validate().map_err(|e| CliError::config(format!("[reconcile] {e}")))?;
        self.geometry.validate().map_err(|e| CliError::config(format!("[geometry] {e}")))?;
        self.spatial.validate().map_err(|e| CliError::config(format!("[spatial] {e}")))?;
        if let Some(rate) = self.min_match_rate {
            check_match_rate(rate).map_err(CliError::config)?;
        }
        Ok(())
    }
}

/// A match-rate floor must be a percentage.
pub fn check_match_rate(rate: f64) -> Result<(), String> {
    if rate.is_finite() && (0.0..=100.0).contains(&rate) {
        Ok(())
    } else {
        Err(format!("min_match_rate must be between 0 and 100, got {rate}"))
    }
}

/// A path the command cannot run without.
pub fn require<'a>(path: &'a Option<PathBuf>, key: &str) -> Result<&'a Path, CliError> {
    path.as_deref().ok_or_else(|| {
        CliError::config(format!("missing paths.{key}"))
            .with_hint(format!("add `{key} = \"...\"` under [paths]"))
    })
}
