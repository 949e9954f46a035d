use std::collections::HashSet;

use wardpop_core::{GeometryUnit, PopulationRecord, ReconciledUnit};

use crate::config::{ExcludeConfig, ReconConfig};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::matcher::match_units;
use crate::model::{ReconMeta, ReconOutcome, ReconReport};
use crate::normalize::{NormalizedKey, Normalizer};

/// Attach population records to geometry units per config.
pub fn reconcile(
    records: &[PopulationRecord],
    units: Vec<GeometryUnit>,
    config: &ReconConfig,
) -> Result<ReconOutcome, ReconError> {
    Ok(Reconciler::new(config.clone())?.reconcile(records, units))
}

/// Validated config plus its compiled normalizer.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: ReconConfig,
    normalizer: Normalizer,
}

impl Reconciler {
    pub fn new(config: ReconConfig) -> Result<Self, ReconError> {
        config.validate()?;
        let normalizer = Normalizer::new(&config.normalize)?;
        Ok(Self { config, normalizer })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn reconcile(&self, records: &[PopulationRecord], units: Vec<GeometryUnit>) -> ReconOutcome {
        let total_units = units.len();
        let units: Vec<GeometryUnit> = units
            .into_iter()
            .filter(|u| !is_excluded(u, &self.config.exclude))
            .collect();
        let excluded_units = total_units - units.len();
        if excluded_units > 0 {
            log::info!("excluded {excluded_units} geometry units");
        }

        let (kept, record_keys) = self.dedup_records(records);
        let duplicate_records = records.len() - kept.len();
        if duplicate_records > 0 {
            log::warn!("{duplicate_records} population records share a normalized key; first kept");
        }

        let unit_keys: Vec<NormalizedKey> = units
            .iter()
            .map(|u| self.normalizer.key(&u.region_name, &u.district_name, &u.ward_name))
            .collect();

        let output = match_units(&unit_keys, &record_keys, &self.config.strategies);
        let summary = compute_summary(&self.config.strategies, &output);

        let mut used = vec![false; kept.len()];
        let reconciled: Vec<ReconciledUnit> = units
            .into_iter()
            .zip(&output.assignments)
            .map(|(unit, assignment)| match assignment {
                Some(a) => {
                    used[a.record] = true;
                    ReconciledUnit {
                        population: Some(kept[a.record].counts()),
                        matched_by: Some(a.strategy),
                        ..ReconciledUnit::unmatched(unit)
                    }
                }
                None => ReconciledUnit::unmatched(unit),
            })
            .collect();

        let unmatched_records: Vec<PopulationRecord> = kept
            .iter()
            .zip(&used)
            .filter(|(_, &taken)| !taken)
            .map(|(r, _)| (*r).clone())
            .collect();

        for s in &summary.by_strategy {
            log::info!(
                "{}: {} matched, {} still unmatched",
                s.strategy,
                s.matched,
                s.unmatched_after
            );
        }
        log::info!(
            "reconciled {}/{} units ({:.2}%)",
            summary.matched,
            reconciled.len(),
            summary.match_rate_pct
        );

        let report = ReconReport {
            meta: ReconMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
                strategies: self.config.strategies.clone(),
            },
            geometry_units: reconciled.len(),
            excluded_units,
            population_records: records.len(),
            duplicate_records,
            matched_by_strategy: summary.by_strategy,
            unmatched_after_first_pass: summary.unmatched_after_first_pass,
            matched: summary.matched,
            unmatched: summary.unmatched,
            match_rate_pct: summary.match_rate_pct,
            unmatched_population_records: unmatched_records.len(),
        };

        ReconOutcome { units: reconciled, report, unmatched_records }
    }

    /// Drop records whose normalized triple was already seen.
    fn dedup_records<'a>(
        &self,
        records: &'a [PopulationRecord],
    ) -> (Vec<&'a PopulationRecord>, Vec<NormalizedKey>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut keys = Vec::new();
        for record in records {
            let key = self.normalizer.key(&record.region, &record.council, &record.ward);
            if seen.insert(key.clone()) {
                kept.push(record);
                keys.push(key);
            }
        }
        (kept, keys)
    }
}

fn is_excluded(unit: &GeometryUnit, exclude: &ExcludeConfig) -> bool {
    if exclude.values.is_empty() {
        return false;
    }
    let value = match &exclude.field {
        None => Some(unit.ward_name.clone()),
        Some(field) => unit.attribute(field),
    };
    let Some(value) = value else {
        return false;
    };
    let value = value.trim().to_uppercase();
    exclude.values.iter().any(|v| v.trim().to_uppercase() == value)
}
