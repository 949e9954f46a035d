use serde::Serialize;
use wardpop_core::{JoinStrategy, PopulationRecord, ReconciledUnit};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub strategies: Vec<JoinStrategy>,
}

/// Units matched by one strategy, in strategy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyCount {
    pub strategy: JoinStrategy,
    pub matched: usize,
    /// Units still unmatched once this strategy has run.
    pub unmatched_after: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    /// Units taking part in matching (exclusions removed).
    pub geometry_units: usize,
    pub excluded_units: usize,
    /// Records received, before deduplication.
    pub population_records: usize,
    pub duplicate_records: usize,
    pub matched_by_strategy: Vec<StrategyCount>,
    pub unmatched_after_first_pass: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub match_rate_pct: f64,
    /// Deduplicated records no unit took.
    pub unmatched_population_records: usize,
}

impl ReconReport {
    /// Match rate after each strategy, cumulative. Non-decreasing.
    pub fn cumulative_match_rates(&self) -> Vec<f64> {
        self.matched_by_strategy
            .iter()
            .map(|s| match_rate(self.geometry_units - s.unmatched_after, self.geometry_units))
            .collect()
    }
}

/// `matched / units * 100`, or 0 without units.
pub fn match_rate(matched: usize, units: usize) -> f64 {
    if units == 0 {
        0.0
    } else {
        matched as f64 / units as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReconOutcome {
    /// Input units minus exclusions, in input order.
    pub units: Vec<ReconciledUnit>,
    pub report: ReconReport,
    /// Records no unit took, in input order.
    pub unmatched_records: Vec<PopulationRecord>,
}
