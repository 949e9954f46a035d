use wardpop_core::JoinStrategy;

use crate::matcher::MatchOutput;
use crate::model::{match_rate, StrategyCount};

/// Match counts derived from a strategy run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub by_strategy: Vec<StrategyCount>,
    pub unmatched_after_first_pass: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub match_rate_pct: f64,
}

/// Compute per-strategy and overall match statistics.
pub fn compute_summary(strategies: &[JoinStrategy], output: &MatchOutput) -> MatchSummary {
    let units = output.assignments.len();

    let by_strategy: Vec<StrategyCount> = strategies
        .iter()
        .zip(&output.unmatched_after)
        .map(|(&strategy, &unmatched_after)| StrategyCount {
            strategy,
            matched: output
                .assignments
                .iter()
                .flatten()
                .filter(|a| a.strategy == strategy)
                .count(),
            unmatched_after,
        })
        .collect();

    let unmatched = output.assignments.iter().filter(|a| a.is_none()).count();
    let matched = units - unmatched;

    MatchSummary {
        unmatched_after_first_pass: by_strategy.first().map_or(units, |s| s.unmatched_after),
        by_strategy,
        matched,
        unmatched,
        match_rate_pct: match_rate(matched, units),
    }
}
