use std::collections::HashSet;

use wardpop_core::{Page, PopulationRecord};

use crate::config::ExtractConfig;
use crate::context::ExtractionContext;
use crate::error::ExtractError;
use crate::row::{RowClassifier, RowOutcome, TableKind};
use crate::rules::PageRules;
use crate::stats::ExtractionStats;

/// What one page contributed: the context to carry forward, the records it
/// emitted, and its counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub context: ExtractionContext,
    pub records: Vec<PopulationRecord>,
    pub stats: ExtractionStats,
}

/// Result of a full extraction run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<PopulationRecord>,
    pub stats: ExtractionStats,
    /// Context after the last page.
    pub context: ExtractionContext,
}

/// Compiled extractor. Holds no run state; every call to [`Extractor::extract`]
/// starts from a fresh context.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractConfig,
    pages: PageRules,
    rows: RowClassifier,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        let pages = PageRules::compile(&config)?;
        let rows = RowClassifier::new(&config, pages.catalog.clone())?;
        Ok(Self { config, pages, rows })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Walk pages in document order, threading the context left to right,
    /// then drop exact duplicate records (first occurrence kept).
    pub fn extract<I>(&self, pages: I) -> Extraction
    where
        I: IntoIterator<Item = Page>,
    {
        let (context, mut records, mut stats) = pages.into_iter().fold(
            (ExtractionContext::default(), Vec::new(), ExtractionStats::default()),
            |(context, mut records, mut stats), page| {
                let outcome = self.step_page(&context, &page);
                self.report_progress(&page, &outcome.context);
                records.extend(outcome.records);
                stats.absorb(&outcome.stats);
                (outcome.context, records, stats)
            },
        );

        let before = records.len();
        let mut seen = HashSet::new();
        records.retain(|r| seen.insert(r.clone()));
        stats.duplicates_removed = before - records.len();

        log::info!(
            "extraction complete: {} records ({} duplicates removed, {} rows rejected)",
            records.len(),
            stats.duplicates_removed,
            stats.rejected_total(),
        );

        Extraction { records, stats, context }
    }

    /// Process one page under `context`.
    pub fn step_page(&self, context: &ExtractionContext, page: &Page) -> PageOutcome {
        let mut stats = ExtractionStats { pages_seen: 1, ..Default::default() };
        let unchanged = |stats| PageOutcome { context: context.clone(), records: Vec::new(), stats };

        if page.number < self.config.start_page {
            stats.pages_before_start = 1;
            return unchanged(stats);
        }

        let Some(text) = page.text() else {
            stats.pages_without_text = 1;
            return unchanged(stats);
        };

        let scan = self.pages.scan(context, text);
        if scan.context.current_region != context.current_region {
            stats.region_changes += 1;
            log::debug!("page {}: region -> {}", page.number, scan.context.current_region);
        }
        if scan.context.current_council != context.current_council {
            stats.council_changes += 1;
            log::debug!("page {}: council -> {}", page.number, scan.context.current_council);
        }
        if scan.is_summary {
            stats.summary_pages = 1;
        }

        if page.tables.is_empty() {
            stats.pages_without_tables = 1;
            return PageOutcome { context: scan.context, records: Vec::new(), stats };
        }

        let mut context = scan.context;
        let mut records = Vec::new();

        for table in &page.tables {
            stats.tables_seen += 1;
            let kind = TableKind::from_header(table.first());
            if scan.is_summary && kind != TableKind::Ward {
                stats.tables_skipped += 1;
                continue;
            }

            for row in table {
                stats.rows_seen += 1;
                let step = self.rows.classify(&context, row, kind);
                if step.context.current_region != context.current_region {
                    stats.region_changes += 1;
                }
                if step.context.current_council != context.current_council {
                    stats.council_changes += 1;
                }
                context = step.context;
                match step.outcome {
                    RowOutcome::Record(record) => {
                        stats.records_emitted += 1;
                        records.push(record);
                    }
                    RowOutcome::Rejected(reason) => stats.reject(reason),
                }
            }
        }

        PageOutcome { context, records, stats }
    }

    fn report_progress(&self, page: &Page, context: &ExtractionContext) {
        let every = self.config.progress_every;
        if every > 0 && page.number % every == 0 {
            log::info!(
                "processed page {} ({} / {})",
                page.number,
                context.current_region,
                context.current_council,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
