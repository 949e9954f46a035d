//! Row classification for detected tables.
//!
//! Rows pass through an ordered set of named checks; the first check that
//! fires decides the row. Heading rows update the context instead of
//! producing records.

use regex::Regex;
use serde::Serialize;

use wardpop_core::{PopulationRecord, Row};

use crate::config::ExtractConfig;
use crate::context::ExtractionContext;
use crate::error::ExtractError;
use crate::rules::RegionCatalog;

/// Why a row did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Blank,
    MissingName,
    HeaderFragment,
    RegionHeading,
    CouncilHeading,
    TooFewNumbers,
    SummaryKeyword,
    ContextEcho,
    Implausible,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Blank => "blank",
            Self::MissingName => "missing_name",
            Self::HeaderFragment => "header_fragment",
            Self::RegionHeading => "region_heading",
            Self::CouncilHeading => "council_heading",
            Self::TooFewNumbers => "too_few_numbers",
            Self::SummaryKeyword => "summary_keyword",
            Self::ContextEcho => "context_echo",
            Self::Implausible => "implausible",
        };
        write!(f, "{s}")
    }
}

/// Whether a table carries ward line-items (header mentions `Ward`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Ward,
    Other,
}

impl TableKind {
    pub fn from_header(header: Option<&Row>) -> Self {
        let is_ward = header
            .into_iter()
            .flatten()
            .flatten()
            .any(|cell| cell.contains("Ward"));
        if is_ward {
            Self::Ward
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Record(PopulationRecord),
    Rejected(RejectReason),
}

/// Context after the row plus what the row produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStep {
    pub context: ExtractionContext,
    pub outcome: RowOutcome,
}

/// Cells split into counts and label text, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumericPartition {
    pub numbers: Vec<u64>,
    pub text: Vec<String>,
}

/// `None` → empty, newlines → spaces, trimmed.
pub fn clean_row(row: &Row) -> Vec<String> {
    row.iter()
        .map(|cell| match cell {
            Some(s) => s.replace('\n', " ").trim().to_string(),
            None => String::new(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RowClassifier {
    catalog: RegionCatalog,
    numeric: Regex,
    summary_keywords: Vec<String>,
    council_keywords: Vec<String>,
    min_population: u64,
    max_index_value: u64,
}

impl RowClassifier {
    pub fn new(config: &ExtractConfig, catalog: RegionCatalog) -> Result<Self, ExtractError> {
        let numeric = Regex::new(r"^\d+[.,]?\d*$").map_err(|e| ExtractError::Pattern {
            rule: "numeric_cell",
            message: e.to_string(),
        })?;
        Ok(Self {
            catalog,
            numeric,
            summary_keywords: config.summary_keywords.iter().map(|k| k.to_uppercase()).collect(),
            council_keywords: config.council_keywords.iter().map(|k| k.to_uppercase()).collect(),
            min_population: config.min_population,
            max_index_value: config.max_index_value,
        })
    }

    /// Classify one row under `context`.
    pub fn classify(&self, context: &ExtractionContext, row: &Row, kind: TableKind) -> RowStep {
        let reject = |reason| RowStep {
            context: context.clone(),
            outcome: RowOutcome::Rejected(reason),
        };

        let cells = clean_row(row);
        if cells.iter().all(|c| c.is_empty()) {
            return reject(RejectReason::Blank);
        }

        let name = cells[0].as_str();
        if name.is_empty() {
            return reject(RejectReason::MissingName);
        }

        if self.is_header_fragment(&cells) {
            return reject(RejectReason::HeaderFragment);
        }

        let name_upper = name.to_uppercase();

        if self.catalog.is_region(&name_upper) || name_upper.contains("REGION") {
            let next = match self.region_sub_heading(&cells) {
                Some(region) => context.with_region(region),
                None => context.clone(),
            };
            return RowStep { context: next, outcome: RowOutcome::Rejected(RejectReason::RegionHeading) };
        }

        let mut context = context.clone();
        if self.council_keywords.iter().any(|kw| name_upper.contains(kw.as_str())) {
            context = context.with_council(name);
            if kind != TableKind::Ward {
                return RowStep { context, outcome: RowOutcome::Rejected(RejectReason::CouncilHeading) };
            }
        }

        let step = |outcome| RowStep { context: context.clone(), outcome };

        let mut parts = self.partition(&cells);
        if parts.numbers.len() < 3 {
            return step(RowOutcome::Rejected(RejectReason::TooFewNumbers));
        }
        self.drop_leading_index(&mut parts.numbers);

        let ward = assemble_name(&parts.text, name);

        if self.has_summary_keyword(&ward) {
            return step(RowOutcome::Rejected(RejectReason::SummaryKeyword));
        }
        if context.echoes(&ward) {
            return step(RowOutcome::Rejected(RejectReason::ContextEcho));
        }

        let (total, male, female) = (parts.numbers[0], parts.numbers[1], parts.numbers[2]);
        if total < self.min_population {
            return step(RowOutcome::Rejected(RejectReason::Implausible));
        }

        step(RowOutcome::Record(PopulationRecord {
            region: context.current_region.clone(),
            council: context.current_council.clone(),
            ward,
            total_pop: total,
            male_pop: male,
            female_pop: female,
        }))
    }

    /// Repeated column headers: any cell mentions the sex ratio, or the name
    /// cell is a population caption.
    pub fn is_header_fragment(&self, cells: &[String]) -> bool {
        let name_upper = cells.first().map(|c| c.to_uppercase()).unwrap_or_default();
        name_upper.contains("POPULATION")
            || cells.iter().any(|c| c.to_uppercase().contains("SEX RATIO"))
    }

    /// Region named by a short sub-heading row (fewer than ten words).
    pub fn region_sub_heading(&self, cells: &[String]) -> Option<&str> {
        let row_text = cells.join(" ").to_uppercase();
        if row_text.split_whitespace().count() >= 10 {
            return None;
        }
        self.catalog.find_in(&row_text)
    }

    /// Separate count cells from label cells. Thousands separators are
    /// stripped; decimal cells (ratios, averages) count as numeric but carry
    /// no population value.
    pub fn partition(&self, cells: &[String]) -> NumericPartition {
        let mut parts = NumericPartition::default();
        for cell in cells {
            let stripped = cell.replace(',', "");
            let stripped = stripped.trim();
            if self.numeric.is_match(stripped) {
                parts.numbers.push(stripped.parse::<u64>().unwrap_or(0));
            } else if !cell.is_empty() {
                parts.text.push(cell.clone());
            }
        }
        parts
    }

    /// Drop a leading serial-number column: four or more numbers where the
    /// first is small and the next strictly larger.
    pub fn drop_leading_index(&self, numbers: &mut Vec<u64>) {
        if numbers.len() >= 4 && numbers[0] < self.max_index_value && numbers[1] > numbers[0] {
            numbers.remove(0);
        }
    }

    pub fn has_summary_keyword(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        self.summary_keywords.iter().any(|kw| upper.contains(kw.as_str()))
    }
}

/// Ward name from label cells; the raw first cell when there are none.
pub fn assemble_name(text_cells: &[String], first_cell: &str) -> String {
    if text_cells.is_empty() {
        first_cell.to_string()
    } else {
        text_cells.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
