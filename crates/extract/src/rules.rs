//! Page-level detection rules.
//!
//! Each rule is compiled once from [`ExtractConfig`] and checked independently
//! against a page's text. [`PageRules::scan`] applies them in document order
//! (region heading, council-by-region, council heading) to produce the next
//! [`ExtractionContext`].

use regex::Regex;

use crate::config::ExtractConfig;
use crate::context::ExtractionContext;
use crate::error::ExtractError;

fn compile(rule: &'static str, pattern: &str) -> Result<Regex, ExtractError> {
    Regex::new(pattern).map_err(|e| ExtractError::Pattern { rule, message: e.to_string() })
}

/// Collapse runs of whitespace (including newlines) to single spaces.
pub(crate) fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Region catalog
// ---------------------------------------------------------------------------

/// Known canonical region names with whole-word matchers, longest first.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    entries: Vec<(String, Regex)>,
}

impl RegionCatalog {
    pub fn new(regions: &[String]) -> Result<Self, ExtractError> {
        let mut names: Vec<String> = regions.iter().map(|r| squash_whitespace(&r.to_uppercase())).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        let entries = names
            .into_iter()
            .map(|name| {
                let words: Vec<String> = name.split(' ').map(regex::escape).collect();
                let pattern = format!(r"\b{}\b", words.join(r"\s+"));
                compile("region_catalog", &pattern).map(|re| (name, re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Longest known region appearing as whole words in `text_upper`.
    pub fn find_in(&self, text_upper: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, re)| re.is_match(text_upper))
            .map(|(name, _)| name.as_str())
    }

    /// Exact (whitespace-insensitive) match against a known region name.
    pub fn is_region(&self, name_upper: &str) -> bool {
        let squashed = squash_whitespace(name_upper);
        self.entries.iter().any(|(name, _)| *name == squashed)
    }
}

// ---------------------------------------------------------------------------
// Individual rules
// ---------------------------------------------------------------------------

/// Aggregate tables are numbered `Table N.0`; per-ward tables `N.1`, `N.2`, ...
#[derive(Debug, Clone)]
pub struct SummaryPageRule {
    re: Regex,
}

impl SummaryPageRule {
    pub const NAME: &'static str = "summary_page";

    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self { re: compile(Self::NAME, r"\bTable\s+\d+\.0\b")? })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

/// `Region 3: Dodoma` style headings.
#[derive(Debug, Clone)]
pub struct RegionHeadingRule {
    re: Regex,
}

impl RegionHeadingRule {
    pub const NAME: &'static str = "region_heading";

    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self { re: compile(Self::NAME, r"Region\s*\d*:\s*([\w\s]+)")? })
    }

    pub fn detect<'c>(&self, text: &str, catalog: &'c RegionCatalog) -> Option<&'c str> {
        let captured = self.re.captures(text)?.get(1)?.as_str();
        let first_line = captured.lines().next().unwrap_or("").trim().to_uppercase();
        catalog.find_in(&first_line)
    }
}

/// Table titles such as `Population Distribution by Council, Dodoma Region`.
#[derive(Debug, Clone)]
pub struct CouncilByRegionRule {
    re: Regex,
}

impl CouncilByRegionRule {
    pub const NAME: &'static str = "council_by_region";

    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self { re: compile(Self::NAME, r"(?i)by Council\s*([\w\s]+)\s*Region")? })
    }

    pub fn detect<'c>(&self, text: &str, catalog: &'c RegionCatalog) -> Option<&'c str> {
        let captured = self.re.captures(text)?.get(1)?.as_str();
        let first_line = captured.lines().next().unwrap_or("").trim().to_uppercase();
        catalog.find_in(&first_line)
    }
}

/// Numbered council headings: `3.1 KONDOA DISTRICT COUNCIL`.
#[derive(Debug, Clone)]
pub struct CouncilHeadingRule {
    re: Regex,
    max_len: usize,
}

impl CouncilHeadingRule {
    pub const NAME: &'static str = "council_heading";

    pub fn new(keywords: &[String], max_len: usize) -> Result<Self, ExtractError> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|kw| format!(r"[\w\s]+{}", regex::escape(&kw.to_uppercase())))
            .collect();
        let pattern = format!(r"\d+\.\d+\s+({})", alternatives.join("|"));
        Ok(Self { re: compile(Self::NAME, &pattern)?, max_len })
    }

    /// Matched against the uppercased page text. Captures at or beyond
    /// `max_len` characters are running prose, not headings.
    pub fn detect(&self, text: &str) -> Option<String> {
        let upper = text.to_uppercase();
        let captured = self.re.captures(&upper)?.get(1)?.as_str();
        let name = squash_whitespace(captured);
        if name.is_empty() || name.chars().count() >= self.max_len {
            return None;
        }
        Some(name)
    }
}

// ---------------------------------------------------------------------------
// Combined page scan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PageRules {
    pub catalog: RegionCatalog,
    pub summary_page: SummaryPageRule,
    pub region_heading: RegionHeadingRule,
    pub council_by_region: CouncilByRegionRule,
    pub council_heading: CouncilHeadingRule,
}

/// Result of scanning one page's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScan {
    pub context: ExtractionContext,
    pub is_summary: bool,
}

impl PageRules {
    pub fn compile(config: &ExtractConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            catalog: RegionCatalog::new(&config.regions)?,
            summary_page: SummaryPageRule::new()?,
            region_heading: RegionHeadingRule::new()?,
            council_by_region: CouncilByRegionRule::new()?,
            council_heading: CouncilHeadingRule::new(&config.council_keywords, config.max_heading_len)?,
        })
    }

    /// Apply heading rules to `text`, returning the context for this page.
    /// A page with no headings leaves the context unchanged.
    pub fn scan(&self, context: &ExtractionContext, text: &str) -> PageScan {
        let mut next = context.clone();

        if let Some(region) = self.region_heading.detect(text, &self.catalog) {
            next = next.enter_region(region);
        }

        if let Some(region) = self.council_by_region.detect(text, &self.catalog) {
            if region != next.current_region {
                next = next.enter_region(region);
            }
        }

        if let Some(council) = self.council_heading.detect(text) {
            next = next.with_council(&council);
        }

        PageScan {
            context: next,
            is_summary: self.summary_page.matches(text),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
