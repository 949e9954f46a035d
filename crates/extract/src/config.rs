use serde::Deserialize;

use crate::error::ExtractError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Mainland and Zanzibar regions as printed in the 2022 census report.
pub const DEFAULT_REGIONS: &[&str] = &[
    "DODOMA", "ARUSHA", "KILIMANJARO", "TANGA", "MOROGORO", "PWANI",
    "DAR ES SALAAM", "LINDI", "MTWARA", "RUVUMA", "IRINGA", "MBEYA",
    "SINGIDA", "TABORA", "RUKWA", "KIGOMA", "SHINYANGA", "KAGERA",
    "MWANZA", "MARA", "MANYARA", "NJOMBE", "KATAVI", "SIMIYU",
    "GEITA", "SONGWE", "KASKAZINI UNGUJA", "KUSINI UNGUJA",
    "MJINI MAGHARIBI", "KASKAZINI PEMBA", "KUSINI PEMBA",
];

/// Words marking a row as an aggregate or boundary line rather than a ward.
pub const DEFAULT_SUMMARY_KEYWORDS: &[&str] =
    &["COUNCIL", "DISTRICT", "TOWN", "CITY", "MUNICIPAL", "REGION", "TOTAL"];

/// Words marking a first cell as a council sub-heading.
pub const DEFAULT_COUNCIL_KEYWORDS: &[&str] = &["COUNCIL", "DISTRICT", "TOWN", "CITY"];

/// Totals below this are formatting artifacts (footnote markers, page numbers).
pub const DEFAULT_MIN_POPULATION: u64 = 10;

/// Longest council heading accepted from page text; longer captures are prose.
pub const DEFAULT_MAX_HEADING_LEN: usize = 50;

/// Leading index cells at or above this are treated as real counts.
pub const DEFAULT_MAX_INDEX_VALUE: u64 = 500;

pub const DEFAULT_PROGRESS_EVERY: u32 = 20;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Canonical region names, uppercase.
    pub regions: Vec<String>,
    pub summary_keywords: Vec<String>,
    pub council_keywords: Vec<String>,
    pub min_population: u64,
    pub max_heading_len: usize,
    pub max_index_value: u64,
    /// First page to process, inclusive, in the dump's 1-based `page`
    /// numbering; earlier pages are front matter. 0 processes every page.
    pub start_page: u32,
    /// Log progress every N pages (0 disables).
    pub progress_every: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            regions: to_owned(DEFAULT_REGIONS),
            summary_keywords: to_owned(DEFAULT_SUMMARY_KEYWORDS),
            council_keywords: to_owned(DEFAULT_COUNCIL_KEYWORDS),
            min_population: DEFAULT_MIN_POPULATION,
            max_heading_len: DEFAULT_MAX_HEADING_LEN,
            max_index_value: DEFAULT_MAX_INDEX_VALUE,
            start_page: 0,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ExtractConfig {
    pub fn from_toml(input: &str) -> Result<Self, ExtractError> {
        let config: ExtractConfig =
            toml::from_str(input).map_err(|e| ExtractError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.regions.is_empty() {
            return Err(ExtractError::ConfigValidation(
                "at least one region name is required".into(),
            ));
        }
        if let Some(blank) = self.regions.iter().find(|r| r.trim().is_empty()) {
            return Err(ExtractError::ConfigValidation(format!(
                "region names must be non-empty, got {blank:?}"
            )));
        }
        if self.summary_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ExtractError::ConfigValidation(
                "summary keywords must be non-empty".into(),
            ));
        }
        if self.council_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ExtractError::ConfigValidation(
                "council keywords must be non-empty".into(),
            ));
        }
        if self.min_population == 0 {
            return Err(ExtractError::ConfigValidation(
                "min_population must be at least 1".into(),
            ));
        }
        if self.max_heading_len == 0 {
            return Err(ExtractError::ConfigValidation(
                "max_heading_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        let config = ExtractConfig::from_toml("").unwrap();
        assert_eq!(config.regions.len(), 31);
        assert_eq!(config.min_population, 10);
        assert_eq!(config.max_heading_len, 50);
        assert_eq!(config.start_page, 0);
    }

    #[test]
    fn overrides_apply() {
        let config = ExtractConfig::from_toml(
            r#"
regions = ["KIGALI", "NORTHERN"]
min_population = 25
start_page = 51
"#,
        )
        .unwrap();
        assert_eq!(config.regions, vec!["KIGALI", "NORTHERN"]);
        assert_eq!(config.min_population, 25);
        assert_eq!(config.start_page, 51);
        assert_eq!(config.max_heading_len, DEFAULT_MAX_HEADING_LEN);
    }

    #[test]
    fn rejects_empty_region_list() {
        let err = ExtractConfig::from_toml("regions = []").unwrap_err();
        assert!(err.to_string().contains("at least one region"));
    }

    #[test]
    fn rejects_zero_threshold() {
        let err = ExtractConfig::from_toml("min_population = 0").unwrap_err();
        assert!(err.to_string().contains("min_population"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ExtractConfig::from_toml("min_pop = 3").unwrap_err();
        assert!(matches!(err, ExtractError::ConfigParse(_)));
    }
}
