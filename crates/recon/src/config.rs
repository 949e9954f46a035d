use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wardpop_core::JoinStrategy;

use crate::error::ReconError;

/// Administrative-unit class tokens stripped as whole words before comparison.
pub const DEFAULT_CLASS_TOKENS: &[&str] = &[
    "DISTRICT",
    "COUNCIL",
    "TOWN",
    "CITY",
    "MUNICIPAL",
    "HALMASHAURI",
    "WILAYA",
    "YA",
    "WA",
    "LA",
];

/// Known spelling divergences, geometry spelling on the left.
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    ("NGHAHELEZE", "NGAHELEZE"),
    ("USA RIVER", "USA-RIVER"),
    ("OLOIRIEN/MAGAIDURU", "OLOIRIEN MAGAIDURU"),
    ("OLOIRIEN / MAGAIDURU", "OLOIRIEN MAGAIDURU"),
    ("VIWANJA SITINI", "VIWANJASITINI"),
    ("MATALE", "MATALE A"),
    ("KIHANGIMAHUKA", "KIHANGI MAHUKA"),
];

pub const DEFAULT_EXCLUDE_VALUES: &[&str] = &["WATER"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    /// Join strategies, tried in order for every unit.
    pub strategies: Vec<JoinStrategy>,
    pub normalize: NormalizeConfig,
    pub exclude: ExcludeConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            strategies: vec![JoinStrategy::ExactTriple, JoinStrategy::RegionWard],
            normalize: NormalizeConfig::default(),
            exclude: ExcludeConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Name normalization tables. Supplying either field replaces its default
/// entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    pub class_tokens: Vec<String>,
    /// Exact full-name replacements, matched case-insensitively.
    pub overrides: BTreeMap<String, String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            class_tokens: DEFAULT_CLASS_TOKENS.iter().map(|s| s.to_string()).collect(),
            overrides: DEFAULT_OVERRIDES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Exclusion
// ---------------------------------------------------------------------------

/// Geometry units removed before matching (water bodies and similar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcludeConfig {
    /// Attribute to test. `None` tests the ward name.
    pub field: Option<String>,
    /// Values compared case-insensitively after trimming.
    pub values: Vec<String>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            field: None,
            values: DEFAULT_EXCLUDE_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.strategies.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one join strategy is required".into(),
            ));
        }

        for (i, strategy) in self.strategies.iter().enumerate() {
            if self.strategies[..i].contains(strategy) {
                return Err(ReconError::ConfigValidation(format!(
                    "strategy '{strategy}' listed more than once"
                )));
            }
        }

        if let Some(token) = self.normalize.class_tokens.iter().find(|t| t.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(format!(
                "class token {token:?} is blank"
            )));
        }

        if let Some(key) = self.normalize.overrides.keys().find(|k| k.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(format!(
                "override key {key:?} is blank"
            )));
        }

        if let Some(field) = &self.exclude.field {
            if field.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "exclude.field must not be blank".into(),
                ));
            }
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
    fn empty_document_is_default() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config, ReconConfig::default());
        assert_eq!(
            config.strategies,
            vec![JoinStrategy::ExactTriple, JoinStrategy::RegionWard]
        );
        assert_eq!(config.normalize.overrides["MATALE"], "MATALE A");
        assert_eq!(config.exclude.values, vec!["WATER"]);
        assert!(config.exclude.field.is_none());
    }

    #[test]
    fn parse_full() {
        let input = r#"
strategies = ["region_ward"]

[normalize]
class_tokens = ["DISTRICT", "COUNCIL"]

[normalize.overrides]
"MSASANI" = "MSASANI PENINSULA"

[exclude]
field = "adm_name"
values = ["Water", "Lake"]
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.strategies, vec![JoinStrategy::RegionWard]);
        assert_eq!(config.normalize.class_tokens, vec!["DISTRICT", "COUNCIL"]);
        assert_eq!(config.normalize.overrides.len(), 1);
        assert_eq!(config.exclude.field.as_deref(), Some("adm_name"));
        assert_eq!(config.exclude.values, vec!["Water", "Lake"]);
    }

    #[test]
    fn serialized_defaults_parse_back() {
        let text = toml::to_string(&ReconConfig::default()).unwrap();
        let config = ReconConfig::from_toml(&text).unwrap();
        assert_eq!(config, ReconConfig::default());
    }

    #[test]
    fn reject_unknown_strategy() {
        let err = ReconConfig::from_toml(r#"strategies = ["fuzzy"]"#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_unknown_key() {
        let err = ReconConfig::from_toml("stratgies = []").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_empty_strategies() {
        let err = ReconConfig::from_toml("strategies = []").unwrap_err();
        assert!(err.to_string().contains("at least one join strategy"));
    }

    #[test]
    fn reject_duplicate_strategy() {
        let err =
            ReconConfig::from_toml(r#"strategies = ["exact_triple", "exact_triple"]"#).unwrap_err();
        assert!(err.to_string().contains("'exact_triple' listed more than once"));
    }

    #[test]
    fn reject_blank_class_token() {
        let err = ReconConfig::from_toml("[normalize]\nclass_tokens = [\"CITY\", \" \"]").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }
}
