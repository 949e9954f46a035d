//! Canonical comparison keys for administrative names.
//!
//! Both sides of the join spell the same place differently: class words
//! ("District Council", "Halmashauri ya Wilaya"), list indices, punctuation and
//! a handful of outright transliteration variants. `Normalizer` collapses those
//! into one upper-case key.

use std::collections::HashMap;

use regex::Regex;

use crate::config::NormalizeConfig;
use crate::error::ReconError;

/// `(region, district, ward)` after normalization. Empty components are
/// legal and mean "unmatchable" for any strategy that needs them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey {
    pub region: String,
    pub district: String,
    pub ward: String,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    overrides: HashMap<String, String>,
    class_tokens: Option<Regex>,
    leading_index: Regex,
    non_word: Regex,
}

impl Normalizer {
    pub fn new(config: &NormalizeConfig) -> Result<Self, ReconError> {
        let overrides = config
            .overrides
            .iter()
            .map(|(from, to)| (from.trim().to_uppercase(), to.trim().to_uppercase()))
            .collect();

        let class_tokens = if config.class_tokens.is_empty() {
            None
        } else {
            let alternation = config
                .class_tokens
                .iter()
                .map(|t| regex::escape(&t.trim().to_uppercase()))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"\b(?:{alternation})\b"))?)
        };

        Ok(Self {
            overrides,
            class_tokens,
            leading_index: compile(r"^\d+[\s.]+")?,
            non_word: compile(r"[^\w\s]")?,
        })
    }

    /// Canonical key for `raw`. Total and idempotent:
    /// `normalize(&normalize(x)) == normalize(x)`.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = raw.to_uppercase();
        let mut history: Vec<String> = Vec::new();
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            // An override table can map names into each other. Settle on the
            // smallest member of the cycle so every entry point agrees.
            if let Some(pos) = history.iter().position(|seen| *seen == next) {
                let mut cycle = history.split_off(pos);
                cycle.push(current);
                return cycle.into_iter().min().unwrap_or_default();
            }
            history.push(std::mem::replace(&mut current, next));
        }
    }

    pub fn key(&self, region: &str, district: &str, ward: &str) -> NormalizedKey {
        NormalizedKey {
            region: self.normalize(region),
            district: self.normalize(district),
            ward: self.normalize(ward),
        }
    }

    /// One application of override, class-token strip, index strip,
    /// punctuation removal and whitespace collapse. Input is upper-case.
    fn pass(&self, upper: &str) -> String {
        let name = self.overrides.get(upper).map(String::as_str).unwrap_or(upper);
        let name = match &self.class_tokens {
            Some(re) => re.replace_all(name, ""),
            None => name.into(),
        };
        let name = self.leading_index.replace(&name, "");
        let name = self.non_word.replace_all(&name, " ");
        name.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn compile(pattern: &str) -> Result<Regex, ReconError> {
    Regex::new(pattern).map_err(|e| ReconError::Pattern(format!("{pattern}: {e}")))
}
