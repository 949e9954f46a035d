use wardpop_core::UNKNOWN;

/// Region/council attribution carried forward across pages.
///
/// Updates return a new value; the extractor threads it through the page
/// fold instead of mutating shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionContext {
    pub current_region: String,
    pub current_council: String,
}

impl Default for ExtractionContext {
    fn default() -> Self {
        Self {
            current_region: UNKNOWN.to_string(),
            current_council: UNKNOWN.to_string(),
        }
    }
}

impl ExtractionContext {
    /// Enter a region from a confirmed heading. Council resets.
    pub fn enter_region(&self, region: &str) -> Self {
        Self {
            current_region: region.to_string(),
            current_council: UNKNOWN.to_string(),
        }
    }

    /// Region named by an in-table sub-heading. Council is kept.
    pub fn with_region(&self, region: &str) -> Self {
        Self {
            current_region: region.to_string(),
            current_council: self.current_council.clone(),
        }
    }

    pub fn with_council(&self, council: &str) -> Self {
        Self {
            current_region: self.current_region.clone(),
            current_council: council.to_string(),
        }
    }

    /// True when `name` echoes the current region or council (case-insensitive).
    pub fn echoes(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        upper == self.current_region.to_uppercase() || upper == self.current_council.to_uppercase()
    }
}
