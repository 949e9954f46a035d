use serde::{Deserialize, Serialize};

/// Placeholder region/council name used before any heading has been seen.
pub const UNKNOWN: &str = "Unknown";

/// One ward line-item recovered from the census report.
///
/// Field names serialize to the published table header
/// (`Region,Council,Ward,Total_Pop,Male_Pop,Female_Pop`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulationRecord {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Council")]
    pub council: String,
    #[serde(rename = "Ward")]
    pub ward: String,
    #[serde(rename = "Total_Pop")]
    pub total_pop: u64,
    #[serde(rename = "Male_Pop")]
    pub male_pop: u64,
    #[serde(rename = "Female_Pop")]
    pub female_pop: u64,
}

impl PopulationRecord {
    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts {
            total: self.total_pop,
            male: self.male_pop,
            female: self.female_pop,
        }
    }
}

/// Population figures attached to a reconciled geometry unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub total: u64,
    pub male: u64,
    pub female: u64,
}
