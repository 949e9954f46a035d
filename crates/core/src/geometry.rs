use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

use crate::population::PopulationCounts;

/// An administrative polygon from the boundary dataset.
///
/// Read-only to the pipeline: names are used for matching, `properties`
/// carries every original attribute through to the output untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryUnit {
    pub region_name: String,
    pub district_name: String,
    pub ward_name: String,
    /// Longitude/latitude (WGS84) coordinates.
    pub geometry: MultiPolygon<f64>,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub origin: FeatureOrigin,
}

/// Feature-level details outside `properties`, kept so the output feature
/// matches its input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureOrigin {
    /// Feature `id`, a JSON string or number.
    pub id: Option<serde_json::Value>,
    pub foreign_members: Option<serde_json::Map<String, serde_json::Value>>,
    /// Input geometry was a single `Polygon` rather than a `MultiPolygon`.
    pub single_polygon: bool,
}

impl GeometryUnit {
    /// Look up a passthrough attribute as text. Numbers are rendered, other
    /// JSON types yield `None`.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Join-key strategy that produced a match. Declared in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// (region, district, ward)
    ExactTriple,
    /// (region, ward); recovers units whose council naming diverges.
    RegionWard,
}

impl std::fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactTriple => write!(f, "exact_triple"),
            Self::RegionWard => write!(f, "region_ward"),
        }
    }
}

/// A geometry unit annotated with population and derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledUnit {
    pub unit: GeometryUnit,
    /// `None` means no population record matched, never zero.
    pub population: Option<PopulationCounts>,
    pub matched_by: Option<JoinStrategy>,
    /// Set by spatial derivation.
    pub area_sqkm: Option<f64>,
    /// People per square kilometre; absent without population or area.
    pub density: Option<f64>,
}

impl ReconciledUnit {
    pub fn unmatched(unit: GeometryUnit) -> Self {
        Self {
            unit,
            population: None,
            matched_by: None,
            area_sqkm: None,
            density: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.population.is_some()
    }
}
