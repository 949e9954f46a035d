// GeoJSON geometry import and reconciled dataset export

use std::path::Path;

use geo::{MultiPolygon, Polygon};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wardpop_core::{FeatureOrigin, GeometryUnit, ReconciledUnit};

use crate::error::IoError;

/// Output attributes appended to every feature.
pub const TOTAL_POP: &str = "Total_Pop";
pub const MALE_POP: &str = "Male_Pop";
pub const FEMALE_POP: &str = "Female_Pop";
pub const AREA_SQKM: &str = "area_sqkm";
pub const DENSITY: &str = "density";

/// Which feature attributes carry the administrative names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryConfig {
    pub region_field: String,
    pub district_field: String,
    pub ward_field: String,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            region_field: "reg_name".into(),
            district_field: "dist_name".into(),
            ward_field: "ward_name".into(),
        }
    }
}

impl GeometryConfig {
    pub fn validate(&self) -> Result<(), IoError> {
        for (key, value) in [
            ("region_field", &self.region_field),
            ("district_field", &self.district_field),
            ("ward_field", &self.ward_field),
        ] {
            if value.trim().is_empty() {
                return Err(IoError::Config(format!("geometry.{key} must not be blank")));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

pub fn read_units(path: &Path, config: &GeometryConfig) -> Result<Vec<GeometryUnit>, IoError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| IoError::Open { path: path.to_path_buf(), source })?;
    let units = parse_units(&text, path, config)?;
    log::info!("read {} geometry units from {}", units.len(), path.display());
    Ok(units)
}

/// Parse a FeatureCollection into units. `path` only labels errors.
pub fn parse_units(text: &str, path: &Path, config: &GeometryConfig) -> Result<Vec<GeometryUnit>, IoError> {
    let collection: FeatureCollection = text.parse().map_err(|e: geojson::Error| IoError::Parse {
        path: path.to_path_buf(),
        line: None,
        message: e.to_string(),
    })?;

    let mut missing_names = 0usize;
    let units = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| {
            let unit = to_unit(feature, config).map_err(|message| IoError::Geometry {
                path: path.to_path_buf(),
                feature: idx,
                message,
            })?;
            if unit.region_name.is_empty() || unit.ward_name.is_empty() {
                missing_names += 1;
            }
            Ok(unit)
        })
        .collect::<Result<Vec<_>, IoError>>()?;

    if missing_names > 0 {
        log::warn!("{missing_names} features lack a region or ward name and cannot be matched");
    }
    Ok(units)
}

fn to_unit(feature: Feature, config: &GeometryConfig) -> Result<GeometryUnit, String> {
    let properties = feature.properties.unwrap_or_default();
    let name = |field: &str| match properties.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let mut origin = FeatureOrigin {
        id: feature.id.map(|id| match id {
            Id::String(s) => Value::String(s),
            Id::Number(n) => Value::Number(n),
        }),
        foreign_members: feature.foreign_members,
        single_polygon: false,
    };

    let geometry = match feature.geometry {
        None => MultiPolygon(vec![]),
        Some(g) => match g.value {
            geojson::Value::Polygon(_) => {
                let polygon: Polygon<f64> = g.value.try_into().map_err(|e: geojson::Error| e.to_string())?;
                origin.single_polygon = true;
                MultiPolygon(vec![polygon])
            }
            geojson::Value::MultiPolygon(_) => {
                g.value.try_into().map_err(|e: geojson::Error| e.to_string())?
            }
            other => return Err(format!("unsupported geometry type {}", other.type_name())),
        },
    };

    Ok(GeometryUnit {
        region_name: name(&config.region_field),
        district_name: name(&config.district_field),
        ward_name: name(&config.ward_field),
        geometry,
        properties,
        origin,
    })
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Build the output collection: original attributes plus population, area
/// and density (`null` when absent).
pub fn to_feature_collection(units: &[ReconciledUnit]) -> FeatureCollection {
    units.iter().map(to_feature).collect()
}

fn to_feature(unit: &ReconciledUnit) -> Feature {
    let mut properties: Map<String, Value> = unit.unit.properties.clone();
    let counts = unit.population;
    properties.insert(TOTAL_POP.into(), counts.map(|c| c.total).into());
    properties.insert(MALE_POP.into(), counts.map(|c| c.male).into());
    properties.insert(FEMALE_POP.into(), counts.map(|c| c.female).into());
    properties.insert(AREA_SQKM.into(), number_or_null(unit.area_sqkm));
    properties.insert(DENSITY.into(), number_or_null(unit.density));

    let origin = &unit.unit.origin;
    let geometry = match unit.unit.geometry.0.as_slice() {
        [] => None,
        [polygon] if origin.single_polygon => Some(geojson::Value::from(polygon)),
        _ => Some(geojson::Value::from(&unit.unit.geometry)),
    };
    let id = origin.id.as_ref().and_then(|id| match id {
        Value::String(s) => Some(Id::String(s.clone())),
        Value::Number(n) => Some(Id::Number(n.clone())),
        _ => None,
    });

    Feature {
        bbox: None,
        geometry: geometry.map(geojson::Geometry::new),
        id,
        properties: Some(properties),
        foreign_members: origin.foreign_members.clone(),
    }
}

fn number_or_null(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub fn write_units(path: &Path, units: &[ReconciledUnit]) -> Result<(), IoError> {
    let out = GeoJson::from(to_feature_collection(units));
    std::fs::write(path, out.to_string()).map_err(|e| IoError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::info!("wrote {} features to {}", units.len(), path.display());
    Ok(())
}
