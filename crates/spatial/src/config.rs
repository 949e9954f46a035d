use serde::{Deserialize, Serialize};

use crate::error::SpatialError;

/// Largest absolute latitude accepted for a projection centre. The oblique
/// formulas degenerate at the poles.
pub const MAX_CENTER_LATITUDE: f64 = 89.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpatialConfig {
    /// Projection centre as `[lon, lat]` degrees. `None` uses the centre of
    /// the bounding box of all units.
    pub center: Option<[f64; 2]>,
}

impl SpatialConfig {
    pub fn from_toml(input: &str) -> Result<Self, SpatialError> {
        let config: SpatialConfig =
            toml::from_str(input).map_err(|e| SpatialError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SpatialError> {
        if let Some([lon, lat]) = self.center {
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err(SpatialError::ConfigValidation(format!(
                    "center longitude {lon} outside [-180, 180]"
                )));
            }
            if !lat.is_finite() || lat.abs() > MAX_CENTER_LATITUDE {
                return Err(SpatialError::ConfigValidation(format!(
                    "center latitude {lat} outside [-{MAX_CENTER_LATITUDE}, {MAX_CENTER_LATITUDE}]"
                )));
            }
        }
        Ok(())
    }
}
