use geo::{BoundingRect, Rect};
use serde::Serialize;
use wardpop_core::ReconciledUnit;

use crate::config::{SpatialConfig, MAX_CENTER_LATITUDE};
use crate::projection::LambertAzimuthalEqualArea;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaStats {
    pub units: usize,
    /// Units with positive area.
    pub units_with_area: usize,
    /// Units whose geometry is empty or degenerate.
    pub zero_area_units: usize,
    pub units_with_density: usize,
    pub total_area_sqkm: f64,
    /// Projection centre used, `[lon, lat]`. `None` when there was nothing
    /// to project.
    pub center: Option<[f64; 2]>,
}

/// Fill `area_sqkm` on every unit and `density` where population is known
/// and area is positive.
pub fn derive(units: &mut [ReconciledUnit], config: &SpatialConfig) -> AreaStats {
    let mut stats = AreaStats { units: units.len(), ..Default::default() };

    let Some([lon0, lat0]) = config.center.or_else(|| bbox_center(units)) else {
        log::warn!("no geometry to project; area and density left empty");
        return stats;
    };
    stats.center = Some([lon0, lat0]);
    let projection = LambertAzimuthalEqualArea::new(lon0, lat0);
    log::debug!("equal-area projection centred on ({lon0:.4}, {lat0:.4})");

    for unit in units.iter_mut() {
        let area = projection.area_sqkm(&unit.unit.geometry);
        unit.area_sqkm = Some(area);
        unit.density = density(unit, area);

        if area > 0.0 {
            stats.units_with_area += 1;
            stats.total_area_sqkm += area;
        } else {
            stats.zero_area_units += 1;
        }
        if unit.density.is_some() {
            stats.units_with_density += 1;
        }
    }

    if stats.zero_area_units > 0 {
        log::warn!("{} units have zero area", stats.zero_area_units);
    }
    log::info!(
        "computed area for {} units ({:.1} km² total), density for {}",
        stats.units_with_area,
        stats.total_area_sqkm,
        stats.units_with_density
    );

    stats
}

fn density(unit: &ReconciledUnit, area_sqkm: f64) -> Option<f64> {
    let population = unit.population?;
    (area_sqkm > 0.0).then(|| population.total as f64 / area_sqkm)
}

/// Centre of the bounding box of all units, latitude kept off the poles.
fn bbox_center(units: &[ReconciledUnit]) -> Option<[f64; 2]> {
    let rect = units
        .iter()
        .filter_map(|u| u.unit.geometry.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            )
        })?;
    let center = rect.center();
    Some([center.x, center.y.clamp(-MAX_CENTER_LATITUDE, MAX_CENTER_LATITUDE)])
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};
    use wardpop_core::{GeometryUnit, PopulationCounts};

    use super::*;

    fn reconciled(geometry: MultiPolygon<f64>, total: Option<u64>) -> ReconciledUnit {
        let unit = GeometryUnit {
            region_name: "Dodoma".into(),
            district_name: "Chamwino".into(),
            ward_name: "Makoje".into(),
            geometry,
            properties: serde_json::Map::new(),
            origin: Default::default(),
        };
        ReconciledUnit {
            population: total.map(|t| PopulationCounts { total: t, male: t / 2, female: t - t / 2 }),
            ..ReconciledUnit::unmatched(unit)
        }
    }

    fn cell(lon: f64, lat: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: lon, y: lat),
            (x: lon + 0.1, y: lat),
            (x: lon + 0.1, y: lat + 0.1),
            (x: lon, y: lat + 0.1),
        ]])
    }

    #[test]
    fn density_needs_population_and_area() {
        let mut units = vec![
            reconciled(cell(35.0, -6.0), Some(12_408)),
            reconciled(cell(35.2, -6.0), None),
            reconciled(MultiPolygon(vec![]), Some(500)),
        ];
        let stats = derive(&mut units, &SpatialConfig::default());

        let a = units[0].area_sqkm.unwrap();
        assert!(a > 120.0 && a < 125.0, "{a}");
        assert!((units[0].density.unwrap() - 12_408.0 / a).abs() < 1e-9);

        assert!(units[1].area_sqkm.unwrap() > 0.0);
        assert!(units[1].density.is_none());

        assert_eq!(units[2].area_sqkm, Some(0.0));
        assert!(units[2].density.is_none());

        assert_eq!(stats.units, 3);
        assert_eq!(stats.units_with_area, 2);
        assert_eq!(stats.zero_area_units, 1);
        assert_eq!(stats.units_with_density, 1);
    }

    #[test]
    fn default_center_is_bbox_center() {
        let mut units = vec![reconciled(cell(35.0, -6.0), None), reconciled(cell(36.9, -4.1), None)];
        let stats = derive(&mut units, &SpatialConfig::default());
        let [lon, lat] = stats.center.unwrap();
        assert!((lon - 36.0).abs() < 1e-9);
        assert!((lat - (-5.0)).abs() < 1e-9);
    }

    #[test]
    fn configured_center_wins() {
        let mut units = vec![reconciled(cell(35.0, -6.0), Some(100))];
        let config = SpatialConfig { center: Some([34.0, -6.5]) };
        let stats = derive(&mut units, &config);
        assert_eq!(stats.center, Some([34.0, -6.5]));
    }

    #[test]
    fn nothing_to_project() {
        let mut units = vec![reconciled(MultiPolygon(vec![]), Some(100))];
        let stats = derive(&mut units, &SpatialConfig::default());
        assert!(stats.center.is_none());
        assert!(units[0].area_sqkm.is_none());
        assert!(units[0].density.is_none());
    }
}
