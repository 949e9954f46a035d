use geo::{polygon, GeodesicArea, MultiPolygon};
use proptest::prelude::*;

use wardpop_core::{GeometryUnit, PopulationCounts, ReconciledUnit};
use wardpop_spatial::{derive, LambertAzimuthalEqualArea, SpatialConfig};

fn cell(lon: f64, lat: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: lon, y: lat),
        (x: lon + size, y: lat),
        (x: lon + size, y: lat + size),
        (x: lon, y: lat + size),
    ]])
}

fn reconciled(geometry: MultiPolygon<f64>, total: Option<u64>) -> ReconciledUnit {
    let unit = GeometryUnit {
        region_name: "Pwani".into(),
        district_name: "Mafia".into(),
        ward_name: "Kirongwe".into(),
        geometry,
        properties: serde_json::Map::new(),
        origin: Default::default(),
    };
    ReconciledUnit {
        population: total.map(|t| PopulationCounts { total: t, male: t / 2, female: t - t / 2 }),
        ..ReconciledUnit::unmatched(unit)
    }
}

#[test]
fn multipolygon_parts_add_up() {
    let p = LambertAzimuthalEqualArea::new(39.0, -8.0);
    let a = p.area_sqkm(&cell(38.0, -8.0, 0.05));
    let b = p.area_sqkm(&cell(39.0, -8.0, 0.05));
    let both = MultiPolygon(cell(38.0, -8.0, 0.05).0.into_iter().chain(cell(39.0, -8.0, 0.05).0).collect());
    assert!((p.area_sqkm(&both) - (a + b)).abs() < 1e-6);
}

#[test]
fn holes_are_subtracted() {
    let with_hole = MultiPolygon(vec![polygon!(
        exterior: [
            (x: 35.0, y: -6.0), (x: 35.2, y: -6.0), (x: 35.2, y: -5.8), (x: 35.0, y: -5.8),
        ],
        interiors: [[
            (x: 35.05, y: -5.95), (x: 35.15, y: -5.95), (x: 35.15, y: -5.85), (x: 35.05, y: -5.85),
        ]],
    )]);
    let p = LambertAzimuthalEqualArea::new(35.1, -5.9);
    let outer = p.area_sqkm(&cell(35.0, -6.0, 0.2));
    let hole = p.area_sqkm(&cell(35.05, -5.95, 0.1));
    assert!((p.area_sqkm(&with_hole) - (outer - hole)).abs() < 1e-6);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn agrees_with_geodesic_area(lon in 29.5f64..40.0, lat in -11.5f64..-1.0, size in 0.005f64..0.2) {
        let geometry = cell(lon, lat, size);
        let geodesic = geometry.geodesic_area_unsigned() / 1e6;
        let mut units = vec![
            reconciled(cell(29.3, -11.7, 0.1), None),
            reconciled(geometry, Some(1_000)),
            reconciled(cell(40.3, -1.0, 0.1), None),
        ];
        derive(&mut units, &SpatialConfig::default());
        let area = units[1].area_sqkm.unwrap();
        prop_assert!((area - geodesic).abs() / geodesic < 1e-3, "{} vs {}", area, geodesic);
    }

    #[test]
    fn density_absent_without_population(total in proptest::option::of(0u64..1_000_000)) {
        let mut units = vec![reconciled(cell(35.0, -6.0, 0.1), total)];
        derive(&mut units, &SpatialConfig::default());
        prop_assert_eq!(units[0].density.is_some(), total.is_some());
    }
}
