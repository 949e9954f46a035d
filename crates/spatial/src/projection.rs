//! Ellipsoidal Lambert azimuthal equal-area projection (oblique aspect).
//!
//! Forward equations from Snyder, *Map Projections: A Working Manual*
//! (USGS PP 1395), eqs. 3-12, 3-11, 24-16 to 24-20. Planar areas are
//! ellipsoidal areas for any centre, so one centre serves a whole country.

use geo::{Area, Coord, MapCoords, MultiPolygon};

/// WGS84 semi-major axis, metres.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertAzimuthalEqualArea {
    lon0: f64,
    e: f64,
    e2: f64,
    qp: f64,
    rq: f64,
    d: f64,
    sin_beta1: f64,
    cos_beta1: f64,
}

impl LambertAzimuthalEqualArea {
    /// Projection centred on (`lon0`, `lat0`) degrees on the WGS84 ellipsoid.
    /// `lat0` must be away from the poles.
    pub fn new(lon0: f64, lat0: f64) -> Self {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let e = e2.sqrt();
        let qp = authalic_q(1.0, e, e2);
        let rq = WGS84_A * (qp / 2.0).sqrt();

        let phi1 = lat0.to_radians();
        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let beta1 = authalic_latitude(sin_phi1, e, e2, qp);
        let (sin_beta1, cos_beta1) = beta1.sin_cos();
        let m1 = cos_phi1 / (1.0 - e2 * sin_phi1 * sin_phi1).sqrt();
        let d = WGS84_A * m1 / (rq * cos_beta1);

        Self { lon0: lon0.to_radians(), e, e2, qp, rq, d, sin_beta1, cos_beta1 }
    }

    /// Geographic degrees to projected metres.
    pub fn project(&self, c: Coord<f64>) -> Coord<f64> {
        let sin_phi = c.y.to_radians().sin();
        let beta = authalic_latitude(sin_phi, self.e, self.e2, self.qp);
        let (sin_beta, cos_beta) = beta.sin_cos();
        let (sin_dlon, cos_dlon) = (c.x.to_radians() - self.lon0).sin_cos();

        let denom = 1.0 + self.sin_beta1 * sin_beta + self.cos_beta1 * cos_beta * cos_dlon;
        // Antipode of the centre; unreachable for ward-sized inputs.
        let b = if denom > 0.0 { self.rq * (2.0 / denom).sqrt() } else { 0.0 };

        Coord {
            x: b * self.d * cos_beta * sin_dlon,
            y: (b / self.d) * (self.cos_beta1 * sin_beta - self.sin_beta1 * cos_beta * cos_dlon),
        }
    }

    pub fn project_multi_polygon(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.map_coords(|c| self.project(c))
    }

    /// Ellipsoidal area of `geometry` in square kilometres.
    pub fn area_sqkm(&self, geometry: &MultiPolygon<f64>) -> f64 {
        self.project_multi_polygon(geometry).unsigned_area() / 1e6
    }
}

/// Snyder eq. 3-12.
fn authalic_q(sin_phi: f64, e: f64, e2: f64) -> f64 {
    let es = e * sin_phi;
    (1.0 - e2) * (sin_phi / (1.0 - es * es) - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
}

/// Snyder eq. 3-11.
fn authalic_latitude(sin_phi: f64, e: f64, e2: f64, qp: f64) -> f64 {
    (authalic_q(sin_phi, e, e2) / qp).clamp(-1.0, 1.0).asin()
}

#[cfg(test)]
mod tests {
    use geo::{polygon, GeodesicArea, LineString, Polygon};

    use super::*;

    #[test]
    fn centre_maps_to_origin() {
        let p = LambertAzimuthalEqualArea::new(35.0, -6.0);
        let c = p.project(Coord { x: 35.0, y: -6.0 });
        assert!(c.x.abs() < 1e-6 && c.y.abs() < 1e-6, "{c:?}");
    }

    #[test]
    fn axes_orientation() {
        let p = LambertAzimuthalEqualArea::new(35.0, -6.0);
        let east = p.project(Coord { x: 36.0, y: -6.0 });
        let north = p.project(Coord { x: 35.0, y: -5.0 });
        assert!(east.x > 100_000.0 && east.x < 115_000.0);
        assert!(north.y > 100_000.0 && north.y < 115_000.0);
        assert!(north.x.abs() < 1e-6);
    }

    #[test]
    fn qp_matches_known_value() {
        // Series expansion: 2 - 2e²/3 - 2e⁴/15.
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let qp = authalic_q(1.0, e2.sqrt(), e2);
        assert!((qp - 1.995_531).abs() < 1e-4, "{qp}");
    }

    #[test]
    fn small_cell_matches_geodesic_area() {
        // Counter-clockwise; geodesic area of a clockwise ring is its complement.
        let cell = polygon![
            (x: 35.0, y: -6.1),
            (x: 35.1, y: -6.1),
            (x: 35.1, y: -6.0),
            (x: 35.0, y: -6.0),
        ];
        let geodesic = cell.geodesic_area_unsigned() / 1e6;
        let mp = MultiPolygon(vec![cell]);
        for (lon0, lat0) in [(35.05, -6.05), (34.9, -6.3), (30.0, -1.0)] {
            let laea = LambertAzimuthalEqualArea::new(lon0, lat0).area_sqkm(&mp);
            let rel = (laea - geodesic).abs() / geodesic;
            assert!(rel < 1e-3, "centre ({lon0}, {lat0}): {laea} vs {geodesic}");
        }
    }

    #[test]
    fn winding_does_not_change_area() {
        let clockwise = polygon![
            (x: 35.0, y: -6.0),
            (x: 35.1, y: -6.0),
            (x: 35.1, y: -6.1),
            (x: 35.0, y: -6.1),
        ];
        let geodesic = clockwise.geodesic_area_signed().abs() / 1e6;
        let mut reversed = clockwise.exterior().0.clone();
        reversed.reverse();
        let counter = Polygon::new(LineString(reversed), vec![]);

        let p = LambertAzimuthalEqualArea::new(35.05, -6.05);
        let cw = p.area_sqkm(&MultiPolygon(vec![clockwise]));
        let ccw = p.area_sqkm(&MultiPolygon(vec![counter]));
        assert!((cw - ccw).abs() < 1e-9);
        assert!((cw - geodesic).abs() / geodesic < 1e-3, "{cw} vs {geodesic}");
    }

    #[test]
    fn empty_geometry_has_zero_area() {
        let p = LambertAzimuthalEqualArea::new(35.0, -6.0);
        assert_eq!(p.area_sqkm(&MultiPolygon(vec![])), 0.0);
    }
}
