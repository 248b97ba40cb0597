//! Geographic <-> Web Mercator (EPSG:3857) projection
//!
//! Point positions are stored in projected metres, the same space the
//! camera works in.

use std::f64::consts::PI;

/// Earth radius used by Web Mercator, in metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world (x and y extent is ±this).
pub const HALF_SIZE: f64 = PI * EARTH_RADIUS;

/// Project longitude/latitude degrees into Web Mercator metres.
///
/// Returns `None` for non-finite input and for coordinates outside
/// [-180, 180] x [-90, 90]. Poles are clamped to the projection extent.
pub fn from_lon_lat(lon: f64, lat: f64) -> Option<[f64; 2]> {
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return None;
    }

    let x = EARTH_RADIUS * lon.to_radians();
    // ln(0) at the south pole is -inf; clamp catches both poles
    let y = EARTH_RADIUS * (PI * (lat + 90.0) / 360.0).tan().ln();

    Some([x, y.clamp(-HALF_SIZE, HALF_SIZE)])
}

/// Inverse of [`from_lon_lat`] for points inside the projected extent.
pub fn to_lon_lat(point: [f64; 2]) -> [f64; 2] {
    let lon = (point[0] / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (point[1] / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    [lon, lat]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn origin_projects_to_origin() {
        let p = from_lon_lat(0.0, 0.0).unwrap();
        assert!(approx(p[0], 0.0, 1e-6));
        assert!(approx(p[1], 0.0, 1e-6));
    }

    #[test]
    fn antimeridian_is_half_size() {
        let p = from_lon_lat(180.0, 0.0).unwrap();
        assert!(approx(p[0], HALF_SIZE, 1e-3));
    }

    #[test]
    fn poles_are_clamped() {
        let north = from_lon_lat(0.0, 90.0).unwrap();
        let south = from_lon_lat(0.0, -90.0).unwrap();
        assert!(approx(north[1], HALF_SIZE, 1e-3));
        assert!(approx(south[1], -HALF_SIZE, 1e-3));
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(from_lon_lat(0.0, 91.0).is_none());
        assert!(from_lon_lat(0.0, -120.0).is_none());
        assert!(from_lon_lat(200.0, 0.0).is_none());
        assert!(from_lon_lat(f64::NAN, 0.0).is_none());
        assert!(from_lon_lat(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn inverse_recovers_input() {
        let p = from_lon_lat(114.419803, 0.341276).unwrap();
        let ll = to_lon_lat(p);
        assert!(approx(ll[0], 114.419803, 1e-9));
        assert!(approx(ll[1], 0.341276, 1e-9));
    }
}
