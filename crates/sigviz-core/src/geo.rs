//! Great-circle helpers shared by ingest (trip distance) and coverage.

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two WGS84 coordinates in degrees.
#[must_use]
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_one_degree_longitude_at_equator() {
        let dist = haversine_m(0.0, 0.0, 0.0, 1.0);
        assert!((dist - 111_195.0).abs() < 200.0, "got {dist}");
    }

    #[test]
    fn haversine_same_point_is_zero() {
        assert!(haversine_m(12.97, 77.59, 12.97, 77.59).abs() < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = haversine_m(12.9716, 77.5946, 12.9721, 77.5950);
        let b = haversine_m(12.9721, 77.5950, 12.9716, 77.5946);
        assert!((a - b).abs() < 1e-9);
    }
}
