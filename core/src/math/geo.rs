/// Mean Earth radius, meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in meters between two (latitude, longitude)
/// points, degrees in.
pub fn haversine_distance(start: (f64, f64), end: (f64, f64)) -> f64 {
    let lat1 = start.0.to_radians();
    let lat2 = end.0.to_radians();
    let d_lat = (end.0 - start.0).to_radians();
    let d_lon = (end.1 - start.1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_pair() {
        let start = (37.8329426, -121.64040112);
        let end = (37.8285883, -121.6356015);
        let distance = haversine_distance(start, end);
        assert!((distance - 641.96).abs() < 0.1);
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert_eq!(haversine_distance((42.0, -71.0), (42.0, -71.0)), 0.0);
    }
}
