use geo_types::Coord;
use std::f64::consts::PI;

/// Pure spherical-earth helpers used by all conversion passes. Inputs at the
/// public boundary are WGS84 degrees; bearings are radians.
pub struct GeoUtils;

impl GeoUtils {
    // Earth's radius in meters
    pub const GEO_R: f64 = 6_371_000.0;

    pub fn deg2rad(deg: f64) -> f64 {
        deg * PI / 180.0
    }

    pub fn rad2deg(rad: f64) -> f64 {
        rad * 180.0 / PI
    }

    /// Great-circle distance in meters between two lat/lon points given in degrees.
    pub fn distance(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
        GeoUtils::dist_rad(
            GeoUtils::deg2rad(lat_a),
            GeoUtils::deg2rad(lon_a),
            GeoUtils::deg2rad(lat_b),
            GeoUtils::deg2rad(lon_b),
        )
    }

    /// Initial bearing in radians from the first point towards the second,
    /// both given in degrees.
    pub fn bearing(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
        GeoUtils::bear_rad(
            GeoUtils::deg2rad(lat_a),
            GeoUtils::deg2rad(lon_a),
            GeoUtils::deg2rad(lat_b),
            GeoUtils::deg2rad(lon_b),
        )
    }

    /// Projects a point at `distance` meters along `bearing_rad` from the
    /// start point (degrees). Returns a Coord with x=longitude, y=latitude.
    pub fn destination(lat: f64, lon: f64, bearing_rad: f64, distance: f64) -> Coord {
        let lat1 = GeoUtils::deg2rad(lat);
        let lon1 = GeoUtils::deg2rad(lon);
        let ang = distance / GeoUtils::GEO_R;

        let lat2 = (lat1.sin() * ang.cos() + lat1.cos() * ang.sin() * bearing_rad.cos()).asin();
        let lon2 = lon1
            + (bearing_rad.sin() * ang.sin() * lat1.cos())
                .atan2(ang.cos() - lat1.sin() * lat2.sin());

        Coord {
            x: GeoUtils::rad2deg(lon2),
            y: GeoUtils::rad2deg(lat2),
        }
    }

    /// Shortest distance in meters from point C to the great-circle arc A-B.
    ///
    /// When C bears away from the arc by more than 90 degrees the result is
    /// the plain distance A-C; when the foot of the perpendicular falls past
    /// B it is the distance B-C.
    pub fn cross_track_distance(
        lat_a: f64,
        lon_a: f64,
        lat_b: f64,
        lon_b: f64,
        lat_c: f64,
        lon_c: f64,
    ) -> f64 {
        let lat1 = GeoUtils::deg2rad(lat_a);
        let lon1 = GeoUtils::deg2rad(lon_a);
        let lat2 = GeoUtils::deg2rad(lat_b);
        let lon2 = GeoUtils::deg2rad(lon_b);
        let lat3 = GeoUtils::deg2rad(lat_c);
        let lon3 = GeoUtils::deg2rad(lon_c);

        let bear12 = GeoUtils::bear_rad(lat1, lon1, lat2, lon2);
        let bear13 = GeoUtils::bear_rad(lat1, lon1, lat3, lon3);
        let dist13 = GeoUtils::dist_rad(lat1, lon1, lat3, lon3);

        let mut diff = (bear13 - bear12).abs();
        if diff > PI {
            diff = 2.0 * PI - diff;
        }

        // Relative bearing obtuse: C lies behind the arc start
        if diff > PI / 2.0 {
            return dist13;
        }

        let dxt =
            ((dist13 / GeoUtils::GEO_R).sin() * (bear13 - bear12).sin()).asin() * GeoUtils::GEO_R;

        // Foot of the perpendicular beyond B?
        let dist12 = GeoUtils::dist_rad(lat1, lon1, lat2, lon2);
        let dist14 = ((dist13 / GeoUtils::GEO_R).cos() / (dxt / GeoUtils::GEO_R).cos()).acos()
            * GeoUtils::GEO_R;
        if dist14 > dist12 {
            GeoUtils::dist_rad(lat2, lon2, lat3, lon3)
        } else {
            dxt.abs()
        }
    }

    fn dist_rad(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let sin_dlat = ((lat2 - lat1) / 2.0).sin();
        let sin_dlon = ((lon2 - lon1) / 2.0).sin();

        let a = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;

        2.0 * a.sqrt().atan2((1.0 - a).sqrt()) * GeoUtils::GEO_R
    }

    fn bear_rad(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        ((lon2 - lon1).sin() * lat2.cos())
            .atan2(lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon2 - lon1).cos())
    }
}

#[cfg(test)]
mod tests {
    use super::GeoUtils;

    #[test]
    fn distance_one_degree_of_longitude_at_equator() {
        let d = GeoUtils::distance(0.0, 0.0, 0.0, 1.0);
        // One degree of arc on a 6371 km sphere
        assert!((d - 111_194.9).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn destination_distance_round_trip() {
        for dist in [50.0, 1_000.0, 25_000.0, 100_000.0] {
            let p = GeoUtils::destination(47.5, 19.0, GeoUtils::deg2rad(63.0), dist);
            let back = GeoUtils::distance(47.5, 19.0, p.y, p.x);
            assert!((back - dist).abs() < 1.0, "dist {} came back as {}", dist, back);
        }
    }

    #[test]
    fn cross_track_point_near_arc() {
        let d = GeoUtils::cross_track_distance(0.0, 0.0, 0.0, 1.0, 0.0005, 0.5);
        assert!(d > 0.0 && d < 100.0, "got {}", d);
    }

    #[test]
    fn cross_track_point_beyond_arc_end() {
        let d = GeoUtils::cross_track_distance(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let to_end = GeoUtils::distance(0.0, 1.0, 1.0, 1.0);
        assert!((d - to_end).abs() < 1e-6, "got {} expected {}", d, to_end);
    }

    #[test]
    fn cross_track_point_behind_arc_start() {
        let d = GeoUtils::cross_track_distance(0.0, 0.0, 0.0, 1.0, 0.0, -0.5);
        let to_start = GeoUtils::distance(0.0, 0.0, 0.0, -0.5);
        assert!((d - to_start).abs() < 1e-6);
    }
}
