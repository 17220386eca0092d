//! Distance primitives on WGS84 coordinates.
//!
//! Final distances always go through the Haversine formula. Point-to-segment
//! projection uses a local equirectangular approximation, which is fine for
//! road segments up to a few tens of kilometers but not for geometry that
//! spans large areas or the antimeridian.

use geo::Point;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    let (lat1, lat2) = (p1.y().to_radians(), p2.y().to_radians());
    let d_lat = (p2.y() - p1.y()).to_radians();
    let d_lon = (p2.x() - p1.x()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1]
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Calculate distance from a point to the segment `start`-`end` in meters
///
/// The segment is projected around `point`'s latitude (longitude scaled by
/// cos(lat)), the foot of the perpendicular is clamped to the segment, and
/// the distance to that foot is measured with Haversine.
pub fn point_to_segment_distance(point: Point, start: Point, end: Point) -> f64 {
    let kx = point.y().to_radians().cos();

    let (ax, ay) = (start.x() * kx, start.y());
    let (bx, by) = (end.x() * kx, end.y());
    let (px, py) = (point.x() * kx, point.y());

    let dx = bx - ax;
    let dy = by - ay;

    if dx == 0.0 && dy == 0.0 {
        return haversine_distance(point, start);
    }

    // At a pole every longitude collapses; the foot cannot be unprojected
    if kx.abs() < f64::EPSILON {
        return haversine_distance(point, start).min(haversine_distance(point, end));
    }

    let t = ((px - ax) * dx + (py - ay) * dy) / (dx * dx + dy * dy);
    if t < 0.0 {
        return haversine_distance(point, start);
    }
    if t > 1.0 {
        return haversine_distance(point, end);
    }

    let foot = Point::new((ax + t * dx) / kx, ay + t * dy);
    haversine_distance(point, foot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_distance() {
        // Wellington to Auckland is roughly 494 km as the crow flies
        let wellington = Point::new(174.7762, -41.2865);
        let auckland = Point::new(174.7633, -36.8485);

        let dist = haversine_distance(wellington, auckland);
        assert!((dist - 493_500.0).abs() < 5_000.0);
    }

    #[test]
    fn test_haversine_identity_and_symmetry() {
        let nelson = Point::new(173.2840, -41.2706);
        let blenheim = Point::new(173.9528, -41.5134);

        assert_eq!(haversine_distance(nelson, nelson), 0.0);
        assert_relative_eq!(
            haversine_distance(nelson, blenheim),
            haversine_distance(blenheim, nelson),
            max_relative = 1e-12
        );
        assert!(haversine_distance(nelson, blenheim) > 0.0);
    }

    #[test]
    fn test_haversine_antipodes_is_finite() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(180.0, 0.0);

        let dist = haversine_distance(a, b);
        assert!(dist.is_finite());
        assert_relative_eq!(dist, std::f64::consts::PI * EARTH_RADIUS_M, max_relative = 1e-9);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Point::new(173.05, -41.05);
        let v = Point::new(173.0, -41.0);

        assert_eq!(point_to_segment_distance(p, v, v), haversine_distance(p, v));
    }

    #[test]
    fn test_point_on_segment() {
        let start = Point::new(173.0, -41.0);
        let end = Point::new(173.1, -41.1);
        let mid = Point::new(173.05, -41.05);

        // The equirectangular projection bends the chord slightly
        assert!(point_to_segment_distance(mid, start, end) < 50.0);
    }

    #[test]
    fn test_projection_clamps_to_endpoints() {
        let start = Point::new(173.0, -41.0);
        let end = Point::new(173.1, -41.0);

        // Beyond the start of the segment
        let before = Point::new(172.9, -41.0);
        assert_relative_eq!(
            point_to_segment_distance(before, start, end),
            haversine_distance(before, start)
        );

        // Beyond the end
        let after = Point::new(173.3, -41.0);
        assert_relative_eq!(
            point_to_segment_distance(after, start, end),
            haversine_distance(after, end)
        );
    }

    #[test]
    fn test_perpendicular_distance() {
        // Segment running east-west; point 0.01 degrees of latitude north of its middle
        let start = Point::new(173.0, -41.0);
        let end = Point::new(173.1, -41.0);
        let p = Point::new(173.05, -40.99);

        let expected = haversine_distance(p, Point::new(173.05, -41.0));
        assert_relative_eq!(
            point_to_segment_distance(p, start, end),
            expected,
            max_relative = 1e-9
        );
        assert!((expected - 1_112.0).abs() < 5.0);
    }
}
