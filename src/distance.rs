//! Planar distance between delivery points.

use crate::world::Point;

/// Euclidean distance on the (x, y) plane. Latitude and longitude are ignored.
#[inline]
pub fn distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        let a = Point::new(0, "a", 0.0, 0.0, true);
        let b = Point::new(1, "b", 3.0, 4.0, false);

        assert!((distance(&a, &b) - 5.0).abs() < 1e-12);
        assert!((distance(&b, &a) - 5.0).abs() < 1e-12);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_geographic_fields_do_not_matter() {
        let mut a = Point::new(0, "a", 10.0, 10.0, true);
        let b = Point::new(1, "b", 10.0, 20.0, false);
        a.lat = 12.97;
        a.lon = 77.59;

        assert!((distance(&a, &b) - 10.0).abs() < 1e-12);
    }
}
