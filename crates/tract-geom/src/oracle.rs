//! Containment and centroid queries.

use crate::{GeometryError, GeometryResult, Point, Polygon};

/// Black-box geometry used by the schedulers.
///
/// Implementations must be pure: the same inputs always give the same
/// answer, from any thread. Errors are treated as fatal by callers.
pub trait GeometryOracle: Sync {
    /// Whether `point` lies inside `polygon`.
    fn contains(&self, polygon: &Polygon, point: Point) -> GeometryResult<bool>;

    /// Representative point of `polygon`.
    fn centroid(&self, polygon: &Polygon) -> GeometryResult<Point>;
}

/// Flat-plane oracle using even-odd ray casting.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarOracle;

impl PlanarOracle {
    fn validate(polygon: &Polygon) -> GeometryResult<()> {
        if polygon.is_empty() {
            return Err(GeometryError::EmptyPolygon);
        }
        for (ring, r) in polygon.rings().iter().enumerate() {
            if r.len() < 3 {
                return Err(GeometryError::DegenerateRing { ring, len: r.len() });
            }
        }
        Ok(())
    }
}

impl GeometryOracle for PlanarOracle {
    fn contains(&self, polygon: &Polygon, point: Point) -> GeometryResult<bool> {
        if !point.is_finite() {
            return Err(GeometryError::NonFinitePoint {
                x: point.x,
                y: point.y,
            });
        }
        Self::validate(polygon)?;

        // Even-odd over every ring: holes flip back out, extra parts flip in.
        let mut inside = false;
        for ring in polygon.rings() {
            for (a, b) in ring.edges() {
                if (a.y > point.y) != (b.y > point.y)
                    && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
                {
                    inside = !inside;
                }
            }
        }
        Ok(inside)
    }

    fn centroid(&self, polygon: &Polygon) -> GeometryResult<Point> {
        Self::validate(polygon)?;

        // First ring is the outer boundary, the rest are subtracted.
        let mut total = 0.0;
        let mut x = 0.0;
        let mut y = 0.0;
        for (i, ring) in polygon.rings().iter().enumerate() {
            let (area, c) = ring.area_and_centroid();
            let weight = if i == 0 { area.abs() } else { -area.abs() };
            total += weight;
            x += weight * c.x;
            y += weight * c.y;
        }

        if total.abs() < f64::EPSILON {
            return Err(GeometryError::ZeroArea);
        }
        Ok(Point::new(x / total, y / total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ring;

    fn square(x0: f64, y0: f64, side: f64) -> Polygon {
        Polygon::rect(Point::new(x0, y0), Point::new(x0 + side, y0 + side))
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let oracle = PlanarOracle;
        let polygon = square(0.0, 0.0, 1.0);

        assert!(oracle.contains(&polygon, Point::new(0.5, 0.5)).unwrap());
        assert!(!oracle.contains(&polygon, Point::new(1.5, 0.5)).unwrap());
        assert!(!oracle.contains(&polygon, Point::new(0.5, -0.1)).unwrap());
    }

    #[test]
    fn test_hole_excludes_points() {
        let oracle = PlanarOracle;
        let mut polygon = square(0.0, 0.0, 4.0);
        polygon
            .0
            .push(Ring::rect(Point::new(1.0, 1.0), Point::new(3.0, 3.0)));

        assert!(oracle.contains(&polygon, Point::new(0.5, 0.5)).unwrap());
        assert!(!oracle.contains(&polygon, Point::new(2.0, 2.0)).unwrap());
    }

    #[test]
    fn test_merged_parts_both_contain() {
        let oracle = PlanarOracle;
        let merged = Polygon::merge([square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)]);

        assert!(oracle.contains(&merged, Point::new(0.5, 0.5)).unwrap());
        assert!(oracle.contains(&merged, Point::new(10.5, 10.5)).unwrap());
        assert!(!oracle.contains(&merged, Point::new(5.0, 5.0)).unwrap());
    }

    #[test]
    fn test_open_ring_matches_closed_ring() {
        let oracle = PlanarOracle;
        let open = Polygon::new(vec![Ring(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ])]);

        assert!(oracle.contains(&open, Point::new(1.0, 1.0)).unwrap());
        assert!(!oracle.contains(&open, Point::new(3.0, 1.0)).unwrap());
    }

    #[test]
    fn test_contains_faults() {
        let oracle = PlanarOracle;
        let polygon = square(0.0, 0.0, 1.0);

        assert!(matches!(
            oracle.contains(&polygon, Point::new(f64::NAN, 0.0)),
            Err(GeometryError::NonFinitePoint { .. })
        ));
        assert!(matches!(
            oracle.contains(&polygon, Point::new(f64::INFINITY, 0.0)),
            Err(GeometryError::NonFinitePoint { .. })
        ));
        assert_eq!(
            oracle.contains(&Polygon::default(), Point::new(0.0, 0.0)),
            Err(GeometryError::EmptyPolygon)
        );

        let line = Polygon::new(vec![Ring(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)])]);
        assert_eq!(
            oracle.contains(&line, Point::new(0.0, 0.0)),
            Err(GeometryError::DegenerateRing { ring: 0, len: 2 })
        );
    }

    #[test]
    fn test_centroid_of_rectangle() {
        let oracle = PlanarOracle;
        let polygon = Polygon::rect(Point::new(2.0, 4.0), Point::new(6.0, 6.0));
        let c = oracle.centroid(&polygon).unwrap();
        assert!((c.x - 4.0).abs() < 1e-12);
        assert!((c.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_subtracts_holes() {
        let oracle = PlanarOracle;
        // 4x4 square with its right half cut out
        let mut polygon = square(0.0, 0.0, 4.0);
        polygon
            .0
            .push(Ring::rect(Point::new(2.0, 0.0), Point::new(4.0, 4.0)));

        let c = oracle.centroid(&polygon).unwrap();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_of_flat_polygon_fails() {
        let oracle = PlanarOracle;
        let flat = Polygon::new(vec![Ring(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ])]);
        assert_eq!(oracle.centroid(&flat), Err(GeometryError::ZeroArea));
    }
}
