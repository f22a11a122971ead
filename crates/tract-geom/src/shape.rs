//! Points, rings and polygons.

use serde::{Deserialize, Serialize};

/// A planar point.
///
/// Deserializes from a GeoJSON position (`[x, y]` or `[x, y, z]`; any
/// trailing coordinates are ignored).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl TryFrom<Vec<f64>> for Point {
    type Error = String;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        match coords.as_slice() {
            [x, y, ..] => Ok(Self::new(*x, *y)),
            other => Err(format!(
                "position needs at least 2 coordinates, got {}",
                other.len()
            )),
        }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// A closed sequence of vertices.
///
/// GeoJSON rings repeat the first vertex at the end; rings built by hand
/// may omit it. Both forms describe the same area.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(pub Vec<Point>);

impl Ring {
    /// Axis-aligned rectangle, counter-clockwise, closed.
    #[must_use]
    pub fn rect(min: Point, max: Point) -> Self {
        Self(vec![
            Point::new(min.x, min.y),
            Point::new(max.x, min.y),
            Point::new(max.x, max.y),
            Point::new(min.x, max.y),
            Point::new(min.x, min.y),
        ])
    }

    /// The ring's vertices.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Number of stored vertices (including a repeated closing vertex).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the edges `(a, b)`, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.0.len();
        (0..n).map(move |i| (self.0[(i + n - 1) % n], self.0[i]))
    }

    /// Signed area and area centroid (shoelace formula).
    ///
    /// Counter-clockwise rings have positive area.
    #[must_use]
    pub fn area_and_centroid(&self) -> (f64, Point) {
        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;

        for (a, b) in self.edges() {
            let cross = a.x * b.y - b.x * a.y;
            twice_area += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }

        let area = twice_area / 2.0;
        if area == 0.0 {
            return (0.0, Point::new(0.0, 0.0));
        }
        (area, Point::new(cx / (6.0 * area), cy / (6.0 * area)))
    }
}

/// An ordered sequence of rings.
///
/// The first ring is the outer boundary of a simple polygon; later rings are
/// holes or, after [`Polygon::merge`], the boundaries of further parts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<Ring>);

impl Polygon {
    /// Create a polygon from its rings.
    #[must_use]
    pub fn new(rings: Vec<Ring>) -> Self {
        Self(rings)
    }

    /// Single-ring axis-aligned rectangle.
    #[must_use]
    pub fn rect(min: Point, max: Point) -> Self {
        Self(vec![Ring::rect(min, max)])
    }

    /// Flatten a multi-part polygon by concatenating the rings of every part.
    ///
    /// This is not a geometric union: overlapping parts are not dissolved.
    #[must_use]
    pub fn merge(parts: impl IntoIterator<Item = Polygon>) -> Self {
        Self(parts.into_iter().flat_map(|part| part.0).collect())
    }

    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_geojson_position() {
        let p: Point = serde_json::from_str("[1.5, -2.0]").unwrap();
        assert_eq!(p, Point::new(1.5, -2.0));

        let p: Point = serde_json::from_str("[1.5, -2.0, 30.0]").unwrap();
        assert_eq!(p, Point::new(1.5, -2.0));

        assert!(serde_json::from_str::<Point>("[1.5]").is_err());
    }

    #[test]
    fn test_polygon_from_geojson_coordinates() {
        let json = "[[[0,0],[1,0],[1,1],[0,1],[0,0]]]";
        let polygon: Polygon = serde_json::from_str(json).unwrap();
        assert_eq!(polygon.rings().len(), 1);
        assert_eq!(polygon.rings()[0].len(), 5);
    }

    #[test]
    fn test_unit_square_area_and_centroid() {
        let ring = Ring::rect(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let (area, centroid) = ring.area_and_centroid();
        assert!((area - 1.0).abs() < 1e-12);
        assert!((centroid.x - 0.5).abs() < 1e-12);
        assert!((centroid.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clockwise_ring_has_negative_area() {
        let mut ring = Ring::rect(Point::new(0.0, 0.0), Point::new(2.0, 1.0));
        ring.0.reverse();
        let (area, centroid) = ring.area_and_centroid();
        assert!((area + 2.0).abs() < 1e-12);
        assert!((centroid.x - 1.0).abs() < 1e-12);
        assert!((centroid.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_merge_concatenates_rings_in_order() {
        let a = Polygon::rect(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Polygon::rect(Point::new(5.0, 5.0), Point::new(6.0, 6.0));
        let merged = Polygon::merge([a.clone(), b.clone()]);

        assert_eq!(merged.rings().len(), 2);
        assert_eq!(merged.rings()[0], a.rings()[0]);
        assert_eq!(merged.rings()[1], b.rings()[0]);
    }
}
