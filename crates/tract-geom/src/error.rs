//! Geometry error types.

use thiserror::Error;

/// Error raised by a [`GeometryOracle`](crate::GeometryOracle).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The query point has a NaN or infinite coordinate.
    #[error("point ({x}, {y}) has a non-finite coordinate")]
    NonFinitePoint { x: f64, y: f64 },

    /// The polygon has no rings at all.
    #[error("polygon has no rings")]
    EmptyPolygon,

    /// A ring cannot enclose any area.
    #[error("ring {ring} has {len} vertices, need at least 3")]
    DegenerateRing { ring: usize, len: usize },

    /// Centroid requested for a polygon whose area nets out to zero.
    #[error("polygon has zero area")]
    ZeroArea,
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
