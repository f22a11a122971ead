#![allow(clippy::float_cmp)]

//! Planar geometry for tract aggregation.
//!
//! Shapes are stored the way GeoJSON lays them out: a [`Polygon`] is an
//! ordered list of [`Ring`]s, each ring an ordered list of [`Point`]s.
//! Schedulers never look inside a polygon themselves; they ask a
//! [`GeometryOracle`] whether a point is contained.
//!
//! # Multi-part zones
//!
//! A multi-polygon is flattened into a single polygon by concatenating the
//! rings of every part ([`Polygon::merge`]). [`PlanarOracle`] applies the
//! even-odd rule across all rings, so a point inside any disjoint part is
//! contained and a point inside a hole is not.

pub mod error;
pub mod grid;
pub mod oracle;
pub mod shape;

pub use error::{GeometryError, GeometryResult};
pub use grid::{Cell, ZoneGrid};
pub use oracle::{GeometryOracle, PlanarOracle};
pub use shape::{Point, Polygon, Ring};
