//! GeoJSON feature collections to tracts and zones.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use tract_geom::{GeometryError, GeometryOracle, Polygon};
use tract_sched::{Tract, ZoneSum};

use crate::DataPaths;

/// Population property on tract features.
pub const POPULATION_PROPERTY: &str = "P1_001N";
/// Zip-code property on zone features.
pub const ZIP_PROPERTY: &str = "ZCTA5CE20";

/// Load error type.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature {feature} has no geometry")]
    MissingGeometry { feature: usize },

    #[error("feature {feature} has unsupported geometry type {kind:?}")]
    UnsupportedGeometry { feature: usize, kind: String },

    #[error("invalid geometry at zip code {zip}")]
    UnsupportedZoneGeometry { zip: String, kind: String },

    #[error("feature {feature} has malformed {kind} coordinates: {source}")]
    Coordinates {
        feature: usize,
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature {feature} is missing property {property}")]
    MissingProperty {
        feature: usize,
        property: &'static str,
    },

    #[error("feature {feature} has invalid population {value}")]
    InvalidPopulation { feature: usize, value: Value },

    #[error("feature {feature} has no usable centroid: {source}")]
    Centroid {
        feature: usize,
        #[source]
        source: GeometryError,
    },
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

impl Feature {
    fn property(&self, feature: usize, property: &'static str) -> Result<&Value, LoadError> {
        self.properties
            .as_ref()
            .and_then(|p| p.get(property))
            .filter(|v| !v.is_null())
            .ok_or(LoadError::MissingProperty { feature, property })
    }

    fn geometry(&self, feature: usize) -> Result<&Geometry, LoadError> {
        self.geometry
            .as_ref()
            .ok_or(LoadError::MissingGeometry { feature })
    }
}

impl Geometry {
    fn coordinates<T: for<'de> Deserialize<'de>>(&self, feature: usize) -> Result<T, LoadError> {
        serde_json::from_value(self.coordinates.clone()).map_err(|source| {
            LoadError::Coordinates {
                feature,
                kind: self.kind.clone(),
                source,
            }
        })
    }
}

fn read_collection(path: &Path) -> Result<FeatureCollection, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_population(feature: usize, value: &Value) -> Result<u64, LoadError> {
    let invalid = || LoadError::InvalidPopulation {
        feature,
        value: value.clone(),
    };
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    // Census exports sometimes carry counts as floats
    let n = value.as_f64().ok_or_else(invalid)?;
    if !n.is_finite() || n < 0.0 {
        return Err(invalid());
    }
    Ok(n as u64)
}

/// Load census tracts, reducing each polygon to its centroid.
///
/// Centroids are computed in parallel.
pub fn load_tracts(path: &Path, oracle: &dyn GeometryOracle) -> Result<Vec<Tract>, LoadError> {
    let collection = read_collection(path)?;

    let shapes = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let geometry = feature.geometry(index)?;
            if geometry.kind != "Polygon" {
                return Err(LoadError::UnsupportedGeometry {
                    feature: index,
                    kind: geometry.kind.clone(),
                });
            }
            let polygon: Polygon = geometry.coordinates(index)?;
            let raw = feature.property(index, POPULATION_PROPERTY)?;
            let population = parse_population(index, raw)?;
            Ok((polygon, population))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tracts = shapes
        .into_par_iter()
        .enumerate()
        .map(|(index, (polygon, population))| {
            oracle
                .centroid(&polygon)
                .map(|centroid| Tract::new(centroid, population))
                .map_err(|source| LoadError::Centroid {
                    feature: index,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %path.display(), tracts = tracts.len(), "loaded tracts");
    Ok(tracts)
}

/// Load zip-code areas. Multi-polygons are merged into one ring list.
pub fn load_zones(path: &Path) -> Result<Vec<ZoneSum>, LoadError> {
    let collection = read_collection(path)?;

    let zones = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let zip = match feature.property(index, ZIP_PROPERTY)? {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let geometry = feature.geometry(index)?;
            let polygon = match geometry.kind.as_str() {
                "Polygon" => geometry.coordinates(index)?,
                "MultiPolygon" => Polygon::merge(geometry.coordinates::<Vec<Polygon>>(index)?),
                other => {
                    return Err(LoadError::UnsupportedZoneGeometry {
                        zip,
                        kind: other.to_string(),
                    });
                }
            };
            Ok(ZoneSum::new(zip, polygon))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %path.display(), zones = zones.len(), "loaded zones");
    Ok(zones)
}

/// Load both collections of a data set.
pub fn load_dataset(
    paths: &DataPaths,
    oracle: &dyn GeometryOracle,
) -> Result<(Vec<Tract>, Vec<ZoneSum>), LoadError> {
    let tracts = load_tracts(&paths.tracts, oracle)?;
    let zones = load_zones(&paths.zones)?;
    info!(tracts = tracts.len(), zones = zones.len(), "loaded data set");
    Ok((tracts, zones))
}
