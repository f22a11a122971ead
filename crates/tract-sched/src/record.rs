//! Tracts, zones and per-zone totals.

use hashbrown::HashSet;
use tract_geom::{Point, Polygon};

use crate::InputError;

/// A census tract reduced to its centroid and population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tract {
    pub centroid: Point,
    pub population: u64,
}

impl Tract {
    #[must_use]
    pub const fn new(centroid: Point, population: u64) -> Self {
        Self {
            centroid,
            population,
        }
    }
}

/// A zip-code area and the population accumulated into it.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneSum {
    pub polygon: Polygon,
    pub id: String,
    pub accumulated_sum: u64,
}

impl ZoneSum {
    /// Create a zone with a zero sum.
    #[must_use]
    pub fn new(id: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            polygon,
            id: id.into(),
            accumulated_sum: 0,
        }
    }

    /// Output row for this zone.
    #[must_use]
    pub fn total(&self) -> ZoneTotal {
        ZoneTotal {
            id: self.id.clone(),
            sum: self.accumulated_sum,
        }
    }
}

/// Final population of one zone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ZoneTotal {
    pub id: String,
    pub sum: u64,
}

/// Output rows in zone input order.
#[must_use]
pub fn totals(zones: &[ZoneSum]) -> Vec<ZoneTotal> {
    zones.iter().map(ZoneSum::total).collect()
}

/// Reject input that would silently produce wrong or empty totals.
pub fn validate(tracts: &[Tract], zones: &[ZoneSum]) -> Result<(), InputError> {
    if tracts.is_empty() {
        return Err(InputError::NoTracts);
    }
    if zones.is_empty() {
        return Err(InputError::NoZones);
    }

    let mut seen = HashSet::with_capacity(zones.len());
    for zone in zones {
        if zone.polygon.is_empty() {
            return Err(InputError::EmptyZone {
                id: zone.id.clone(),
            });
        }
        if zone.accumulated_sum != 0 {
            return Err(InputError::NonZeroStartingSum {
                id: zone.id.clone(),
                sum: zone.accumulated_sum,
            });
        }
        if !seen.insert(zone.id.as_str()) {
            return Err(InputError::DuplicateZoneId {
                id: zone.id.clone(),
            });
        }
    }
    Ok(())
}

/// Aggregate counters reported by a scheduler run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Tracts processed.
    pub tracts: usize,
    /// Tracts that landed in some zone.
    pub matched: usize,
}

impl RunStats {
    /// Tracts that matched no zone and were dropped.
    #[must_use]
    pub const fn unmatched(&self) -> usize {
        self.tracts - self.matched
    }
}
