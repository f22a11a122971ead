//! Scheduler error types.

use thiserror::Error;
use tract_deque::DequeError;
use tract_geom::GeometryError;

use crate::ConfigError;

/// Inconsistent input handed to a scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// No tracts to aggregate.
    #[error("no census tracts to aggregate")]
    NoTracts,

    /// No zones to aggregate into.
    #[error("no zones to aggregate into")]
    NoZones,

    /// A zone without any ring can never contain a tract.
    #[error("zone {id:?} has no rings")]
    EmptyZone { id: String },

    /// Two zones share an id, so totals keyed by id would be ambiguous.
    #[error("zone id {id:?} appears more than once")]
    DuplicateZoneId { id: String },

    /// A zone arrived with a sum already accumulated.
    #[error("zone {id:?} starts with a non-zero sum ({sum})")]
    NonZeroStartingSum { id: String, sum: u64 },
}

/// Scheduler error type.
///
/// Every variant is fatal for the run: no partial totals are returned.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid scheduler configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid tracts or zones.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// A work-stealing deque ran out of slots.
    #[error("work queue error: {0}")]
    Deque(#[from] DequeError),

    /// The geometry oracle faulted while testing a zone.
    #[error("geometry oracle failed on zone {zone:?}: {source}")]
    Oracle {
        zone: String,
        #[source]
        source: GeometryError,
    },

    /// A worker thread panicked.
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
