//! Tract-to-zone aggregation schedulers.
//!
//! Assigns every census tract to the first zone polygon that contains its
//! centroid and sums populations per zone, using one of three strategies:
//!
//! - [`Sequential`]: one thread, input order. The reference result.
//! - [`StaticPartition`]: contiguous tract ranges per worker, private
//!   accumulation, barrier, single-threaded reduction.
//! - [`WorkStealing`]: tracts dealt round-robin onto bounded
//!   [`tract_deque`] deques; idle workers steal; matches update a shared
//!   sum array under one mutex.
//!
//! All three produce identical totals for the same input.
//!
//! # Example
//!
//! ```
//! use tract_geom::{PlanarOracle, Point, Polygon};
//! use tract_sched::{SchedulerConfig, Tract, ZoneSum, schedule};
//!
//! let zones = vec![
//!     ZoneSum::new("Z1", Polygon::rect(Point::new(0.0, 0.0), Point::new(1.0, 1.0))),
//!     ZoneSum::new("Z2", Polygon::rect(Point::new(2.0, 0.0), Point::new(3.0, 1.0))),
//! ];
//! let tracts = [
//!     Tract::new(Point::new(0.25, 0.5), 10),
//!     Tract::new(Point::new(0.75, 0.5), 20),
//!     Tract::new(Point::new(2.5, 0.5), 30),
//! ];
//!
//! let config = SchedulerConfig::parse("work-stealing", Some("2")).unwrap();
//! let totals = schedule(&config, &PlanarOracle, &tracts, zones).unwrap();
//! assert_eq!(totals[0].sum, 30);
//! assert_eq!(totals[1].sum, 30);
//! ```

mod config;
mod error;
mod join;
mod partition;
mod record;
mod sequential;
mod stealing;

use std::time::Instant;

use tracing::{info, info_span, warn};
use tract_geom::GeometryOracle;

pub use config::{ConfigError, Mode, SchedulerConfig};
pub use error::{InputError, SchedulerError, SchedulerResult};
pub use join::first_match;
pub use partition::{StaticPartition, partition_ranges};
pub use record::{RunStats, Tract, ZoneSum, ZoneTotal, totals, validate};
pub use sequential::Sequential;
pub use stealing::WorkStealing;

/// A strategy for running the join over validated input.
///
/// `run` adds each matched tract's population to its zone's
/// `accumulated_sum` exactly once and reports what it processed. Any error
/// leaves the zones in an unspecified state.
pub trait Scheduler: Send + Sync {
    /// The mode this scheduler implements.
    fn mode(&self) -> Mode;

    /// Join `tracts` into `zones`.
    fn run(
        &self,
        oracle: &dyn GeometryOracle,
        tracts: &[Tract],
        zones: &mut [ZoneSum],
    ) -> SchedulerResult<RunStats>;
}

/// Validate input, run the configured scheduler, and return per-zone totals
/// in zone input order.
pub fn schedule(
    config: &SchedulerConfig,
    oracle: &dyn GeometryOracle,
    tracts: &[Tract],
    mut zones: Vec<ZoneSum>,
) -> SchedulerResult<Vec<ZoneTotal>> {
    validate(tracts, &zones)?;

    let span = info_span!("schedule", mode = %config.mode, threads = config.threads.get());
    let _enter = span.enter();

    info!(tracts = tracts.len(), zones = zones.len(), "starting aggregation");
    let start = Instant::now();
    let stats = config.scheduler().run(oracle, tracts, &mut zones)?;

    info!(
        matched = stats.matched,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "aggregation finished"
    );
    if stats.unmatched() > 0 {
        warn!(
            unmatched = stats.unmatched(),
            "tracts outside every zone were dropped"
        );
    }

    Ok(totals(&zones))
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Mode, Scheduler, SchedulerConfig, SchedulerError, Tract, ZoneSum, ZoneTotal, schedule,
    };
}
