//! Single-threaded baseline.

use tract_geom::GeometryOracle;

use crate::{Mode, RunStats, Scheduler, SchedulerResult, Tract, ZoneSum, first_match};

/// Join tracts in input order on the calling thread.
///
/// Deterministic; the other schedulers are checked against it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl Scheduler for Sequential {
    fn mode(&self) -> Mode {
        Mode::Sequential
    }

    fn run(
        &self,
        oracle: &dyn GeometryOracle,
        tracts: &[Tract],
        zones: &mut [ZoneSum],
    ) -> SchedulerResult<RunStats> {
        let mut stats = RunStats {
            tracts: tracts.len(),
            matched: 0,
        };

        for tract in tracts {
            if let Some(index) = first_match(oracle, zones, tract)? {
                zones[index].accumulated_sum += tract.population;
                stats.matched += 1;
            }
        }

        Ok(stats)
    }
}
