//! Static-partition scheduler.
//!
//! ```text
//!  tracts: [ 0 .. n/w ) [ n/w .. 2n/w ) ... [ (w-1)n/w .. n )
//!              │              │                   │
//!           worker 0       worker 1   ...      worker w-1     (private maps)
//!              └──────────────┴─────── barrier ───┘
//!                                │
//!                     single-threaded reduce
//!                                │
//!                     scatter totals by zone id
//! ```
//!
//! Workers share nothing while they run. Each one records the populations
//! it matched per zone id, and only the coordinating thread sums them after
//! every worker has joined.

use std::{num::NonZeroUsize, ops::Range, thread};

use hashbrown::HashMap;
use tracing::debug;
use tract_geom::GeometryOracle;

use crate::{
    Mode, RunStats, Scheduler, SchedulerResult, Tract, ZoneSum, first_match,
    join::{AbortFlag, join_workers},
};

/// Contiguous tract ranges, one per worker.
///
/// Worker `i` owns `[i*n/w, (i+1)*n/w)`; the last worker runs to `n` so
/// integer truncation never drops a tract. The ranges are disjoint and
/// cover `0..n` exactly.
#[must_use]
pub fn partition_ranges(n: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let w = workers.get();
    (0..w)
        .map(|i| {
            let start = i * n / w;
            let end = if i == w - 1 { n } else { (i + 1) * n / w };
            start..end
        })
        .collect()
}

/// Matches recorded privately by one worker.
///
/// Populations are kept per match rather than as a running sum; they are
/// only added up during the reduction.
#[derive(Debug, Default)]
pub(crate) struct PartialSums<'a> {
    populations: HashMap<&'a str, Vec<u64>>,
    matched: usize,
}

impl<'a> PartialSums<'a> {
    /// Create an empty accumulator.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record one matched tract.
    pub(crate) fn record(&mut self, zone_id: &'a str, population: u64) {
        self.populations.entry(zone_id).or_default().push(population);
        self.matched += 1;
    }

    /// Number of matches recorded.
    #[must_use]
    pub(crate) const fn matched(&self) -> usize {
        self.matched
    }

    #[cfg(test)]
    fn get(&self, zone_id: &str) -> &[u64] {
        self.populations
            .get(zone_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Sum every worker's per-zone lists into one total per zone id.
#[must_use]
pub(crate) fn reduce<'a>(
    partials: impl IntoIterator<Item = PartialSums<'a>>,
) -> HashMap<String, u64> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for partial in partials {
        for (zone_id, populations) in partial.populations {
            let total = totals.entry_ref(zone_id).or_default();
            *total += populations.iter().sum::<u64>();
        }
    }
    totals
}

/// Write reduced totals onto the zones, matching by id.
pub(crate) fn scatter(totals: &HashMap<String, u64>, zones: &mut [ZoneSum]) {
    for zone in zones {
        if let Some(total) = totals.get(zone.id.as_str()) {
            zone.accumulated_sum += total;
        }
    }
}

/// Fixed contiguous ranges across `workers` threads.
#[derive(Clone, Copy, Debug)]
pub struct StaticPartition {
    workers: NonZeroUsize,
}

impl StaticPartition {
    #[must_use]
    pub const fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    #[must_use]
    pub const fn workers(&self) -> NonZeroUsize {
        self.workers
    }
}

impl Scheduler for StaticPartition {
    fn mode(&self) -> Mode {
        Mode::StaticPartition
    }

    fn run(
        &self,
        oracle: &dyn GeometryOracle,
        tracts: &[Tract],
        zones: &mut [ZoneSum],
    ) -> SchedulerResult<RunStats> {
        let ranges = partition_ranges(tracts.len(), self.workers);
        let abort = AbortFlag::default();
        let shared: &[ZoneSum] = zones;

        let partials = thread::scope(|s| {
            let handles: Vec<_> = ranges
                .into_iter()
                .enumerate()
                .map(|(worker, range)| {
                    let slice = &tracts[range];
                    let abort = &abort;
                    s.spawn(move || {
                        let mut partial = PartialSums::new();
                        for tract in slice {
                            if abort.is_raised() {
                                break;
                            }
                            match first_match(oracle, shared, tract) {
                                Ok(Some(index)) => {
                                    partial.record(&shared[index].id, tract.population);
                                }
                                Ok(None) => {}
                                Err(err) => {
                                    abort.raise();
                                    return Err(err);
                                }
                            }
                        }
                        debug!(
                            worker,
                            tracts = slice.len(),
                            matched = partial.matched(),
                            "partition worker finished"
                        );
                        Ok(partial)
                    })
                })
                .collect();

            join_workers(handles)
        })?;

        let matched = partials.iter().map(PartialSums::matched).sum();
        let totals = reduce(partials);
        scatter(&totals, zones);

        Ok(RunStats {
            tracts: tracts.len(),
            matched,
        })
    }
}
