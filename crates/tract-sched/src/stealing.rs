//! Work-stealing scheduler.
//!
//! # Run Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Phase 1: Producer deals tract i to deque (i mod w)         │
//! │  Phase 2: Spawn w workers                                   │
//! │           loop: pop own deque (LIFO)                        │
//! │                 else steal from peers in index order (FIFO) │
//! │                 else exit                                   │
//! │           match → lock sums, add population, unlock         │
//! │  Phase 3: Join all workers                                  │
//! │  Phase 4: Copy shared sums onto the zones                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every tract is dealt before any worker starts, and no task is created
//! afterwards. A worker that finds every deque empty in one full scan can
//! therefore exit for good; the check does not retry and would not be
//! sufficient if tasks could be spawned during the run.

use std::{num::NonZeroUsize, thread};

use parking_lot::Mutex;
use tracing::debug;
use tract_deque::{Stealer, Worker};
use tract_geom::GeometryOracle;

use crate::{
    Mode, RunStats, Scheduler, SchedulerResult, Tract, ZoneSum, first_match,
    join::{AbortFlag, join_workers},
};

/// Per-worker deques with stealing, and one lock around all zone sums.
#[derive(Clone, Copy, Debug)]
pub struct WorkStealing {
    workers: NonZeroUsize,
    deque_capacity: NonZeroUsize,
}

impl WorkStealing {
    #[must_use]
    pub const fn new(workers: NonZeroUsize, deque_capacity: NonZeroUsize) -> Self {
        Self {
            workers,
            deque_capacity,
        }
    }

    #[must_use]
    pub const fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    #[must_use]
    pub const fn deque_capacity(&self) -> NonZeroUsize {
        self.deque_capacity
    }

    /// Deal every tract round-robin onto fresh deques.
    ///
    /// Fails if any deque runs out of slots; nothing has been spawned yet
    /// at that point.
    pub fn distribute<'t>(&self, tracts: &'t [Tract]) -> SchedulerResult<Vec<Worker<&'t Tract>>> {
        let workers = self.workers.get();
        let deques: Vec<Worker<&Tract>> = (0..workers)
            .map(|_| Worker::new(self.deque_capacity))
            .collect();

        for (index, tract) in tracts.iter().enumerate() {
            deques[index % workers].push(tract)?;
        }
        Ok(deques)
    }
}

/// Counters kept by one worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ThiefReport {
    /// Tasks taken from the worker's own deque.
    pub popped: usize,
    /// Tasks taken from peers.
    pub stolen: usize,
    /// Tasks whose tract matched a zone.
    pub matched: usize,
}

impl ThiefReport {
    /// Total tasks processed by the worker.
    #[must_use]
    pub(crate) const fn processed(&self) -> usize {
        self.popped + self.stolen
    }
}

/// One worker of a work-stealing run.
struct Thief<'t, 'env> {
    id: usize,
    deque: Worker<&'t Tract>,
    peers: &'env [Stealer<&'t Tract>],
    zones: &'env [ZoneSum],
    sums: &'env Mutex<Vec<u64>>,
    abort: &'env AbortFlag,
}

impl<'t> Thief<'t, '_> {
    /// Own deque first, then one pass over the peers.
    fn next_task(&self, report: &mut ThiefReport) -> Option<&'t Tract> {
        if let Some(tract) = self.deque.pop() {
            report.popped += 1;
            return Some(tract);
        }

        for (peer, stealer) in self.peers.iter().enumerate() {
            if peer == self.id {
                continue;
            }
            if let Some(tract) = stealer.steal() {
                report.stolen += 1;
                return Some(tract);
            }
        }
        None
    }

    fn run(self, oracle: &dyn GeometryOracle) -> SchedulerResult<ThiefReport> {
        let mut report = ThiefReport::default();

        while let Some(tract) = self.next_task(&mut report) {
            if self.abort.is_raised() {
                break;
            }
            match first_match(oracle, self.zones, tract) {
                Ok(Some(index)) => {
                    self.sums.lock()[index] += tract.population;
                    report.matched += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    self.abort.raise();
                    return Err(err);
                }
            }
        }

        debug!(
            worker = self.id,
            popped = report.popped,
            stolen = report.stolen,
            matched = report.matched,
            "stealing worker finished"
        );
        Ok(report)
    }
}

impl Scheduler for WorkStealing {
    fn mode(&self) -> Mode {
        Mode::WorkStealing
    }

    fn run(
        &self,
        oracle: &dyn GeometryOracle,
        tracts: &[Tract],
        zones: &mut [ZoneSum],
    ) -> SchedulerResult<RunStats> {
        let deques = self.distribute(tracts)?;
        let (sums, reports) = run_thieves(deques, oracle, zones)?;

        for (zone, sum) in zones.iter_mut().zip(sums) {
            zone.accumulated_sum += sum;
        }

        let stolen: usize = reports.iter().map(|r| r.stolen).sum();
        debug!(stolen, workers = reports.len(), "work-stealing run joined");

        Ok(RunStats {
            tracts: reports.iter().map(ThiefReport::processed).sum(),
            matched: reports.iter().map(|r| r.matched).sum(),
        })
    }
}

/// Spawn one thief per deque and wait for all of them.
///
/// Returns the per-zone sums and each worker's report, in deque order.
fn run_thieves(
    deques: Vec<Worker<&Tract>>,
    oracle: &dyn GeometryOracle,
    zones: &[ZoneSum],
) -> SchedulerResult<(Vec<u64>, Vec<ThiefReport>)> {
    let peers: Vec<Stealer<&Tract>> = deques.iter().map(Worker::stealer).collect();
    let sums = Mutex::new(vec![0u64; zones.len()]);
    let abort = AbortFlag::default();

    let reports = thread::scope(|s| {
        let handles: Vec<_> = deques
            .into_iter()
            .enumerate()
            .map(|(id, deque)| {
                let thief = Thief {
                    id,
                    deque,
                    peers: &peers,
                    zones,
                    sums: &sums,
                    abort: &abort,
                };
                s.spawn(move || thief.run(oracle))
            })
            .collect();

        join_workers(handles)
    })?;

    Ok((sums.into_inner(), reports))
}
