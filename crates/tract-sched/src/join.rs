//! Join predicate and worker plumbing shared by all schedulers.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread::ScopedJoinHandle,
};

use tract_geom::GeometryOracle;

use crate::{SchedulerError, SchedulerResult, Tract, ZoneSum};

/// Index of the first zone, in input order, whose polygon contains the
/// tract's centroid.
///
/// Earlier zones win when polygons overlap. `None` means the tract lies
/// outside every zone.
pub fn first_match<G: GeometryOracle + ?Sized>(
    oracle: &G,
    zones: &[ZoneSum],
    tract: &Tract,
) -> SchedulerResult<Option<usize>> {
    for (index, zone) in zones.iter().enumerate() {
        let inside = oracle
            .contains(&zone.polygon, tract.centroid)
            .map_err(|source| SchedulerError::Oracle {
                zone: zone.id.clone(),
                source,
            })?;
        if inside {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Raised by the first worker that fails; the others stop at their next task.
#[derive(Debug, Default)]
pub(crate) struct AbortFlag(AtomicBool);

impl AbortFlag {
    pub(crate) fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Barrier: wait for every worker, then surface the first failure.
pub(crate) fn join_workers<T>(
    handles: Vec<ScopedJoinHandle<'_, SchedulerResult<T>>>,
) -> SchedulerResult<Vec<T>> {
    let mut results = Vec::with_capacity(handles.len());
    let mut failure = None;

    for (worker, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(result)) => results.push(result),
            Ok(Err(err)) => {
                failure.get_or_insert(err);
            }
            Err(_) => {
                failure.get_or_insert(SchedulerError::WorkerPanicked { worker });
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(results),
    }
}
