//! Shared fixtures for scheduler integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use tract_geom::{
    GeometryError, GeometryOracle, GeometryResult, PlanarOracle, Point, Polygon, ZoneGrid,
};
use tract_sched::{Mode, SchedulerConfig, Tract, ZoneSum};

/// Thread counts every parallel mode is exercised with.
pub const THREADS: [usize; 6] = [1, 2, 3, 4, 7, 16];

/// Every (mode, threads) combination worth running.
pub fn all_configs() -> Vec<SchedulerConfig> {
    let mut configs = vec![SchedulerConfig::sequential()];
    for mode in [Mode::StaticPartition, Mode::WorkStealing] {
        for threads in THREADS {
            configs.push(SchedulerConfig::parallel(mode, threads).unwrap());
        }
    }
    configs
}

/// Small deterministic xorshift generator.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

pub fn unit_square(x: f64, y: f64) -> Polygon {
    Polygon::rect(Point::new(x, y), Point::new(x + 1.0, y + 1.0))
}

/// One zone per grid cell, ids `c0`, `c1`, ...
pub fn grid_zones(grid: &ZoneGrid) -> Vec<ZoneSum> {
    grid.cells()
        .map(|cell| ZoneSum::new(format!("c{}", cell.index), grid.polygon(cell)))
        .collect()
}

/// Tracts jittered around cell centers, plus every `outside_every`-th tract
/// placed beyond the grid.
pub fn grid_tracts(grid: &ZoneGrid, count: usize, outside_every: usize, seed: u64) -> Vec<Tract> {
    let mut rng = Rng::new(seed);
    let extent = grid.extent();
    let far = extent.x.max(extent.y) * 2.0;

    (0..count)
        .map(|i| {
            let population = rng.next_u64() % 5_000;
            if outside_every > 0 && i % outside_every == 0 {
                return Tract::new(Point::new(far, far + i as f64), population);
            }
            let index = (rng.next_u64() % grid.cell_count() as u64) as usize;
            let center = grid.center(grid.cell(index).unwrap());
            let jitter = grid.cell_size() * 0.8;
            let point = Point::new(
                (rng.next_f64() - 0.5).mul_add(jitter, center.x),
                (rng.next_f64() - 0.5).mul_add(jitter, center.y),
            );
            Tract::new(point, population)
        })
        .collect()
}

/// Oracle that fails on the `fail_at`-th containment query.
pub struct FaultyOracle {
    calls: AtomicUsize,
    fail_at: usize,
}

impl FaultyOracle {
    pub fn new(fail_at: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_at,
        }
    }
}

impl GeometryOracle for FaultyOracle {
    fn contains(&self, polygon: &Polygon, point: Point) -> GeometryResult<bool> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_at {
            return Err(GeometryError::NonFinitePoint {
                x: f64::NAN,
                y: f64::NAN,
            });
        }
        PlanarOracle.contains(polygon, point)
    }

    fn centroid(&self, polygon: &Polygon) -> GeometryResult<Point> {
        PlanarOracle.centroid(polygon)
    }
}
