//! End-to-end scenarios run under every mode and thread count.

mod common;

use common::{all_configs, unit_square};
use tract_geom::{PlanarOracle, Point, Polygon};
use tract_sched::{Tract, ZoneSum, ZoneTotal, schedule};

fn total(id: &str, sum: u64) -> ZoneTotal {
    ZoneTotal {
        id: id.to_string(),
        sum,
    }
}

#[test]
fn test_two_disjoint_squares() {
    let zones = vec![
        ZoneSum::new("Z1", unit_square(0.0, 0.0)),
        ZoneSum::new("Z2", unit_square(5.0, 0.0)),
    ];
    let tracts = [
        Tract::new(Point::new(0.2, 0.3), 10),
        Tract::new(Point::new(0.8, 0.6), 20),
        Tract::new(Point::new(5.5, 0.5), 30),
    ];

    for config in all_configs() {
        let totals = schedule(&config, &PlanarOracle, &tracts, zones.clone()).unwrap();
        assert_eq!(
            totals,
            vec![total("Z1", 30), total("Z2", 30)],
            "{} x{}",
            config.mode,
            config.threads
        );
    }
}

#[test]
fn test_tract_outside_every_zone_is_dropped() {
    let zones = vec![
        ZoneSum::new("Z1", unit_square(0.0, 0.0)),
        ZoneSum::new("Z2", unit_square(5.0, 0.0)),
    ];
    let tracts = [
        Tract::new(Point::new(0.5, 0.5), 10),
        Tract::new(Point::new(3.0, 3.0), 1_000),
        Tract::new(Point::new(5.5, 0.5), 30),
    ];

    for config in all_configs() {
        let totals = schedule(&config, &PlanarOracle, &tracts, zones.clone()).unwrap();
        assert_eq!(totals, vec![total("Z1", 10), total("Z2", 30)], "{}", config.mode);
    }
}

#[test]
fn test_merged_multi_part_zone_matches_either_part() {
    let merged = Polygon::merge([unit_square(0.0, 0.0), unit_square(10.0, 10.0)]);
    let zones = vec![
        ZoneSum::new("split", merged),
        ZoneSum::new("other", unit_square(4.0, 4.0)),
    ];
    let tracts = [
        Tract::new(Point::new(0.5, 0.5), 1),
        Tract::new(Point::new(10.5, 10.5), 2),
        Tract::new(Point::new(4.5, 4.5), 4),
        Tract::new(Point::new(7.0, 7.0), 8),
    ];

    for config in all_configs() {
        let totals = schedule(&config, &PlanarOracle, &tracts, zones.clone()).unwrap();
        assert_eq!(totals, vec![total("split", 3), total("other", 4)], "{}", config.mode);
    }
}

#[test]
fn test_overlapping_zones_first_listed_wins() {
    let zones = vec![
        ZoneSum::new("first", Polygon::rect(Point::new(0.0, 0.0), Point::new(2.0, 2.0))),
        ZoneSum::new("second", Polygon::rect(Point::new(1.0, 1.0), Point::new(3.0, 3.0))),
    ];
    let tracts = [
        Tract::new(Point::new(1.5, 1.5), 5),
        Tract::new(Point::new(2.5, 2.5), 7),
    ];

    for config in all_configs() {
        let totals = schedule(&config, &PlanarOracle, &tracts, zones.clone()).unwrap();
        assert_eq!(totals, vec![total("first", 5), total("second", 7)], "{}", config.mode);
    }
}

#[test]
fn test_zones_without_tracts_report_zero() {
    let zones = vec![
        ZoneSum::new("empty", unit_square(9.0, 9.0)),
        ZoneSum::new("full", unit_square(0.0, 0.0)),
    ];
    let tracts = [Tract::new(Point::new(0.5, 0.5), 42)];

    for config in all_configs() {
        let totals = schedule(&config, &PlanarOracle, &tracts, zones.clone()).unwrap();
        assert_eq!(totals, vec![total("empty", 0), total("full", 42)], "{}", config.mode);
    }
}
