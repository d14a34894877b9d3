//! Situation score of one side, as shown next to each roster.
//!
//! Every record earns a base amount plus altitude, speed and status
//! bonuses; the side then earns a head-count bonus once it fields three
//! or more aircraft. An empty side scores zero.

use crate::model::AircraftRecord;

pub const BASE_POINTS: u64 = 10;

/// `(exclusive lower bound, points)`, highest tier first.
pub const ALTITUDE_TIERS: [(f64, u64); 3] = [(10_000.0, 20), (5_000.0, 15), (2_000.0, 10)];
pub const ALTITUDE_FLOOR_POINTS: u64 = 5;
pub const SPEED_TIERS: [(f64, u64); 3] = [(800.0, 15), (600.0, 12), (400.0, 8)];
pub const SPEED_FLOOR_POINTS: u64 = 5;

/// `(minimum head count, points per aircraft)`, largest force first.
pub const HEAD_COUNT_TIERS: [(usize, u64); 3] = [(10, 5), (5, 3), (3, 2)];

fn tier(value: f64, tiers: &[(f64, u64)], floor: u64) -> u64 {
    tiers
        .iter()
        .find(|(bound, _)| value > *bound)
        .map_or(floor, |(_, points)| *points)
}

/// Status bonus; the authoring tool's native status names score the same.
pub fn status_points(status: &str) -> u64 {
    match status {
        "combat" | "战斗" => 15,
        "cruise" | "巡航" => 10,
        "standby" | "待命" => 5,
        _ => 0,
    }
}

pub fn record_score(record: &AircraftRecord) -> u64 {
    BASE_POINTS
        + tier(record.altitude, &ALTITUDE_TIERS, ALTITUDE_FLOOR_POINTS)
        + tier(record.speed, &SPEED_TIERS, SPEED_FLOOR_POINTS)
        + status_points(&record.status)
}

pub fn head_count_bonus(count: usize) -> u64 {
    HEAD_COUNT_TIERS
        .iter()
        .find(|(minimum, _)| count >= *minimum)
        .map_or(0, |(_, per_aircraft)| count as u64 * per_aircraft)
}

pub fn side_score(records: &[AircraftRecord]) -> u64 {
    if records.is_empty() {
        return 0;
    }
    records.iter().map(record_score).sum::<u64>() + head_count_bonus(records.len())
}
