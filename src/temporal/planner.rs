//! Per-day weekly planning (spec section 4.3, grounded in
//! `planificateur_triparti.py`).

use std::collections::HashMap;

use chrono::Duration;

use crate::assignment::types::{zone_order, Zone};
use crate::config::constant::{DEFAULT_DURATION_FIXED_MIN, DEFAULT_DURATION_PER_POINT_MIN};

use super::feasibility::{is_feasible, penalty, Constraints};
use super::types::Slot;

pub const WEEKDAYS: [&str; 7] = [
    "lundi",
    "mardi",
    "mercredi",
    "jeudi",
    "vendredi",
    "samedi",
    "dimanche",
];

pub struct Placement {
    pub vehicle_id: u64,
    pub zone_id: u64,
    pub slot: Slot,
    pub duration_minutes: i64,
}

pub fn zone_duration(zone: &Zone, durations: &HashMap<u64, i64>) -> i64 {
    if let Some(&d) = durations.get(&zone.id) {
        return d;
    }
    zone.points.len() as i64 * DEFAULT_DURATION_PER_POINT_MIN + DEFAULT_DURATION_FIXED_MIN
}

fn best_slot<'a>(
    slots: &'a [Slot],
    occupied: &[Slot],
    constraints: &Constraints,
    vehicle_id: u64,
    zone_id: u64,
    duration_minutes: i64,
) -> Option<&'a Slot> {
    let mut candidates: Vec<&Slot> = slots
        .iter()
        .filter(|s| !occupied.iter().any(|o| s.overlaps(o)))
        .filter(|s| is_feasible(constraints, vehicle_id, zone_id, s, duration_minutes))
        .collect();

    candidates.sort_by(|a, b| {
        penalty(a)
            .partial_cmp(&penalty(b))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    candidates.into_iter().next()
}

/// Places each (vehicle, zone) pair into exactly one non-overlapping
/// slot, iterating vehicles in the order they appear in
/// `assignment_by_vehicle` and each vehicle's zones by
/// `zone_order` (same comparator as L2).
pub fn plan(
    assignment_by_vehicle: &[(u64, Vec<u64>)],
    zones_by_id: &HashMap<u64, Zone>,
    slots: &[Slot],
    constraints: &Constraints,
    durations: &HashMap<u64, i64>,
) -> (Vec<Placement>, Vec<String>) {
    let mut placements = Vec::new();
    let mut warnings = Vec::new();
    let mut occupied_by_vehicle: HashMap<u64, Vec<Slot>> = HashMap::new();

    for (vehicle_id, zone_ids) in assignment_by_vehicle {
        let mut zones: Vec<&Zone> = zone_ids
            .iter()
            .filter_map(|zid| zones_by_id.get(zid))
            .collect();
        zones.sort_by(|a, b| zone_order(a, b));

        let occupied = occupied_by_vehicle.entry(*vehicle_id).or_default();

        for zone in zones {
            let duration_minutes = zone_duration(zone, durations);
            match best_slot(slots, occupied, constraints, *vehicle_id, zone.id, duration_minutes) {
                Some(slot) => {
                    occupied.push(slot.clone());
                    placements.push(Placement {
                        vehicle_id: *vehicle_id,
                        zone_id: zone.id,
                        slot: slot.clone(),
                        duration_minutes,
                    });
                }
                None => warnings.push(format!(
                    "zone {} could not be scheduled for vehicle {}",
                    zone.id, vehicle_id
                )),
            }
        }
    }

    (placements, warnings)
}

/// 5-minute cadence task times starting at the slot's start (spec
/// section 4.3 output shape).
pub fn tasks_for_zone(zone: &Zone, slot_start: chrono::NaiveTime) -> Vec<(u64, usize, chrono::NaiveTime)> {
    let mut tasks = Vec::new();
    let mut current = slot_start;
    for (order, &point_id) in zone.points.iter().enumerate() {
        current += Duration::minutes(5);
        tasks.push((point_id, order + 1, current));
    }
    tasks
}
