//! Load-balancing refinement (spec section 4.2, grounded in
//! `equilibrage_charges`). Produces a new [`Assignment`] each round;
//! an unchanged round is returned as-is (the immutable-update pattern
//! of spec section 9, replacing the source's deep-copy-then-mutate
//! habit).

use std::collections::HashMap;

use crate::config::constant::{BALANCE_MAX_ROUNDS, BALANCE_STDDEV_FRACTION, OVERLOADED_FACTOR, UNDERLOADED_FACTOR};

use super::greedy::Assignment;
use super::types::{Vehicle, Zone};

fn load_of(assignment: &Assignment, vehicle_id: u64, zones_by_id: &HashMap<u64, &Zone>) -> f64 {
    assignment
        .by_vehicle
        .get(&vehicle_id)
        .map(|zones| zones.iter().map(|zid| zones_by_id[zid].volume).sum())
        .unwrap_or(0.0)
}

fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    (mean, variance.sqrt())
}

fn can_move(
    vehicle: &Vehicle,
    zone: &Zone,
    target_zones: &[u64],
    target_load: f64,
    incompatible_pairs: &[(u64, u64)],
) -> bool {
    if !vehicle.can_access(zone.id) {
        return false;
    }
    if target_load + zone.volume > vehicle.capacity {
        return false;
    }
    incompatible_pairs.iter().all(|&(a, b)| {
        let other = if a == zone.id {
            b
        } else if b == zone.id {
            a
        } else {
            return true;
        };
        !target_zones.contains(&other)
    })
}

/// Iteratively move one zone per round from an overloaded vehicle to
/// an underloaded one, stopping once the load stddev is within
/// `BALANCE_STDDEV_FRACTION` of the mean or after `BALANCE_MAX_ROUNDS`
/// rounds without a move.
pub fn rebalance(
    mut assignment: Assignment,
    vehicles: &[Vehicle],
    zones: &[Zone],
    incompatible_pairs: &[(u64, u64)],
) -> Assignment {
    let vehicles_by_id: HashMap<u64, &Vehicle> = vehicles.iter().map(|v| (v.id, v)).collect();
    let zones_by_id: HashMap<u64, &Zone> = zones.iter().map(|z| (z.id, z)).collect();

    for _ in 0..BALANCE_MAX_ROUNDS {
        let active_loads: Vec<f64> = assignment
            .by_vehicle
            .iter()
            .filter(|(_, zids)| !zids.is_empty())
            .map(|(vid, _)| load_of(&assignment, *vid, &zones_by_id))
            .collect();

        if active_loads.is_empty() {
            break;
        }
        let (mean, stddev) = mean_and_stddev(&active_loads);
        if mean > 0.0 && stddev < BALANCE_STDDEV_FRACTION * mean {
            break;
        }

        let overloaded: Vec<u64> = assignment
            .by_vehicle
            .keys()
            .copied()
            .filter(|vid| load_of(&assignment, *vid, &zones_by_id) > mean * OVERLOADED_FACTOR)
            .collect();
        let underloaded: Vec<u64> = assignment
            .by_vehicle
            .keys()
            .copied()
            .filter(|vid| load_of(&assignment, *vid, &zones_by_id) < mean * UNDERLOADED_FACTOR)
            .collect();

        let mut moved = false;
        'outer: for &heavy in &overloaded {
            let heavy_zones = assignment.by_vehicle.get(&heavy).cloned().unwrap_or_default();
            for &zid in &heavy_zones {
                for &light in &underloaded {
                    if light == heavy {
                        continue;
                    }
                    let light_vehicle = vehicles_by_id[&light];
                    let light_zones = &assignment.by_vehicle[&light];
                    let light_load = load_of(&assignment, light, &zones_by_id);
                    let zone = zones_by_id[&zid];
                    if can_move(light_vehicle, zone, light_zones, light_load, incompatible_pairs) {
                        assignment.by_vehicle.get_mut(&heavy).unwrap().retain(|z| *z != zid);
                        assignment.by_vehicle.get_mut(&light).unwrap().push(zid);
                        moved = true;
                        break 'outer;
                    }
                }
            }
        }

        if !moved {
            break;
        }
    }

    assignment
}
