//! Greedy zone-to-vehicle assignment (spec section 4.2, grounded in
//! `affectation_gloutonne`).

use std::collections::HashMap;

use crate::wire::graph::DisposalIn;

use super::cost::assignment_cost;
use super::types::{zone_order, Vehicle, Zone};

#[derive(Debug, Clone, Default)]
pub struct Assignment {
    /// vehicle id -> ordered list of zone ids.
    pub by_vehicle: HashMap<u64, Vec<u64>>,
    pub unassigned: Vec<u64>,
}

fn zone_incompatible_with_vehicle(
    zone_id: u64,
    vehicle_zones: &[u64],
    incompatible_pairs: &[(u64, u64)],
) -> bool {
    vehicle_zones.iter().any(|&existing| {
        incompatible_pairs
            .iter()
            .any(|&(a, b)| (a == zone_id && b == existing) || (a == existing && b == zone_id))
    })
}

/// Sort zones by (priority asc, volume desc, id asc); for each in
/// order, pick the minimum-cost feasible vehicle (ties by vehicle id).
/// Zones with no feasible vehicle are left unassigned.
pub fn assign(
    vehicles: &[Vehicle],
    zones: &[Zone],
    disposals: &[DisposalIn],
    incompatible_pairs: &[(u64, u64)],
) -> Assignment {
    let mut loads: HashMap<u64, f64> = vehicles.iter().map(|v| (v.id, 0.0)).collect();
    let mut result = Assignment {
        by_vehicle: vehicles.iter().map(|v| (v.id, Vec::new())).collect(),
        unassigned: Vec::new(),
    };

    let mut ordered: Vec<&Zone> = zones.iter().collect();
    ordered.sort_by(|a, b| zone_order(a, b));

    for zone in ordered {
        let mut best: Option<(f64, u64)> = None;

        for vehicle in vehicles {
            if !vehicle.can_access(zone.id) {
                continue;
            }
            let remaining = vehicle.capacity - loads[&vehicle.id];
            if zone.volume > remaining {
                continue;
            }
            let existing = &result.by_vehicle[&vehicle.id];
            if zone_incompatible_with_vehicle(zone.id, existing, incompatible_pairs) {
                continue;
            }
            let cost = assignment_cost(vehicle, zone, disposals);
            if !cost.is_finite() {
                continue;
            }
            match best {
                None => best = Some((cost, vehicle.id)),
                Some((best_cost, best_id)) => {
                    if cost < best_cost || (cost == best_cost && vehicle.id < best_id) {
                        best = Some((cost, vehicle.id));
                    }
                }
            }
        }

        match best {
            Some((_, vehicle_id)) => {
                *loads.get_mut(&vehicle_id).unwrap() += zone.volume;
                result.by_vehicle.get_mut(&vehicle_id).unwrap().push(zone.id);
            }
            None => result.unassigned.push(zone.id),
        }
    }

    result
}
