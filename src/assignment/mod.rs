//! L2: bipartite greedy assignment with load balancing (spec section 4.2).

pub mod balance;
pub mod cost;
pub mod greedy;
pub mod types;

use std::collections::HashMap;

use tracing::instrument;

use crate::error::{CoreError, CoreResult};
use crate::wire::assignment::{
    Bipartite, BipartiteEdge, Request, Response, Statistics, VehicleAssignment,
};

use cost::assignment_cost;
use types::{Vehicle, Zone};

fn to_vehicle(v: &crate::wire::assignment::VehicleIn) -> Vehicle {
    Vehicle {
        id: v.id,
        capacity: v.capacity,
        fixed_cost: v.fixed_cost,
        allowed_zones: v.allowed_zones.clone(),
    }
}

fn to_zone(z: &crate::wire::assignment::ZoneIn) -> Zone {
    Zone {
        id: z.id,
        points: z.points.clone(),
        volume: z.volume,
        centre: z.centre,
        priority: z.priority,
        frequency: z.frequency,
    }
}

fn validate(req: &Request) -> CoreResult<()> {
    for v in &req.vehicles {
        if v.capacity <= 0.0 {
            return Err(CoreError::input("vehicles[].capacity", "must be > 0"));
        }
    }
    for z in &req.zones {
        if z.volume < 0.0 {
            return Err(CoreError::input("zones[].volume", "must be >= 0"));
        }
    }
    Ok(())
}

#[instrument(skip(req), fields(vehicles = req.vehicles.len(), zones = req.zones.len()))]
pub fn run(req: Request) -> CoreResult<Response> {
    validate(&req)?;

    let vehicles: Vec<Vehicle> = req.vehicles.iter().map(to_vehicle).collect();
    let zones: Vec<Zone> = req.zones.iter().map(to_zone).collect();

    let initial = greedy::assign(&vehicles, &zones, &req.disposals, &req.incompatible_zones);
    tracing::debug!(unassigned = initial.unassigned.len(), "greedy pass complete");

    let balanced = balance::rebalance(initial, &vehicles, &zones, &req.incompatible_zones);

    let zones_by_id: HashMap<u64, &Zone> = zones.iter().map(|z| (z.id, z)).collect();
    let vehicles_by_id: HashMap<u64, &Vehicle> = vehicles.iter().map(|v| (v.id, v)).collect();

    let mut assignment = Vec::new();
    let mut loads = Vec::new();
    let mut utilisations = Vec::new();
    let mut total_cost = 0.0;

    for vehicle in &vehicles {
        let zone_ids = balanced.by_vehicle.get(&vehicle.id).cloned().unwrap_or_default();
        if zone_ids.is_empty() {
            continue;
        }
        let total_load: f64 = zone_ids.iter().map(|zid| zones_by_id[zid].volume).sum();
        let estimated_cost: f64 = zone_ids
            .iter()
            .map(|zid| assignment_cost(vehicle, zones_by_id[zid], &req.disposals))
            .sum();
        let utilisation_pct = if vehicle.capacity > 0.0 {
            (total_load / vehicle.capacity) * 100.0
        } else {
            0.0
        };

        loads.push(total_load);
        utilisations.push(utilisation_pct);
        total_cost += estimated_cost;

        assignment.push(VehicleAssignment {
            vehicle_id: vehicle.id,
            zones: zone_ids,
            total_load,
            estimated_cost,
            utilisation_pct,
        });
    }

    let mean_load = if loads.is_empty() {
        0.0
    } else {
        loads.iter().sum::<f64>() / loads.len() as f64
    };
    let std_load = if loads.len() > 1 {
        let variance =
            loads.iter().map(|l| (l - mean_load).powi(2)).sum::<f64>() / (loads.len() - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };
    let mean_utilisation_pct = if utilisations.is_empty() {
        0.0
    } else {
        utilisations.iter().sum::<f64>() / utilisations.len() as f64
    };

    for unassigned_id in &balanced.unassigned {
        tracing::warn!(zone = unassigned_id, "zone has no feasible vehicle");
    }

    let statistics = Statistics {
        vehicles_used: assignment.len(),
        mean_load,
        std_load,
        unassigned: balanced.unassigned.clone(),
        total_cost,
        mean_utilisation_pct,
    };

    let mut edges = Vec::new();
    for vehicle in &vehicles {
        for zone in &zones {
            if !vehicle.can_access(zone.id) {
                continue;
            }
            let cost = assignment_cost(vehicle, zone, &req.disposals);
            if cost.is_finite() {
                edges.push(BipartiteEdge {
                    vehicle: vehicle.id,
                    zone: zone.id,
                    cost,
                });
            }
        }
    }

    let bipartite = Bipartite {
        vehicle_nodes: vehicles_by_id.keys().copied().collect(),
        zone_nodes: zones_by_id.keys().copied().collect(),
        edges,
    };

    Ok(Response {
        assignment,
        statistics,
        bipartite,
    })
}
