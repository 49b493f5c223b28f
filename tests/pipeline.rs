//! End-to-end pipeline test: L1 graph distances feed L2 assignment,
//! whose result feeds both L3 temporal placement and L4 route
//! optimisation, over one small synthetic town. Exercises the
//! cross-cutting invariants from spec section 8 rather than any single
//! layer's internals (those have their own per-module test suites).

use wastecollect_core::assignment::types::{Vehicle as AssignVehicle, Zone};
use wastecollect_core::graph;
use wastecollect_core::optimiser;
use wastecollect_core::temporal;
use wastecollect_core::wire;
use wastecollect_core::wire::assignment::{VehicleIn, ZoneIn};
use wastecollect_core::wire::graph::{ConnectionIn, PointIn as GraphPointIn};
use wastecollect_core::wire::optimiser::{
    DepotIn, DisposalIn as OptDisposalIn, PointIn as OptPointIn, VehicleIn as OptVehicleIn,
};
use wastecollect_core::wire::temporal::{ConstraintsIn, SlotIn, WindowIn};
use wastecollect_core::wire::Point;

/// A small town: depot plus eight collection points laid out on a
/// circle, one disposal facility at the centre, two vehicles, a
/// handful of time slots spanning one weekday.
struct Town {
    point_ids: Vec<u64>,
    coords: Vec<(u64, f64, f64)>,
}

fn town() -> Town {
    let mut coords = vec![(0u64, 0.0, 0.0)];
    let mut point_ids = Vec::new();
    for i in 1..=8u64 {
        let angle = (i as f64) * std::f64::consts::PI / 4.0;
        let x = 10.0 * angle.cos();
        let y = 10.0 * angle.sin();
        coords.push((i, x, y));
        point_ids.push(i);
    }
    Town { point_ids, coords }
}

#[test]
fn l1_distance_matrix_is_symmetric_and_satisfies_triangle_inequality() {
    let town = town();
    let points: Vec<GraphPointIn> = town
        .coords
        .iter()
        .map(|&(id, x, y)| GraphPointIn { id, x, y, name: None })
        .collect();
    let mut connections = Vec::new();
    for i in 0..town.coords.len() {
        for j in (i + 1)..town.coords.len() {
            connections.push(ConnectionIn {
                from: town.coords[i].0,
                to: town.coords[j].0,
                distance: None,
            });
        }
    }

    let resp = graph::run(wire::graph::Request {
        points,
        connections,
        disposals: vec![],
    })
    .expect("valid graph request");

    let n = resp.ordered_ids.len();
    for i in 0..n {
        assert_eq!(resp.matrix[i][i], Some(0.0));
        for j in 0..n {
            assert_eq!(resp.matrix[i][j], resp.matrix[j][i], "matrix not symmetric at ({i},{j})");
        }
    }
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                if let (Some(dij), Some(dik), Some(dkj)) = (resp.matrix[i][j], resp.matrix[i][k], resp.matrix[k][j]) {
                    assert!(dij <= dik + dkj + 1e-9, "triangle inequality violated at ({i},{j},{k})");
                }
            }
        }
    }
}

#[test]
fn l2_assignment_is_feasible_and_l3_slots_never_overlap() {
    let vehicles = vec![
        VehicleIn { id: 1, capacity: 120.0, fixed_cost: 0.0, allowed_zones: None, initial_position: None },
        VehicleIn { id: 2, capacity: 120.0, fixed_cost: 0.0, allowed_zones: None, initial_position: None },
    ];
    let zones = vec![
        ZoneIn { id: 1, points: vec![1, 2], volume: 50.0, centre: Point { x: 7.0, y: 7.0 }, priority: wire::Priority::High, frequency: None },
        ZoneIn { id: 2, points: vec![3, 4], volume: 40.0, centre: Point { x: -7.0, y: 7.0 }, priority: wire::Priority::Normal, frequency: None },
        ZoneIn { id: 3, points: vec![5, 6], volume: 45.0, centre: Point { x: -7.0, y: -7.0 }, priority: wire::Priority::Normal, frequency: None },
        ZoneIn { id: 4, points: vec![7, 8], volume: 30.0, centre: Point { x: 7.0, y: -7.0 }, priority: wire::Priority::Low, frequency: None },
    ];

    let assign_resp = wastecollect_core::assignment::run(wire::assignment::Request {
        vehicles: vehicles.clone(),
        zones: zones.clone(),
        incompatible_zones: vec![],
        points: vec![],
        connections: vec![],
        disposals: vec![],
    })
    .expect("valid assignment request");

    let vehicles_by_id: std::collections::HashMap<u64, AssignVehicle> = vehicles
        .iter()
        .map(|v| (v.id, AssignVehicle { id: v.id, capacity: v.capacity, fixed_cost: v.fixed_cost, allowed_zones: v.allowed_zones.clone() }))
        .collect();
    let zones_by_id: std::collections::HashMap<u64, Zone> = zones
        .iter()
        .map(|z| (z.id, Zone { id: z.id, points: z.points.clone(), volume: z.volume, centre: z.centre, priority: z.priority, frequency: z.frequency }))
        .collect();

    for a in &assign_resp.assignment {
        let vehicle = &vehicles_by_id[&a.vehicle_id];
        assert!(a.total_load <= vehicle.capacity + 1e-9, "assignment exceeds capacity");
        for zid in &a.zones {
            assert!(vehicle.can_access(*zid), "zone assigned to inaccessible vehicle");
        }
    }
    let mut seen = std::collections::HashSet::new();
    for a in &assign_resp.assignment {
        for zid in &a.zones {
            assert!(seen.insert(*zid), "zone {zid} assigned to more than one vehicle");
        }
    }
    assert!(zones_by_id.len() >= seen.len());

    let temporal_resp = temporal::run(wire::temporal::Request {
        slots: vec![
            SlotIn { id: 1, day: "lundi".into(), start: "08:00".into(), end: "10:00".into(), congestion: Some(1.0) },
            SlotIn { id: 2, day: "lundi".into(), start: "10:00".into(), end: "12:00".into(), congestion: Some(1.2) },
            SlotIn { id: 3, day: "lundi".into(), start: "13:00".into(), end: "15:00".into(), congestion: Some(1.0) },
            SlotIn { id: 4, day: "lundi".into(), start: "15:00".into(), end: "17:00".into(), congestion: Some(1.1) },
        ],
        constraints: ConstraintsIn {
            windows: vec![
                WindowIn { zone_id: 1, open: "07:00".into(), close: "18:00".into() },
                WindowIn { zone_id: 2, open: "07:00".into(), close: "18:00".into() },
                WindowIn { zone_id: 3, open: "07:00".into(), close: "18:00".into() },
                WindowIn { zone_id: 4, open: "07:00".into(), close: "18:00".into() },
            ],
            breaks: vec![],
            night_forbidden: vec![],
            durations: std::collections::HashMap::new(),
        },
        vehicles,
        zones,
        points: vec![],
        connections: vec![],
        disposals: vec![],
        incompatible_zones: vec![],
        horizon_days: Some(1),
    })
    .expect("valid temporal request");

    for entries in temporal_resp.plan.values() {
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                if entries[i].vehicle_id == entries[j].vehicle_id {
                    let a = &entries[i].slot;
                    let b = &entries[j].slot;
                    assert!(a.start >= b.end || b.start >= a.end, "overlapping slots for the same vehicle");
                }
            }
        }
    }
}

#[test]
fn l4_tour_respects_capacity_coverage_crossings_and_mst_bound() {
    let town = town();
    let points: Vec<OptPointIn> = town
        .point_ids
        .iter()
        .map(|&id| {
            let (_, x, y) = town.coords[id as usize];
            OptPointIn { id, x, y, name: None, volume: 15.0 }
        })
        .collect();

    let req = wire::optimiser::Request {
        depot: DepotIn { id: Some(0), x: 0.0, y: 0.0, name: None },
        points,
        disposals: vec![OptDisposalIn { id: 100, x: 0.0, y: 0.0, name: None }],
        vehicles: vec![OptVehicleIn { id: 1, capacity: 1000.0, fixed_cost: 0.0, allowed_zones: None }],
        distance_matrix: None,
        seed: Some(42),
    };

    let resp = optimiser::run(req).expect("valid optimiser request");
    assert_eq!(resp.routes.len(), 1);
    let route = &resp.routes[0];

    let mut load = 0.0;
    for wp in &route.waypoints {
        match wp.kind {
            wire::optimiser::WaypointKind::Collection => load += wp.volume.unwrap_or(0.0),
            wire::optimiser::WaypointKind::Disposal => load = 0.0,
            wire::optimiser::WaypointKind::Depot => {}
        }
        assert!(load <= 1000.0 + 1e-9, "capacity breached mid-tour");
    }

    let mut visited: Vec<u64> = route
        .waypoints
        .iter()
        .filter(|w| w.kind == wire::optimiser::WaypointKind::Collection)
        .map(|w| w.id)
        .collect();
    visited.sort_unstable();
    visited.dedup();
    assert_eq!(visited.len(), 8, "every collection point must be visited exactly once");

    assert!(route.crossings.after <= route.crossings.before, "crossing elimination must not increase crossings");
    assert!(resp.global_stats.total_distance >= resp.global_stats.lower_bound_km - 1e-6, "tour length below MST lower bound");
}

#[test]
fn l4_determinism_under_fixed_seed() {
    let req = || wire::optimiser::Request {
        depot: DepotIn { id: Some(0), x: 0.0, y: 0.0, name: None },
        points: (1..=10)
            .map(|i| OptPointIn { id: i, x: (i as f64 * 2.1).sin() * 12.0, y: (i as f64 * 1.3).cos() * 12.0, name: None, volume: 12.0 })
            .collect(),
        disposals: vec![OptDisposalIn { id: 200, x: 2.0, y: 2.0, name: None }],
        vehicles: vec![OptVehicleIn { id: 1, capacity: 50.0, fixed_cost: 0.0, allowed_zones: None }],
        distance_matrix: None,
        seed: Some(7),
    };

    let a = optimiser::run(req()).expect("valid request");
    let b = optimiser::run(req()).expect("valid request");
    assert_eq!(a.routes[0].waypoints, b.routes[0].waypoints);
    assert_eq!(a.routes[0].total_distance, b.routes[0].total_distance);
}
