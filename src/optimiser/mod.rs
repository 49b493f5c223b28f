//! L4: route optimiser — the core of the core (spec section 4.4).
//!
//! Per vehicle: nearest-neighbour construction with opportunistic
//! unload, pure-pickup 2-opt, 3-opt, Or-opt, simulated annealing,
//! disposal reinsertion, and a final crossing-elimination pass that
//! preserves the capacity invariant. Grounded end to end in
//! `niveau2/src/optimiseur_routes.py`'s `OptimiseurRoutes.optimiser_routes`.

pub mod annealing;
pub mod budget;
pub mod construct;
pub mod crossing;
pub mod mst;
pub mod or_opt;
pub mod three_opt;
pub mod two_opt;
pub mod types;

use std::collections::HashMap;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::instrument;

use crate::config::constant::{
    DEGENERATE_POINT_COUNT, OR_OPT_MAX_ITER, SA_LARGE_THRESHOLD, SA_MAX_ITER_LARGE,
    SA_MAX_ITER_SMALL, SA_T_INITIAL,
};
use crate::error::{CoreError, CoreResult};
use crate::graph::types::euclidean;
use crate::wire::optimiser::{
    Crossings, DepotOut, DisposalOut, GlobalStats, Request, Response, RouteWire, StepAction,
    StepDetail, Waypoint, WaypointKind,
};

use budget::Budget;
use types::{Depot, DistanceOracle, Facility, Pickup, Role, Stop, Vehicle};

fn validate(req: &Request) -> CoreResult<()> {
    if req.vehicles.is_empty() {
        return Err(CoreError::input("vehicles", "must have at least one vehicle"));
    }
    for v in &req.vehicles {
        if v.capacity <= 0.0 {
            return Err(CoreError::input("vehicles[].capacity", "must be > 0"));
        }
    }
    for p in &req.points {
        if p.volume < 0.0 {
            return Err(CoreError::input("points[].volume", "must be >= 0"));
        }
    }
    Ok(())
}

/// Pair keys in the optional distance oracle are `"{a}_{b}"` or
/// `"{a},{b}"` (either separator accepted; not pinned down by the
/// wire contract, see the "distance oracle injection" design note).
fn parse_pair_key(key: &str) -> CoreResult<(u64, u64)> {
    let sep = if key.contains(',') { ',' } else { '_' };
    let mut parts = key.splitn(2, sep);
    let a = parts.next().and_then(|s| s.trim().parse::<u64>().ok());
    let b = parts.next().and_then(|s| s.trim().parse::<u64>().ok());
    match (a, b) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(CoreError::input(
            "distanceMatrix",
            format!("malformed pair key '{key}'"),
        )),
    }
}

fn vehicle_can_access(v: &Vehicle, point_id: u64) -> bool {
    match &v.allowed_zones {
        None => true,
        Some(zones) if zones.is_empty() => true,
        Some(zones) => zones.contains(&point_id),
    }
}

/// Point-to-vehicle pre-phase (spec section 4.4): sort points by
/// descending volume then ascending id; for each, pick the allowed
/// vehicle minimising `Euclidean(depot, point) + vehicle.fixedCost`,
/// ignoring residual capacity (capacity is enforced later through
/// disposal insertion). Grounded in `optimiser_routes` vehicle loop.
fn allocate_points(
    depot: &Depot,
    points: &[Pickup],
    vehicles: &[Vehicle],
) -> HashMap<u64, Vec<Pickup>> {
    let mut sorted: Vec<&Pickup> = points.iter().collect();
    sorted.sort_by(|a, b| {
        b.volume
            .partial_cmp(&a.volume)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut by_vehicle: HashMap<u64, Vec<Pickup>> =
        vehicles.iter().map(|v| (v.id, Vec::new())).collect();

    for p in sorted {
        let mut best: Option<(f64, u64)> = None;
        for v in vehicles {
            if !vehicle_can_access(v, p.id) {
                continue;
            }
            let cost = euclidean(depot.x, depot.y, p.x, p.y) + v.fixed_cost;
            match best {
                None => best = Some((cost, v.id)),
                Some((best_cost, best_id)) => {
                    if cost < best_cost || (cost == best_cost && v.id < best_id) {
                        best = Some((cost, v.id));
                    }
                }
            }
        }
        if let Some((_, vid)) = best {
            by_vehicle.get_mut(&vid).unwrap().push(*p);
        }
    }

    by_vehicle
}

/// Compares the facility closest to `current_id` against the facility
/// closest to `next_id` by total detour cost, returning the cheaper
/// (spec section 4.4f, grounded in
/// `_reconstruire_route_avec_dechetteries`'s two-candidate comparison).
fn choose_facility(
    current_id: u64,
    next_id: u64,
    facilities: &[Facility],
    oracle: &DistanceOracle,
) -> Option<Facility> {
    if facilities.is_empty() {
        return None;
    }
    let by_current = construct::nearest_facility(current_id, facilities, oracle)?.0;
    let by_next = construct::nearest_facility(next_id, facilities, oracle)?.0;

    let cost_current = oracle.dist(current_id, by_current.id) + oracle.dist(by_current.id, next_id);
    let cost_next = oracle.dist(current_id, by_next.id) + oracle.dist(by_next.id, next_id);

    Some(if cost_current <= cost_next { by_current } else { by_next })
}

fn disposal_stop(f: Facility) -> Stop {
    Stop {
        id: f.id,
        x: f.x,
        y: f.y,
        role: Role::Disposal,
        volume: 0.0,
    }
}

/// Disposal reinsertion (spec section 4.4f): walks the optimised
/// pickup-only sequence (`[D, pickups…, D]`), maintaining running
/// load, inserting the cheaper of the two facility candidates before
/// any pickup that would overflow capacity, and a final disposal stop
/// if load remains positive once pickups run out.
fn reinsert_disposals(
    pickups_route: &[Stop],
    facilities: &[Facility],
    capacity: f64,
    oracle: &DistanceOracle,
) -> Vec<Stop> {
    if pickups_route.len() < 2 {
        return pickups_route.to_vec();
    }
    let depot_stop = pickups_route[0];
    let inner = &pickups_route[1..pickups_route.len() - 1];

    let mut route = vec![depot_stop];
    let mut current_id = depot_stop.id;
    let mut load = 0.0;

    for &p in inner {
        if load + p.volume > capacity && load > 0.0 {
            if let Some(facility) = choose_facility(current_id, p.id, facilities, oracle) {
                route.push(disposal_stop(facility));
                current_id = facility.id;
                load = 0.0;
            }
        }
        route.push(p);
        current_id = p.id;
        load += p.volume;
    }

    if load > 0.0 {
        if let Some((facility, _)) = construct::nearest_facility(current_id, facilities, oracle) {
            route.push(disposal_stop(facility));
        }
    }

    route.push(depot_stop);
    route
}

fn check_capacity_invariant(
    route: &[Stop],
    vehicle: &Vehicle,
    oracle: &DistanceOracle,
) -> CoreResult<()> {
    if crossing::capacity_holds(route, vehicle.capacity) {
        Ok(())
    } else {
        Err(CoreError::invariant_with_tour(
            format!("vehicle {} tour exceeds capacity after optimisation", vehicle.id),
            route_wire(vehicle, route, 0, 0, oracle),
        ))
    }
}

struct VehicleOutcome {
    route: Vec<Stop>,
    crossings_before: usize,
    crossings_after: usize,
}

/// Runs the full per-vehicle pipeline (spec section 4.4, stages a-g).
/// A degenerate input (`|P| < DEGENERATE_POINT_COUNT`) short-circuits
/// past 2-opt/3-opt/SA, matching spec's edge-case rule.
fn optimise_vehicle(
    depot: &Depot,
    vehicle: &Vehicle,
    points: Vec<Pickup>,
    facilities: &[Facility],
    oracle: &DistanceOracle,
    seed: u64,
    budget: &Budget,
) -> CoreResult<VehicleOutcome> {
    let point_count = points.len();
    let initial = construct::nearest_neighbour(depot, &points, facilities, vehicle.capacity, oracle);
    let crossings_before = crossing::count_crossings(&initial);

    let mut pickups_seq = construct::pickups_only(&initial);

    if point_count >= DEGENERATE_POINT_COUNT {
        pickups_seq = two_opt::run(pickups_seq, oracle);

        if !budget.expired() {
            pickups_seq = three_opt::run(pickups_seq, point_count, oracle);
            pickups_seq = two_opt::run(pickups_seq, oracle);
        }

        if !budget.expired() {
            pickups_seq = or_opt::run(pickups_seq, OR_OPT_MAX_ITER, oracle);
        }

        if !budget.expired() {
            let mut rng = ChaCha8Rng::seed_from_u64(seed ^ vehicle.id);
            let sa_max_iter = if point_count > SA_LARGE_THRESHOLD {
                SA_MAX_ITER_LARGE
            } else {
                SA_MAX_ITER_SMALL
            };
            pickups_seq = annealing::run(pickups_seq, SA_T_INITIAL, sa_max_iter, &mut rng, oracle);
            pickups_seq = two_opt::run(pickups_seq, oracle);
        }
    }

    let with_disposals = reinsert_disposals(&pickups_seq, facilities, vehicle.capacity, oracle);
    let (route, _, crossings_after) = crossing::eliminate(with_disposals, vehicle.capacity);

    Ok(VehicleOutcome {
        route,
        crossings_before,
        crossings_after,
    })
}

fn role_kind(role: Role) -> WaypointKind {
    match role {
        Role::Depot => WaypointKind::Depot,
        Role::Pickup => WaypointKind::Collection,
        Role::Disposal => WaypointKind::Disposal,
    }
}

/// Builds one vehicle's wire-shaped route: waypoints, step-by-step
/// load walk, total distance/collected/disposal-visit counts and the
/// crossing summary (spec section 6, grounded in `RouteOptimisee.to_dict`
/// and `generer_details_etapes`).
fn route_wire(
    vehicle: &Vehicle,
    route: &[Stop],
    crossings_before: usize,
    crossings_after: usize,
    oracle: &DistanceOracle,
) -> RouteWire {
    let mut waypoints = Vec::with_capacity(route.len());
    let mut step_details = Vec::with_capacity(route.len());
    let mut load = 0.0;
    let mut total_distance = 0.0;
    let mut total_collected = 0.0;
    let mut disposal_visits = 0usize;

    for (i, stop) in route.iter().enumerate() {
        if i > 0 {
            total_distance += oracle.dist(route[i - 1].id, stop.id);
        }

        let (action, volume_delta) = match stop.role {
            Role::Depot if i == 0 => (StepAction::Depart, 0.0),
            Role::Depot => (StepAction::Retour, 0.0),
            Role::Pickup => {
                load += stop.volume;
                total_collected += stop.volume;
                (StepAction::Collecte, stop.volume)
            }
            Role::Disposal => {
                let emptied = load;
                load = 0.0;
                disposal_visits += 1;
                (StepAction::Decharge, emptied)
            }
        };

        waypoints.push(Waypoint {
            id: stop.id,
            x: stop.x,
            y: stop.y,
            kind: role_kind(stop.role),
            volume: if stop.role == Role::Pickup { Some(stop.volume) } else { None },
        });

        step_details.push(StepDetail {
            order: i,
            point_id: stop.id,
            kind: role_kind(stop.role),
            action,
            volume_delta,
            load_after: load,
        });
    }

    // `calculer_statistiques_globales`'s `elimination_pct` formula: guards
    // the before=0 case with max(before, 1) rather than branching to a
    // fixed 100%.
    let eliminated_pct =
        (crossings_before as f64 - crossings_after as f64) / (crossings_before.max(1) as f64) * 100.0;

    RouteWire {
        vehicle_id: vehicle.id,
        capacity: vehicle.capacity,
        waypoints,
        total_distance,
        total_collected,
        disposal_visits,
        step_details,
        crossings: Crossings {
            before: crossings_before,
            after: crossings_after,
            eliminated_pct,
        },
    }
}

fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    (mean, variance.sqrt())
}

#[instrument(skip(req), fields(points = req.points.len(), vehicles = req.vehicles.len(), disposals = req.disposals.len()))]
pub fn run(req: Request) -> CoreResult<Response> {
    run_with_budget(req, Budget::unlimited())
}

/// Same as [`run`] but bounded by a caller-supplied wall-clock
/// deadline (spec section 5): on breach, the best-seen feasible tour
/// for each vehicle is returned with `partial: true`.
pub fn run_with_deadline(req: Request, deadline: Instant) -> CoreResult<Response> {
    run_with_budget(req, Budget::with_deadline(deadline))
}

fn run_with_budget(req: Request, budget: Budget) -> CoreResult<Response> {
    validate(&req)?;

    let depot = Depot {
        id: req.depot.id.unwrap_or(0),
        x: req.depot.x,
        y: req.depot.y,
    };

    let pickups: Vec<Pickup> = req
        .points
        .iter()
        .map(|p| Pickup {
            id: p.id,
            x: p.x,
            y: p.y,
            volume: p.volume,
        })
        .collect();
    let facilities: Vec<Facility> = req
        .disposals
        .iter()
        .map(|d| Facility { id: d.id, x: d.x, y: d.y })
        .collect();
    let vehicles: Vec<Vehicle> = req
        .vehicles
        .iter()
        .map(|v| Vehicle {
            id: v.id,
            capacity: v.capacity,
            fixed_cost: v.fixed_cost,
            allowed_zones: v.allowed_zones.clone(),
        })
        .collect();

    let mut coords: HashMap<u64, (f64, f64)> = HashMap::new();
    coords.insert(depot.id, (depot.x, depot.y));
    for p in &pickups {
        coords.insert(p.id, (p.x, p.y));
    }
    for f in &facilities {
        coords.insert(f.id, (f.x, f.y));
    }

    let mut oracle_map = HashMap::new();
    if let Some(m) = &req.distance_matrix {
        for (key, &d) in m {
            let (a, b) = parse_pair_key(key)?;
            oracle_map.insert((a, b), d);
            oracle_map.insert((b, a), d);
        }
    }
    let oracle = DistanceOracle::new(coords, oracle_map);

    let seed = req.seed.unwrap_or(42);
    let by_vehicle = allocate_points(&depot, &pickups, &vehicles);

    let mut routes = Vec::new();
    let mut warnings = Vec::new();
    let mut partial = false;

    for vehicle in &vehicles {
        let assigned = by_vehicle.get(&vehicle.id).cloned().unwrap_or_default();
        if assigned.is_empty() {
            continue;
        }

        if budget.expired() {
            tracing::warn!(vehicle = vehicle.id, "budget exceeded before vehicle could be optimised");
            warnings.push(format!("vehicle {} skipped: budget exceeded", vehicle.id));
            partial = true;
            continue;
        }

        let outcome = optimise_vehicle(&depot, vehicle, assigned, &facilities, &oracle, seed, &budget)?;
        check_capacity_invariant(&outcome.route, vehicle, &oracle)?;

        if budget.expired() {
            partial = true;
        }

        routes.push(route_wire(
            vehicle,
            &outcome.route,
            outcome.crossings_before,
            outcome.crossings_after,
            &oracle,
        ));
    }

    let lower_bound_km = mst::lower_bound(
        depot.id,
        &pickups.iter().map(|p| p.id).collect::<Vec<_>>(),
        &oracle,
    );

    let total_distance: f64 = routes.iter().map(|r| r.total_distance).sum();
    let total_collected: f64 = routes.iter().map(|r| r.total_collected).sum();
    let disposal_total: usize = routes.iter().map(|r| r.disposal_visits).sum();
    let distances: Vec<f64> = routes.iter().map(|r| r.total_distance).collect();
    let (mean_distance_per_vehicle, std_distance) = mean_and_stddev(&distances);
    let gap_pct = if lower_bound_km > 0.0 {
        (total_distance - lower_bound_km) / lower_bound_km * 100.0
    } else {
        0.0
    };

    tracing::debug!(vehicles_used = routes.len(), total_distance, gap_pct, "optimisation complete");

    Ok(Response {
        routes,
        global_stats: GlobalStats {
            total_distance,
            total_collected,
            vehicles_used: vehicles.iter().filter(|v| !by_vehicle.get(&v.id).map(Vec::is_empty).unwrap_or(true)).count(),
            disposal_total,
            mean_distance_per_vehicle,
            std_distance,
            lower_bound_km,
            gap_pct,
        },
        depot: DepotOut { id: depot.id, x: depot.x, y: depot.y },
        disposals: facilities.iter().map(|f| DisposalOut { id: f.id, x: f.x, y: f.y }).collect(),
        warnings,
        partial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::optimiser::{DepotIn, DisposalIn, PointIn, VehicleIn};

    fn point(id: u64, x: f64, y: f64, volume: f64) -> PointIn {
        PointIn { id, x, y, name: None, volume }
    }

    fn vehicle(id: u64, capacity: f64) -> VehicleIn {
        VehicleIn { id, capacity, fixed_cost: 0.0, allowed_zones: None }
    }

    /// Seed scenario 1 (Grid-5): single vehicle visits all five points
    /// with no disposals. The six vertices (depot + five points) lie
    /// on the perimeter of a 4x2 rectangle, so the optimal closed tour
    /// is that perimeter: 12.0 (2+2+2+2+2+2), reached with zero
    /// crossings.
    #[test]
    fn grid_five_single_tour_no_crossings() {
        let req = Request {
            depot: DepotIn { id: Some(0), x: 0.0, y: 0.0, name: None },
            points: vec![
                point(1, 2.0, 0.0, 100.0),
                point(2, 4.0, 0.0, 100.0),
                point(3, 4.0, 2.0, 100.0),
                point(4, 2.0, 2.0, 100.0),
                point(5, 0.0, 2.0, 100.0),
            ],
            disposals: vec![],
            vehicles: vec![vehicle(1, 1000.0)],
            distance_matrix: None,
            seed: Some(7),
        };
        let resp = run(req).expect("valid request");
        assert_eq!(resp.routes.len(), 1);
        let route = &resp.routes[0];
        assert_eq!(route.total_collected, 500.0);
        assert_eq!(route.crossings.after, 0);
        assert!((route.total_distance - 12.0).abs() < 1e-6, "got {}", route.total_distance);
    }

    /// Seed scenario 2: Forced unload — three 400-volume points against
    /// a 500 capacity force a disposal visit between every pair of
    /// pickups (no two can share a leg); load must never exceed
    /// capacity at any step of the walk.
    #[test]
    fn forced_unload_respects_capacity() {
        let req = Request {
            depot: DepotIn { id: Some(0), x: 0.0, y: 0.0, name: None },
            points: vec![
                point(1, 1.0, 0.0, 400.0),
                point(2, 2.0, 0.0, 400.0),
                point(3, 3.0, 0.0, 400.0),
            ],
            disposals: vec![DisposalIn { id: 100, x: 1.5, y: 1.0, name: None }],
            vehicles: vec![vehicle(1, 500.0)],
            distance_matrix: None,
            seed: Some(1),
        };
        let resp = run(req).expect("valid request");
        let route = &resp.routes[0];
        assert!(route.disposal_visits >= 1);

        let mut load = 0.0;
        for wp in &route.waypoints {
            match wp.kind {
                WaypointKind::Collection => load += wp.volume.unwrap_or(0.0),
                WaypointKind::Disposal => load = 0.0,
                WaypointKind::Depot => {}
            }
            assert!(load <= 500.0 + 1e-9);
        }
    }

    #[test]
    fn vehicle_with_no_points_produces_no_tour() {
        let mut unreachable_vehicle = vehicle(2, 100.0);
        unreachable_vehicle.allowed_zones = Some(vec![999]);
        let req = Request {
            depot: DepotIn { id: Some(0), x: 0.0, y: 0.0, name: None },
            points: vec![point(1, 5.0, 5.0, 10.0)],
            disposals: vec![],
            vehicles: vec![vehicle(1, 100.0), unreachable_vehicle],
            distance_matrix: None,
            seed: Some(1),
        };
        let resp = run(req).expect("valid request");
        assert_eq!(resp.routes.len(), 1);
        assert_eq!(resp.global_stats.vehicles_used, 1);
    }

    #[test]
    fn determinism_same_seed_same_output() {
        let req = || Request {
            depot: DepotIn { id: Some(0), x: 0.0, y: 0.0, name: None },
            points: (1..=8)
                .map(|i| point(i, (i as f64 * 1.3).sin() * 10.0, (i as f64 * 0.7).cos() * 10.0, 20.0))
                .collect(),
            disposals: vec![DisposalIn { id: 200, x: 3.0, y: 3.0, name: None }],
            vehicles: vec![vehicle(1, 60.0)],
            distance_matrix: None,
            seed: Some(99),
        };
        let a = run(req()).expect("valid request");
        let b = run(req()).expect("valid request");
        assert_eq!(a.routes[0].waypoints, b.routes[0].waypoints);
        assert_eq!(a.routes[0].total_distance, b.routes[0].total_distance);
    }

    #[test]
    fn tour_coverage_each_point_visited_once() {
        let req = Request {
            depot: DepotIn { id: Some(0), x: 0.0, y: 0.0, name: None },
            points: (1..=12)
                .map(|i| point(i, (i as f64) * 0.9, (i as f64 % 4) as f64))
                .collect(),
            disposals: vec![DisposalIn { id: 50, x: 4.0, y: 1.0, name: None }],
            vehicles: vec![vehicle(1, 1000.0)],
            distance_matrix: None,
            seed: Some(3),
        };
        let resp = run(req).expect("valid request");
        let route = &resp.routes[0];
        let mut visited: Vec<u64> = route
            .waypoints
            .iter()
            .filter(|w| w.kind == WaypointKind::Collection)
            .map(|w| w.id)
            .collect();
        visited.sort_unstable();
        visited.dedup();
        assert_eq!(visited.len(), 12);
    }
}
