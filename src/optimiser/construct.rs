//! Initial tour construction: nearest-neighbour with opportunistic
//! unload (spec section 4.4a, grounded in
//! `_nearest_neighbor_avec_dechetteries`).

use super::types::{DistanceOracle, Depot, Facility, Pickup, Role, Stop};

pub(crate) fn nearest_facility(current_id: u64, facilities: &[Facility], oracle: &DistanceOracle) -> Option<(Facility, f64)> {
    facilities
        .iter()
        .map(|f| (*f, oracle.dist(current_id, f.id)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

/// Builds the closed initial tour `[depot, ..., depot]`, inserting a
/// disposal stop whenever the next pickup would overflow capacity and
/// load is non-zero, and a final disposal stop if load remains
/// positive when pickups run out.
pub fn nearest_neighbour(
    depot: &Depot,
    pickups: &[Pickup],
    facilities: &[Facility],
    capacity: f64,
    oracle: &DistanceOracle,
) -> Vec<Stop> {
    let mut remaining: Vec<&Pickup> = pickups.iter().collect();
    let mut route = vec![Stop {
        id: depot.id,
        x: depot.x,
        y: depot.y,
        role: Role::Depot,
        volume: 0.0,
    }];
    let mut current_id = depot.id;
    let mut load = 0.0;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_cost = f64::INFINITY;

        for (idx, p) in remaining.iter().enumerate() {
            let look_ahead = if load + p.volume <= capacity {
                oracle.dist(current_id, p.id)
            } else if let Some((facility, d_to_facility)) =
                nearest_facility(current_id, facilities, oracle)
            {
                d_to_facility + oracle.dist(facility.id, p.id)
            } else {
                oracle.dist(current_id, p.id)
            };
            if look_ahead < best_cost {
                best_cost = look_ahead;
                best_idx = idx;
            }
        }

        let p = remaining.remove(best_idx);

        if load + p.volume > capacity && load > 0.0 {
            if let Some((facility, _)) = nearest_facility(current_id, facilities, oracle) {
                route.push(Stop {
                    id: facility.id,
                    x: facility.x,
                    y: facility.y,
                    role: Role::Disposal,
                    volume: 0.0,
                });
                current_id = facility.id;
                load = 0.0;
            }
        }

        route.push(Stop {
            id: p.id,
            x: p.x,
            y: p.y,
            role: Role::Pickup,
            volume: p.volume,
        });
        current_id = p.id;
        load += p.volume;
    }

    if load > 0.0 {
        if let Some((facility, _)) = nearest_facility(current_id, facilities, oracle) {
            route.push(Stop {
                id: facility.id,
                x: facility.x,
                y: facility.y,
                role: Role::Disposal,
                volume: 0.0,
            });
        }
    }

    route.push(Stop {
        id: depot.id,
        x: depot.x,
        y: depot.y,
        role: Role::Depot,
        volume: 0.0,
    });

    route
}

/// Extracts `[depot, pickups…, depot]`, dropping every disposal stop
/// (spec section 4.4b: the pure-pickup sub-sequence local search
/// operates on).
pub fn pickups_only(route: &[Stop]) -> Vec<Stop> {
    route
        .iter()
        .copied()
        .filter(|s| s.role != Role::Disposal)
        .collect()
}
