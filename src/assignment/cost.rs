//! Cost model for assigning a vehicle to a zone (spec section 4.2).
//!
//! The depot is fixed at the origin `(0, 0)`: the wire contract for L2
//! carries no explicit depot field, and the original implementation
//! (`_distance_depot_vers_centre`) hardcodes the same convention.

use crate::config::constant::{COST_PER_KG, COST_PER_KM};
use crate::graph::types::euclidean;
use crate::wire::graph::DisposalIn;

use super::types::{Vehicle, Zone};

const DEPOT: (f64, f64) = (0.0, 0.0);

/// Euclidean distance from `z.centre` to the nearest disposal facility,
/// and that facility's distance back to the depot. If no facility
/// exists, the return leg is the direct distance back to the depot
/// (spec section 4.2: `D(F) = D(z)`).
fn nearest_facility_legs(zone: &Zone, disposals: &[DisposalIn]) -> (f64, f64) {
    let depot_to_zone = euclidean(DEPOT.0, DEPOT.1, zone.centre.x, zone.centre.y);

    let nearest = disposals.iter().min_by(|a, b| {
        let da = euclidean(zone.centre.x, zone.centre.y, a.x, a.y);
        let db = euclidean(zone.centre.x, zone.centre.y, b.x, b.y);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });

    match nearest {
        Some(f) => {
            let zone_to_facility = euclidean(zone.centre.x, zone.centre.y, f.x, f.y);
            let facility_to_depot = euclidean(f.x, f.y, DEPOT.0, DEPOT.1);
            (zone_to_facility, facility_to_depot)
        }
        None => (0.0, depot_to_zone),
    }
}

/// `+inf` if `vehicle` cannot access `zone`. Otherwise
/// `COST_PER_KM * (D(z) + dist(z, F) + D(F)) + COST_PER_KG * z.volume + fixedCost`.
pub fn assignment_cost(vehicle: &Vehicle, zone: &Zone, disposals: &[DisposalIn]) -> f64 {
    if !vehicle.can_access(zone.id) {
        return f64::INFINITY;
    }

    let depot_to_zone = euclidean(DEPOT.0, DEPOT.1, zone.centre.x, zone.centre.y);
    let (zone_to_facility, facility_to_depot) = nearest_facility_legs(zone, disposals);

    COST_PER_KM * (depot_to_zone + zone_to_facility + facility_to_depot)
        + COST_PER_KG * zone.volume
        + vehicle.fixed_cost
}
