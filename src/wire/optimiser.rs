//! L4 wire contract: per-vehicle route optimisation — the core of the core.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct DepotIn {
    pub id: Option<u64>,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointIn {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
    pub volume: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisposalIn {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleIn {
    pub id: u64,
    pub capacity: f64,
    #[serde(rename = "fixedCost", default)]
    pub fixed_cost: f64,
    #[serde(rename = "allowedZones", default)]
    pub allowed_zones: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub depot: DepotIn,
    pub points: Vec<PointIn>,
    #[serde(default)]
    pub disposals: Vec<DisposalIn>,
    pub vehicles: Vec<VehicleIn>,
    #[serde(rename = "distanceMatrix", default)]
    pub distance_matrix: Option<HashMap<String, f64>>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    Depot,
    Collection,
    Disposal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub kind: WaypointKind,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepAction {
    Depart,
    Collecte,
    Decharge,
    Retour,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDetail {
    pub order: usize,
    #[serde(rename = "pointId")]
    pub point_id: u64,
    pub kind: WaypointKind,
    pub action: StepAction,
    #[serde(rename = "volumeDelta")]
    pub volume_delta: f64,
    #[serde(rename = "loadAfter")]
    pub load_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crossings {
    pub before: usize,
    pub after: usize,
    #[serde(rename = "eliminatedPct")]
    pub eliminated_pct: f64,
}

/// One vehicle's finished tour — the wire shape attached to
/// `CoreError::InternalInvariant` when a post-condition check fails, so
/// the offending tour can be reproduced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteWire {
    #[serde(rename = "vehicleId")]
    pub vehicle_id: u64,
    pub capacity: f64,
    pub waypoints: Vec<Waypoint>,
    #[serde(rename = "totalDistance")]
    pub total_distance: f64,
    #[serde(rename = "totalCollected")]
    pub total_collected: f64,
    #[serde(rename = "disposalVisits")]
    pub disposal_visits: usize,
    #[serde(rename = "stepDetails")]
    pub step_details: Vec<StepDetail>,
    pub crossings: Crossings,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlobalStats {
    #[serde(rename = "totalDistance")]
    pub total_distance: f64,
    #[serde(rename = "totalCollected")]
    pub total_collected: f64,
    #[serde(rename = "vehiclesUsed")]
    pub vehicles_used: usize,
    #[serde(rename = "disposalTotal")]
    pub disposal_total: usize,
    #[serde(rename = "meanDistancePerVehicle")]
    pub mean_distance_per_vehicle: f64,
    #[serde(rename = "stdDistance")]
    pub std_distance: f64,
    #[serde(rename = "lowerBoundKm")]
    pub lower_bound_km: f64,
    #[serde(rename = "gapPct")]
    pub gap_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepotOut {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisposalOut {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub routes: Vec<RouteWire>,
    #[serde(rename = "globalStats")]
    pub global_stats: GlobalStats,
    pub depot: DepotOut,
    pub disposals: Vec<DisposalOut>,
    pub warnings: Vec<String>,
    pub partial: bool,
}
