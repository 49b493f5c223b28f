//! L2 wire contract: bipartite zone/vehicle assignment.

use serde::{Deserialize, Serialize};

use super::{graph::ConnectionIn, graph::DisposalIn, graph::PointIn, Point, Priority};

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleIn {
    pub id: u64,
    pub capacity: f64,
    #[serde(rename = "fixedCost")]
    pub fixed_cost: f64,
    #[serde(rename = "allowedZones", default)]
    pub allowed_zones: Option<Vec<u64>>,
    #[serde(rename = "initialPosition")]
    pub initial_position: Option<Point>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneIn {
    pub id: u64,
    pub points: Vec<u64>,
    pub volume: f64,
    pub centre: Point,
    #[serde(default)]
    pub priority: Priority,
    pub frequency: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub vehicles: Vec<VehicleIn>,
    pub zones: Vec<ZoneIn>,
    #[serde(rename = "incompatibleZones", default)]
    pub incompatible_zones: Vec<(u64, u64)>,
    #[serde(default)]
    pub points: Vec<PointIn>,
    #[serde(default)]
    pub connections: Vec<ConnectionIn>,
    #[serde(default)]
    pub disposals: Vec<DisposalIn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleAssignment {
    #[serde(rename = "vehicleId")]
    pub vehicle_id: u64,
    pub zones: Vec<u64>,
    #[serde(rename = "totalLoad")]
    pub total_load: f64,
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: f64,
    #[serde(rename = "utilisationPct")]
    pub utilisation_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    #[serde(rename = "vehiclesUsed")]
    pub vehicles_used: usize,
    #[serde(rename = "meanLoad")]
    pub mean_load: f64,
    #[serde(rename = "stdLoad")]
    pub std_load: f64,
    pub unassigned: Vec<u64>,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
    #[serde(rename = "meanUtilisationPct")]
    pub mean_utilisation_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BipartiteEdge {
    pub vehicle: u64,
    pub zone: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bipartite {
    #[serde(rename = "vehicleNodes")]
    pub vehicle_nodes: Vec<u64>,
    #[serde(rename = "zoneNodes")]
    pub zone_nodes: Vec<u64>,
    pub edges: Vec<BipartiteEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub assignment: Vec<VehicleAssignment>,
    pub statistics: Statistics,
    pub bipartite: Bipartite,
}
