//! L3 wire contract: tripartite temporal planning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::assignment::{VehicleIn, ZoneIn};
use super::graph::{ConnectionIn, DisposalIn, PointIn};

#[derive(Debug, Clone, Deserialize)]
pub struct SlotIn {
    pub id: u64,
    pub day: String,
    pub start: String,
    pub end: String,
    pub congestion: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowIn {
    #[serde(rename = "zoneId")]
    pub zone_id: u64,
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakIn {
    #[serde(rename = "vehicleId")]
    pub vehicle_id: u64,
    pub start: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConstraintsIn {
    #[serde(default)]
    pub windows: Vec<WindowIn>,
    #[serde(default)]
    pub breaks: Vec<BreakIn>,
    #[serde(rename = "nightForbidden", default)]
    pub night_forbidden: Vec<u64>,
    #[serde(default)]
    pub durations: HashMap<u64, i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub slots: Vec<SlotIn>,
    #[serde(default)]
    pub constraints: ConstraintsIn,
    pub vehicles: Vec<VehicleIn>,
    pub zones: Vec<ZoneIn>,
    #[serde(default)]
    pub points: Vec<PointIn>,
    #[serde(default)]
    pub connections: Vec<ConnectionIn>,
    #[serde(default)]
    pub disposals: Vec<DisposalIn>,
    #[serde(rename = "incompatibleZones", default)]
    pub incompatible_zones: Vec<(u64, u64)>,
    #[serde(rename = "horizonDays")]
    pub horizon_days: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSummary {
    pub day: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    #[serde(rename = "pointId")]
    pub point_id: u64,
    pub order: usize,
    #[serde(rename = "estimatedTime")]
    pub estimated_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanEntry {
    #[serde(rename = "vehicleId")]
    pub vehicle_id: u64,
    #[serde(rename = "zoneId")]
    pub zone_id: u64,
    pub slot: SlotSummary,
    #[serde(rename = "slotId")]
    pub slot_id: u64,
    pub duration: i64,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Indicators {
    #[serde(rename = "occupancyPct")]
    pub occupancy_pct: f64,
    #[serde(rename = "scheduleRespectPct")]
    pub schedule_respect_pct: f64,
    #[serde(rename = "congestionAverage")]
    pub congestion_average: f64,
    #[serde(rename = "meanDelay")]
    pub mean_delay: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub plan: HashMap<String, Vec<PlanEntry>>,
    pub indicators: Indicators,
    pub warnings: Vec<String>,
}
