//! L1 wire contract: road graph & shortest paths.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PointIn {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionIn {
    pub from: u64,
    pub to: u64,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisposalIn {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
    pub capacity: Option<f64>,
    pub accepted: Option<Vec<String>>,
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub points: Vec<PointIn>,
    pub connections: Vec<ConnectionIn>,
    #[serde(default)]
    pub disposals: Vec<DisposalIn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathEntry {
    pub from: u64,
    pub to: u64,
    pub distance: f64,
    pub path: Vec<u64>,
}

/// Finite distance statistics over the matrix's off-diagonal entries
/// (spec section 11): not part of the required contract, an additive
/// field nothing computed is thrown away.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub matrix: Vec<Vec<Option<f64>>>,
    pub paths: Vec<PathEntry>,
    #[serde(rename = "orderedIds")]
    pub ordered_ids: Vec<u64>,
    pub stats: DistanceStats,
}
