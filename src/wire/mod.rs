//! JSON-shaped request/response records for the four pipeline layers.
//!
//! Every struct here mirrors a wire contract verbatim: field names,
//! optionality and nesting match the external interface section of the
//! specification exactly, so a caller serialising/deserialising these
//! types with `serde_json` gets a bit-exact contract.

pub mod assignment;
pub mod graph;
pub mod optimiser;
pub mod temporal;

use serde::{Deserialize, Serialize};

/// A plane coordinate, shared by every layer that deals in Euclidean
/// positions (zone centres, vehicle start positions, depot/point/disposal
/// coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Priority tag shared by zones (L2/L3 input) and, through them, the
/// ordering rule used again in L3's own zone-per-vehicle ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl Priority {
    /// Ascending sort rank: high < normal < low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }
}
