//! L2 domain types (spec section 3).

use crate::wire::Point;
use crate::wire::Priority;

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: u64,
    pub capacity: f64,
    pub fixed_cost: f64,
    /// `None` (or empty) means universal access.
    pub allowed_zones: Option<Vec<u64>>,
}

impl Vehicle {
    pub fn can_access(&self, zone_id: u64) -> bool {
        match &self.allowed_zones {
            None => true,
            Some(zones) if zones.is_empty() => true,
            Some(zones) => zones.contains(&zone_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub id: u64,
    pub points: Vec<u64>,
    pub volume: f64,
    pub centre: Point,
    pub priority: Priority,
    #[allow(dead_code)]
    pub frequency: Option<u32>,
}

/// Comparator shared by L2's greedy pass and L3's per-vehicle zone
/// ordering (spec sections 4.2 and 4.3): priority ascending, then
/// volume descending, then id ascending.
pub fn zone_order(a: &Zone, b: &Zone) -> std::cmp::Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| b.volume.partial_cmp(&a.volume).unwrap_or(std::cmp::Ordering::Equal))
        .then_with(|| a.id.cmp(&b.id))
}
