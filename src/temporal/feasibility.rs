//! Feasibility and penalty rules for placing (vehicle, zone) into a
//! slot (spec section 4.3, grounded in `contrainte_temporelle.py`).

use std::collections::HashMap;

use crate::config::constant::{
    EARLY_BONUS_BEFORE_7, EARLY_BONUS_BEFORE_8, LATE_BONUS_FROM_18, PENALTY_CONGESTION_SCALE,
};

use super::types::{slot_touches_night, Break, Slot, Window};

pub struct Constraints<'a> {
    pub windows: &'a HashMap<u64, Window>,
    pub breaks_by_vehicle: &'a HashMap<u64, Vec<Break>>,
    pub night_forbidden: &'a std::collections::HashSet<u64>,
}

/// All four conditions of spec section 4.3 must hold.
pub fn is_feasible(
    constraints: &Constraints,
    vehicle_id: u64,
    zone_id: u64,
    slot: &Slot,
    duration_minutes: i64,
) -> bool {
    if let Some(window) = constraints.windows.get(&zone_id) {
        if slot.start < window.open || slot.end > window.close {
            return false;
        }
    }

    if let Some(breaks) = constraints.breaks_by_vehicle.get(&vehicle_id) {
        for b in breaks {
            if slot.start < b.end && b.start < slot.end {
                return false;
            }
        }
    }

    if constraints.night_forbidden.contains(&zone_id) && slot_touches_night(slot) {
        return false;
    }

    let adjusted = (duration_minutes as f64 * slot.congestion).floor() as i64;
    if adjusted > slot.duration_minutes() {
        return false;
    }

    true
}

/// `100 * (congestion - 1) + early/late bonus`.
pub fn penalty(slot: &Slot) -> f64 {
    let hour = slot.start.format("%H").to_string().parse::<u32>().unwrap_or(0);
    let bonus = if hour < 7 {
        EARLY_BONUS_BEFORE_7
    } else if hour < 8 {
        EARLY_BONUS_BEFORE_8
    } else if hour >= 18 {
        LATE_BONUS_FROM_18
    } else {
        0.0
    };
    PENALTY_CONGESTION_SCALE * (slot.congestion - 1.0) + bonus
}
