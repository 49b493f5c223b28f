//! L3 domain types (spec sections 3 and 4.3).

use chrono::NaiveTime;

use crate::config::constant::{NIGHT_END_HOUR, NIGHT_START_HOUR};
use crate::error::{CoreError, CoreResult};

pub fn parse_hhmm(field: &str, s: &str) -> CoreResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| CoreError::input(field, format!("malformed time string '{s}'")))
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub id: u64,
    pub day: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub congestion: f64,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Same day AND strictly intersecting half-open intervals.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

fn in_night(t: NaiveTime) -> bool {
    let night_start = NaiveTime::from_hms_opt(NIGHT_START_HOUR, 0, 0).unwrap();
    let night_end = NaiveTime::from_hms_opt(NIGHT_END_HOUR, 0, 0).unwrap();
    // Wrap-around interval [22:00, 06:00).
    t >= night_start || t < night_end
}

pub fn slot_touches_night(slot: &Slot) -> bool {
    in_night(slot.start) || in_night(slot.end)
}

#[derive(Debug, Clone)]
pub struct Window {
    pub zone_id: u64,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct Break {
    pub vehicle_id: u64,
    pub start: NaiveTime,
    pub end: NaiveTime,
}
