//! L3: tripartite temporal planner (spec section 4.3).

pub mod feasibility;
pub mod planner;
pub mod types;

use std::collections::{HashMap, HashSet};

use chrono::Duration;
use tracing::instrument;

use crate::assignment::types::Zone;
use crate::error::{CoreError, CoreResult};
use crate::wire::temporal::{Indicators, PlanEntry, Request, Response, SlotSummary, Task};

use feasibility::Constraints;
use planner::{tasks_for_zone, WEEKDAYS};
use types::{parse_hhmm, Break, Slot, Window};

fn build_slots(req: &Request) -> CoreResult<Vec<Slot>> {
    req.slots
        .iter()
        .map(|s| {
            Ok(Slot {
                id: s.id,
                day: s.day.clone(),
                start: parse_hhmm("slots[].start", &s.start)?,
                end: parse_hhmm("slots[].end", &s.end)?,
                congestion: s.congestion.unwrap_or(1.0),
            })
        })
        .collect()
}

fn build_windows(req: &Request) -> CoreResult<HashMap<u64, Window>> {
    req.constraints
        .windows
        .iter()
        .map(|w| {
            Ok((
                w.zone_id,
                Window {
                    zone_id: w.zone_id,
                    open: parse_hhmm("constraints.windows[].open", &w.open)?,
                    close: parse_hhmm("constraints.windows[].close", &w.close)?,
                },
            ))
        })
        .collect()
}

fn build_breaks(req: &Request) -> CoreResult<HashMap<u64, Vec<Break>>> {
    let mut by_vehicle: HashMap<u64, Vec<Break>> = HashMap::new();
    for b in &req.constraints.breaks {
        let start = parse_hhmm("constraints.breaks[].start", &b.start)?;
        let end = start + Duration::minutes((b.hours * 60.0).round() as i64);
        by_vehicle.entry(b.vehicle_id).or_default().push(Break {
            vehicle_id: b.vehicle_id,
            start,
            end,
        });
    }
    Ok(by_vehicle)
}

#[instrument(skip(req), fields(slots = req.slots.len(), vehicles = req.vehicles.len(), zones = req.zones.len()))]
pub fn run(req: Request) -> CoreResult<Response> {
    if req.horizon_days.unwrap_or(7) == 0 {
        return Err(CoreError::input("horizonDays", "must be >= 1"));
    }

    let slots = build_slots(&req)?;
    let windows = build_windows(&req)?;
    let breaks_by_vehicle = build_breaks(&req)?;
    let night_forbidden: HashSet<u64> = req.constraints.night_forbidden.iter().copied().collect();

    let zones_by_id: HashMap<u64, Zone> = req
        .zones
        .iter()
        .map(|z| {
            (
                z.id,
                Zone {
                    id: z.id,
                    points: z.points.clone(),
                    volume: z.volume,
                    centre: z.centre,
                    priority: z.priority,
                    frequency: z.frequency,
                },
            )
        })
        .collect();

    let assignment = crate::assignment::greedy::assign(
        &req.vehicles
            .iter()
            .map(|v| crate::assignment::types::Vehicle {
                id: v.id,
                capacity: v.capacity,
                fixed_cost: v.fixed_cost,
                allowed_zones: v.allowed_zones.clone(),
            })
            .collect::<Vec<_>>(),
        &req.zones
            .iter()
            .map(|z| zones_by_id[&z.id].clone())
            .collect::<Vec<_>>(),
        &req.disposals,
        &req.incompatible_zones,
    );

    let assignment_by_vehicle: Vec<(u64, Vec<u64>)> = req
        .vehicles
        .iter()
        .map(|v| {
            (
                v.id,
                assignment.by_vehicle.get(&v.id).cloned().unwrap_or_default(),
            )
        })
        .collect();

    let constraints = Constraints {
        windows: &windows,
        breaks_by_vehicle: &breaks_by_vehicle,
        night_forbidden: &night_forbidden,
    };

    let durations = &req.constraints.durations;

    let (placements, warnings) = planner::plan(
        &assignment_by_vehicle,
        &zones_by_id,
        &slots,
        &constraints,
        durations,
    );

    for w in &warnings {
        tracing::warn!(%w, "placement warning");
    }

    let horizon = req.horizon_days.unwrap_or(7).min(7);
    let mut plan: HashMap<String, Vec<PlanEntry>> = WEEKDAYS
        .iter()
        .take(horizon)
        .map(|d| (d.to_string(), Vec::new()))
        .collect();

    let mut congestions = Vec::new();

    for p in &placements {
        if !plan.contains_key(&p.slot.day) {
            continue;
        }
        congestions.push(p.slot.congestion);

        let zone = &zones_by_id[&p.zone_id];
        let tasks: Vec<Task> = tasks_for_zone(zone, p.slot.start)
            .into_iter()
            .map(|(point_id, order, time)| Task {
                point_id,
                order,
                estimated_time: time.format("%H:%M").to_string(),
            })
            .collect();

        plan.get_mut(&p.slot.day).unwrap().push(PlanEntry {
            vehicle_id: p.vehicle_id,
            zone_id: p.zone_id,
            slot: SlotSummary {
                day: p.slot.day.clone(),
                start: p.slot.start.format("%H:%M").to_string(),
                end: p.slot.end.format("%H:%M").to_string(),
            },
            slot_id: p.slot.id,
            duration: p.duration_minutes,
            tasks,
        });
    }

    let total_possible = (slots.len() * req.vehicles.len()) as f64;
    let occupancy_pct = if total_possible > 0.0 {
        (placements.len() as f64 / total_possible) * 100.0
    } else {
        0.0
    };
    let congestion_average = if congestions.is_empty() {
        0.0
    } else {
        congestions.iter().sum::<f64>() / congestions.len() as f64
    };

    Ok(Response {
        plan,
        indicators: Indicators {
            occupancy_pct,
            schedule_respect_pct: 100.0,
            congestion_average,
            mean_delay: 0.0,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::assignment::{VehicleIn, ZoneIn};
    use crate::wire::temporal::{BreakIn, ConstraintsIn, SlotIn, WindowIn};
    use crate::wire::Point;

    fn vehicle(id: u64) -> VehicleIn {
        VehicleIn {
            id,
            capacity: 1000.0,
            fixed_cost: 0.0,
            allowed_zones: None,
            initial_position: None,
        }
    }

    fn zone(id: u64) -> ZoneIn {
        ZoneIn {
            id,
            points: vec![1, 2],
            volume: 10.0,
            centre: Point { x: 0.0, y: 0.0 },
            priority: crate::wire::Priority::Normal,
            frequency: None,
        }
    }

    #[test]
    fn window_violation_skips_placement() {
        let req = Request {
            slots: vec![SlotIn {
                id: 1,
                day: "lundi".into(),
                start: "14:00".into(),
                end: "16:00".into(),
                congestion: Some(1.0),
            }],
            constraints: ConstraintsIn {
                windows: vec![WindowIn {
                    zone_id: 1,
                    open: "10:00".into(),
                    close: "12:00".into(),
                }],
                ..Default::default()
            },
            vehicles: vec![vehicle(1)],
            zones: vec![zone(1)],
            points: vec![],
            connections: vec![],
            disposals: vec![],
            incompatible_zones: vec![],
            horizon_days: Some(1),
        };
        let resp = run(req).expect("valid request");
        assert_eq!(resp.indicators.occupancy_pct, 0.0);
        assert!(resp.plan.values().all(|v| v.is_empty()));
    }

    #[test]
    fn break_overlap_is_skipped_with_warning() {
        let req = Request {
            slots: vec![SlotIn {
                id: 1,
                day: "lundi".into(),
                start: "12:30".into(),
                end: "14:00".into(),
                congestion: Some(1.0),
            }],
            constraints: ConstraintsIn {
                breaks: vec![BreakIn {
                    vehicle_id: 1,
                    start: "12:00".into(),
                    hours: 1.0,
                }],
                ..Default::default()
            },
            vehicles: vec![vehicle(1)],
            zones: vec![zone(1)],
            points: vec![],
            connections: vec![],
            disposals: vec![],
            incompatible_zones: vec![],
            horizon_days: Some(1),
        };
        let resp = run(req).expect("valid request");
        assert_eq!(resp.warnings.len(), 1);
    }

    #[test]
    fn placed_slots_never_overlap_for_same_vehicle() {
        let req = Request {
            slots: vec![
                SlotIn {
                    id: 1,
                    day: "lundi".into(),
                    start: "08:00".into(),
                    end: "09:00".into(),
                    congestion: Some(1.0),
                },
                SlotIn {
                    id: 2,
                    day: "lundi".into(),
                    start: "08:30".into(),
                    end: "09:30".into(),
                    congestion: Some(1.0),
                },
            ],
            constraints: ConstraintsIn::default(),
            vehicles: vec![vehicle(1)],
            zones: vec![zone(1), zone(2)],
            points: vec![],
            connections: vec![],
            disposals: vec![],
            incompatible_zones: vec![],
            horizon_days: Some(1),
        };
        let resp = run(req).expect("valid request");
        let entries = &resp.plan["lundi"];
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                if entries[i].vehicle_id == entries[j].vehicle_id {
                    let a = &entries[i].slot;
                    let b = &entries[j].slot;
                    assert!(a.start >= b.end || b.start >= a.end);
                }
            }
        }
    }
}
