//! Crossing detection and the final crossing-elimination pass (spec
//! section 4.4g, grounded in `_segments_se_croisent`,
//! `_compter_croisements` and `_nettoyer_croisements_final`).

use crate::config::constant::{CROSSING_EPSILON, CROSSING_MAX_OUTER_ITER};

use super::types::{Role, Stop};

fn ccw(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    (cy - ay) * (bx - ax) - (by - ay) * (cx - ax)
}

/// Proper intersection test: collinear endpoints are treated as
/// non-crossing.
fn segments_cross(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), p4: (f64, f64)) -> bool {
    let d1 = ccw(p1.0, p1.1, p2.0, p2.1, p3.0, p3.1);
    let d2 = ccw(p1.0, p1.1, p2.0, p2.1, p4.0, p4.1);
    let d3 = ccw(p3.0, p3.1, p4.0, p4.1, p1.0, p1.1);
    let d4 = ccw(p3.0, p3.1, p4.0, p4.1, p2.0, p2.1);

    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Counts pairs of non-adjacent segments that properly intersect.
/// Adjacent segments (`j == i+1`) and the pair formed by the tour's
/// first and last segment (both touch the depot) are excluded.
pub fn count_crossings(route: &[Stop]) -> usize {
    if route.len() < 4 {
        return 0;
    }
    let n = route.len();
    let mut count = 0;
    for i in 0..n - 1 {
        for j in (i + 2)..n - 1 {
            if j == i + 1 || (i == 0 && j == n - 2) {
                continue;
            }
            if segments_cross(
                (route[i].x, route[i].y),
                (route[i + 1].x, route[i + 1].y),
                (route[j].x, route[j].y),
                (route[j + 1].x, route[j + 1].y),
            ) {
                count += 1;
            }
        }
    }
    count
}

/// Walks the route with load reset at every disposal/depot visit;
/// `true` iff load never exceeds `capacity`.
pub fn capacity_holds(route: &[Stop], capacity: f64) -> bool {
    let mut load = 0.0;
    for stop in route {
        match stop.role {
            Role::Pickup => {
                load += stop.volume;
                if load > capacity + CROSSING_EPSILON {
                    return false;
                }
            }
            Role::Disposal | Role::Depot => load = 0.0,
        }
    }
    true
}

fn reverse(route: &[Stop], i: usize, j: usize) -> Vec<Stop> {
    let mut out = route.to_vec();
    out[i..=j].reverse();
    out
}

/// For every crossing, try reversing `[i+1..j]`; if that fails try
/// `[i..j]`; if the count still doesn't improve, try swapping the two
/// non-depot endpoints involved. Accept only when capacity still holds
/// and the crossing count strictly decreases. Bounded at
/// `CROSSING_MAX_OUTER_ITER` outer iterations.
pub fn eliminate(route: Vec<Stop>, capacity: f64) -> (Vec<Stop>, usize, usize) {
    let before = count_crossings(&route);
    let mut route = route;
    let mut current = before;

    if current == 0 {
        return (route, before, before);
    }

    for _ in 0..CROSSING_MAX_OUTER_ITER {
        if current == 0 {
            break;
        }
        let n = route.len();
        let mut crossing_pair = None;
        'search: for i in 0..n.saturating_sub(1) {
            for j in (i + 2)..n.saturating_sub(1) {
                if j == i + 1 || (i == 0 && j == n - 2) {
                    continue;
                }
                if segments_cross(
                    (route[i].x, route[i].y),
                    (route[i + 1].x, route[i + 1].y),
                    (route[j].x, route[j].y),
                    (route[j + 1].x, route[j + 1].y),
                ) {
                    crossing_pair = Some((i, j));
                    break 'search;
                }
            }
        }

        let (i, j) = match crossing_pair {
            Some(pair) => pair,
            None => break,
        };

        let mut applied = false;

        if i + 1 <= j {
            let candidate = reverse(&route, i + 1, j);
            if capacity_holds(&candidate, capacity) {
                let candidate_count = count_crossings(&candidate);
                if candidate_count < current {
                    route = candidate;
                    current = candidate_count;
                    applied = true;
                }
            }
        }

        if !applied && j < route.len() - 1 {
            let candidate = reverse(&route, i, j);
            if capacity_holds(&candidate, capacity) {
                let candidate_count = count_crossings(&candidate);
                if candidate_count < current {
                    route = candidate;
                    current = candidate_count;
                    applied = true;
                }
            }
        }

        if !applied {
            let mut candidate = route.clone();
            if candidate[i].role != Role::Depot && candidate[j].role != Role::Depot {
                candidate.swap(i, j);
                if capacity_holds(&candidate, capacity) {
                    let candidate_count = count_crossings(&candidate);
                    if candidate_count < current {
                        route = candidate;
                        current = candidate_count;
                        applied = true;
                    }
                }
            }
        }

        if !applied {
            break;
        }
    }

    (route, before, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: u64, x: f64, y: f64, role: Role, volume: f64) -> Stop {
        Stop { id, x, y, role, volume }
    }

    #[test]
    fn crossed_square_detected() {
        let route = vec![
            stop(0, 0.0, 0.0, Role::Depot, 0.0),
            stop(1, 1.0, 0.0, Role::Pickup, 1.0),
            stop(2, 0.0, 1.0, Role::Pickup, 1.0),
            stop(3, 1.0, 1.0, Role::Pickup, 1.0),
            stop(0, 0.0, 0.0, Role::Depot, 0.0),
        ];
        assert!(count_crossings(&route) >= 1);
    }
}
