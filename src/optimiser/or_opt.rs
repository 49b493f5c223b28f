//! Or-opt: relocate short contiguous pickup blocks (spec section
//! 4.4d, grounded in `_or_opt_simple`).

use crate::config::constant::OR_OPT_EPSILON;

use super::crossing::count_crossings;
use super::types::{DistanceOracle, Stop};

fn route_length(route: &[Stop], oracle: &DistanceOracle) -> f64 {
    route.windows(2).map(|w| oracle.dist(w[0].id, w[1].id)).sum()
}

fn relocate(route: &[Stop], start: usize, len: usize, dest: usize) -> Vec<Stop> {
    let mut remaining = route.to_vec();
    let block: Vec<Stop> = remaining.drain(start..start + len).collect();
    let insert_at = if dest > start { dest - len } else { dest };
    remaining.splice(insert_at..insert_at, block);
    remaining
}

/// For segment lengths 1, 2 and 3, try relocating every contiguous
/// pickup block to every other valid position; accept the first move
/// whose length delta is strictly negative beyond `OR_OPT_EPSILON` and
/// that does not increase the crossing count.
pub fn run(route: Vec<Stop>, max_iterations: usize, oracle: &DistanceOracle) -> Vec<Stop> {
    let mut route = route;
    let n = route.len();
    if n < 6 {
        return route;
    }

    for _ in 0..max_iterations {
        let n = route.len();
        let current_length = route_length(&route, oracle);
        let current_crossings = count_crossings(&route);
        let mut applied = false;

        'search: for seg_len in 1..=3usize {
            for start in 1..n - 1 - seg_len {
                for dest in 1..n - seg_len {
                    if dest >= start && dest <= start + seg_len {
                        continue;
                    }
                    let candidate = relocate(&route, start, seg_len, dest);
                    let candidate_length = route_length(&candidate, oracle);
                    if candidate_length < current_length - OR_OPT_EPSILON
                        && count_crossings(&candidate) <= current_crossings
                    {
                        route = candidate;
                        applied = true;
                        break 'search;
                    }
                }
            }
        }

        if !applied {
            break;
        }
    }

    route
}
