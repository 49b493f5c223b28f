//! 3-opt over the pure-pickup sequence (spec section 4.4c, grounded in
//! `_trois_opt`'s five reconnection patterns).

use crate::config::constant::{
    THREE_OPT_EPSILON, THREE_OPT_MAX_ITER_LARGE, THREE_OPT_MAX_ITER_SMALL, THREE_OPT_SMALL_THRESHOLD,
    THREE_OPT_WINDOW,
};

use super::types::{DistanceOracle, Stop};

fn route_length(route: &[Stop], oracle: &DistanceOracle) -> f64 {
    route.windows(2).map(|w| oracle.dist(w[0].id, w[1].id)).sum()
}

fn reconnections(b: &[Stop], c: &[Stop], d: &[Stop]) -> [Vec<Stop>; 5] {
    let rev_b: Vec<Stop> = b.iter().rev().copied().collect();
    let rev_c: Vec<Stop> = c.iter().rev().copied().collect();

    let join = |na: &[Stop], nb: &[Stop], nc: &[Stop]| -> Vec<Stop> {
        let mut out = Vec::with_capacity(na.len() + nb.len() + nc.len());
        out.extend_from_slice(na);
        out.extend_from_slice(nb);
        out.extend_from_slice(nc);
        out
    };

    [
        join(b, c, d),
        join(&rev_b, c, d),
        join(b, &rev_c, d),
        join(&rev_b, &rev_c, d),
        join(c, b, d),
    ]
}

/// Three-segment reshuffling with the five patterns of interest,
/// accepting the first improving reconnection found. Iteration count
/// depends on `|P|`; `i`, `j`, `k` windows are bounded for
/// tractability, matching the original exactly.
pub fn run(route: Vec<Stop>, point_count: usize, oracle: &DistanceOracle) -> Vec<Stop> {
    let n = route.len();
    if n < 6 {
        return route;
    }

    let max_iterations = if point_count > THREE_OPT_SMALL_THRESHOLD {
        THREE_OPT_MAX_ITER_LARGE
    } else {
        THREE_OPT_MAX_ITER_SMALL
    };

    let mut route = route;
    let mut iterations = 0;
    let mut improved = true;

    while improved && iterations < max_iterations {
        improved = false;
        iterations += 1;
        let n = route.len();
        let current_length = route_length(&route, oracle);

        'search: for i in 1..n.saturating_sub(4).min(15) {
            for j in (i + 2)..n.saturating_sub(2).min(i + 12) {
                for k in (j + 2)..n.saturating_sub(1).min(j + 12) {
                    let a = &route[..=i];
                    let b = &route[i + 1..=j];
                    let c = &route[j + 1..=k];
                    let d = &route[k + 1..];

                    for candidate_tail in reconnections(b, c, d) {
                        let mut candidate = a.to_vec();
                        candidate.extend(candidate_tail);
                        if route_length(&candidate, oracle) < current_length - THREE_OPT_EPSILON {
                            route = candidate;
                            improved = true;
                            break;
                        }
                    }
                    if improved {
                        break 'search;
                    }
                }
            }
        }
    }

    route
}
