//! Pure-pickup 2-opt (spec section 4.4b, grounded in
//! `_deux_opt_complet`).

use crate::config::constant::{TWO_OPT_EPSILON, TWO_OPT_ITER_BASE, TWO_OPT_ITER_PER_POINT, TWO_OPT_MAX_ITER_CAP};

use super::types::{DistanceOracle, Stop};

fn segment_cost(route: &[Stop], i: usize, j: usize, oracle: &DistanceOracle) -> f64 {
    oracle.dist(route[i].id, route[i + 1].id) + oracle.dist(route[j].id, route[j + 1].id)
}

fn reversed_cost(route: &[Stop], i: usize, j: usize, oracle: &DistanceOracle) -> f64 {
    oracle.dist(route[i].id, route[j].id) + oracle.dist(route[i + 1].id, route[j + 1].id)
}

/// Iterates `1 <= i < j < n-1`; reverses `[i..=j]` when that strictly
/// reduces total length beyond `TWO_OPT_EPSILON`. Repeats until no
/// improving move remains or the iteration cap is hit.
pub fn run(mut route: Vec<Stop>, oracle: &DistanceOracle) -> Vec<Stop> {
    let n = route.len();
    if n < 5 {
        return route;
    }
    let max_iter = TWO_OPT_MAX_ITER_CAP.min(TWO_OPT_ITER_BASE + TWO_OPT_ITER_PER_POINT * (n - 2));

    for _ in 0..max_iter {
        let mut improved = false;
        'outer: for i in 1..n - 2 {
            for j in (i + 1)..n - 1 {
                let before = segment_cost(&route, i - 1, j, oracle);
                let after = reversed_cost(&route, i - 1, j, oracle);
                if before - after > TWO_OPT_EPSILON {
                    route[i..=j].reverse();
                    improved = true;
                    break 'outer;
                }
            }
        }
        if !improved {
            break;
        }
    }

    route
}
