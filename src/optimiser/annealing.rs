//! Simulated annealing over random 2-opt neighbours (spec section
//! 4.4e, grounded in `_simulated_annealing` and the teacher's
//! `ChaCha8Rng`-seeded, keep-best-seen pattern in
//! `solver/tabu_search`).

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::constant::{SA_ALPHA, SA_T_MIN};

use super::types::{DistanceOracle, Stop};

fn route_length(route: &[Stop], oracle: &DistanceOracle) -> f64 {
    route.windows(2).map(|w| oracle.dist(w[0].id, w[1].id)).sum()
}

/// Random 2-opt neighbours; degrading moves are accepted with
/// probability `exp(-delta/T)`. Always keeps the best-seen solution,
/// which is what this function returns.
pub fn run(route: Vec<Stop>, t_initial: f64, max_iter: usize, rng: &mut ChaCha8Rng, oracle: &DistanceOracle) -> Vec<Stop> {
    let n = route.len();
    if n < 4 {
        return route;
    }

    let mut current = route.clone();
    let mut current_cost = route_length(&current, oracle);
    let mut best = current.clone();
    let mut best_cost = current_cost;
    let mut t = t_initial;

    for _ in 0..max_iter {
        if t < SA_T_MIN {
            break;
        }

        let mut i = rng.gen_range(1..n - 1);
        let mut j = rng.gen_range(1..n - 1);
        while i >= j || j - i < 2 {
            i = rng.gen_range(1..n - 1);
            j = rng.gen_range(1..n - 1);
        }

        let mut neighbour = current.clone();
        neighbour[i..=j].reverse();
        let neighbour_cost = route_length(&neighbour, oracle);
        let delta = neighbour_cost - current_cost;

        let accept = delta < 0.0 || (t > 0.0 && rng.gen::<f64>() < (-delta / t).exp());
        if accept {
            current = neighbour;
            current_cost = neighbour_cost;
            if current_cost < best_cost {
                best = current.clone();
                best_cost = current_cost;
            }
        }

        t *= SA_ALPHA;
    }

    best
}
