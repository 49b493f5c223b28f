//! Minimum spanning tree lower bound (spec section 4.4, grounded in
//! `_calculer_borne_inferieure_mst`): Prim's algorithm, O(n^2).

use super::types::DistanceOracle;

/// Cost of the MST over `{depot} ∪ pickups`: any Hamiltonian tour of
/// these vertices has length at least this much.
pub fn lower_bound(depot_id: u64, pickup_ids: &[u64], oracle: &DistanceOracle) -> f64 {
    let mut nodes = vec![depot_id];
    nodes.extend_from_slice(pickup_ids);

    if nodes.len() < 2 {
        return 0.0;
    }

    let n = nodes.len();
    let mut in_tree = vec![false; n];
    let mut min_edge = vec![f64::INFINITY; n];
    min_edge[0] = 0.0;
    let mut total = 0.0;

    for _ in 0..n {
        let mut u = None;
        let mut best = f64::INFINITY;
        for v in 0..n {
            if !in_tree[v] && min_edge[v] < best {
                best = min_edge[v];
                u = Some(v);
            }
        }
        let u = match u {
            Some(u) => u,
            None => break,
        };
        in_tree[u] = true;
        total += best;

        for v in 0..n {
            if !in_tree[v] {
                let d = oracle.dist(nodes[u], nodes[v]);
                if d < min_edge[v] {
                    min_edge[v] = d;
                }
            }
        }
    }

    total
}
