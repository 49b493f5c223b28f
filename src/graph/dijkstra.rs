//! Single-source shortest paths, binary-heap Dijkstra over non-negative
//! weights (spec section 4.1).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use super::types::Graph;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: u64,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest cost first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns `(distance, ordered vertex path)`. Unreachable targets yield
/// `(f64::INFINITY, vec![])`. Any shortest path is acceptable; this
/// implementation does not guarantee the lexicographically first one
/// among ties.
pub fn shortest_path(graph: &Graph, source: u64, target: u64) -> (f64, Vec<u64>) {
    if source == target && graph.contains(source) {
        return (0.0, vec![source]);
    }

    let mut dist: HashMap<u64, f64> = HashMap::new();
    let mut prev: HashMap<u64, u64> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(HeapEntry {
        cost: 0.0,
        node: source,
    });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if node == target {
            break;
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        for &(next, weight) in graph.neighbours(node) {
            let candidate = cost + weight;
            if candidate < *dist.get(&next).unwrap_or(&f64::INFINITY) {
                dist.insert(next, candidate);
                prev.insert(next, node);
                heap.push(HeapEntry {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }

    match dist.get(&target) {
        Some(&d) if d.is_finite() => {
            let mut path = vec![target];
            let mut cur = target;
            while let Some(&p) = prev.get(&cur) {
                path.push(p);
                cur = p;
                if cur == source {
                    break;
                }
            }
            path.reverse();
            (d, path)
        }
        _ => (f64::INFINITY, Vec::new()),
    }
}
