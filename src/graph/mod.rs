//! L1: road graph & shortest paths (spec section 4.1).

pub mod dijkstra;
pub mod matrix;
pub mod types;

use tracing::instrument;

use crate::error::{CoreError, CoreResult};
use crate::wire::graph::{DistanceStats, PathEntry, Request, Response};

use types::{Graph, Location, Vertex};

fn disposal_location(d: &crate::wire::graph::DisposalIn) -> Location {
    Location::Disposal {
        cap: d.capacity.unwrap_or(0.0),
        accepted: d.accepted.clone().unwrap_or_default(),
        schedule: d.schedule.clone(),
    }
}

fn build_graph(req: &Request) -> CoreResult<Graph> {
    let mut graph = Graph::new();

    for p in &req.points {
        graph.add_vertex(Vertex {
            id: p.id,
            x: p.x,
            y: p.y,
            name: p.name.clone(),
            kind: Location::Collection {
                volume: 0.0,
                priority: crate::wire::Priority::Normal,
            },
        });
    }

    for d in &req.disposals {
        graph.add_vertex(Vertex {
            id: d.id,
            x: d.x,
            y: d.y,
            name: d.name.clone(),
            kind: disposal_location(d),
        });
    }

    for c in &req.connections {
        graph
            .add_edge(c.from, c.to, c.distance)
            .map_err(|message| CoreError::input("connections", message))?;
    }

    Ok(graph)
}

/// Builds the graph, then the all-pairs distance matrix and the full
/// set of unordered shortest paths between every pair of vertices.
#[instrument(skip(req), fields(points = req.points.len(), disposals = req.disposals.len()))]
pub fn run(req: Request) -> CoreResult<Response> {
    let graph = build_graph(&req)?;
    let ordered_ids = graph.ordered_ids();

    tracing::debug!(vertices = ordered_ids.len(), "graph built");

    let raw_matrix = matrix::build(&graph, &ordered_ids);

    let mut paths = Vec::new();
    for (i, &from) in ordered_ids.iter().enumerate() {
        for &to in ordered_ids.iter().skip(i + 1) {
            let (distance, path) = dijkstra::shortest_path(&graph, from, to);
            if !distance.is_finite() {
                tracing::warn!(from, to, "no path between vertices");
            }
            paths.push(PathEntry {
                from,
                to,
                distance,
                path,
            });
        }
    }

    let (min, max, mean) = matrix::stats(&raw_matrix);

    let matrix = raw_matrix
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|d| if d.is_finite() { Some(d) } else { None })
                .collect()
        })
        .collect();

    Ok(Response {
        matrix,
        paths,
        ordered_ids,
        stats: DistanceStats { min, max, mean },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::graph::{ConnectionIn, PointIn};

    fn point(id: u64, x: f64, y: f64) -> PointIn {
        PointIn {
            id,
            x,
            y,
            name: None,
        }
    }

    fn conn(from: u64, to: u64, distance: Option<f64>) -> ConnectionIn {
        ConnectionIn { from, to, distance }
    }

    #[test]
    fn matrix_symmetry_and_diagonal() {
        let req = Request {
            points: vec![point(1, 0.0, 0.0), point(2, 3.0, 0.0), point(3, 3.0, 4.0)],
            connections: vec![conn(1, 2, None), conn(2, 3, None), conn(1, 3, None)],
            disposals: vec![],
        };
        let resp = run(req).expect("valid graph");
        let n = resp.ordered_ids.len();
        for i in 0..n {
            assert_eq!(resp.matrix[i][i], Some(0.0));
            for j in 0..n {
                assert_eq!(resp.matrix[i][j], resp.matrix[j][i]);
            }
        }
    }

    #[test]
    fn triangle_inequality_holds() {
        let req = Request {
            points: (1..=11)
                .map(|i| point(i, (i as f64) * 1.7, ((i * 3) % 5) as f64))
                .collect(),
            connections: (1..11).map(|i| conn(i, i + 1, None)).collect(),
            disposals: vec![],
        };
        let resp = run(req).expect("valid graph");
        let n = resp.ordered_ids.len();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let dij = resp.matrix[i][j];
                    let dik = resp.matrix[i][k];
                    let dkj = resp.matrix[k][j];
                    if let (Some(dij), Some(dik), Some(dkj)) = (dij, dik, dkj) {
                        assert!(dij <= dik + dkj + 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_vertex_in_connection_is_input_error() {
        let req = Request {
            points: vec![point(1, 0.0, 0.0)],
            connections: vec![conn(1, 99, Some(1.0))],
            disposals: vec![],
        };
        assert!(matches!(run(req), Err(CoreError::InputInvalid { .. })));
    }

    #[test]
    fn unreachable_pair_is_infinite_not_an_error() {
        let req = Request {
            points: vec![point(1, 0.0, 0.0), point(2, 1.0, 0.0)],
            connections: vec![],
            disposals: vec![],
        };
        let resp = run(req).expect("disconnected graph is still valid");
        assert_eq!(resp.matrix[0][1], None);
    }

    #[test]
    fn self_loop_is_ignored() {
        let req = Request {
            points: vec![point(1, 0.0, 0.0), point(2, 1.0, 0.0)],
            connections: vec![conn(1, 1, Some(5.0)), conn(1, 2, None)],
            disposals: vec![],
        };
        let resp = run(req).expect("self loop ignored, not an error");
        assert_eq!(resp.matrix[0][1], Some(1.0));
    }
}
