//! Road graph domain types (spec section 3, section 9's redesign note).

use std::collections::HashMap;

/// A vertex in the road graph. Depot, collection point and disposal
/// facility are represented as tagged variants rather than a
/// flag-carrying base class, replacing the legacy cyclic
/// parent/child inheritance.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Depot,
    Collection { volume: f64, priority: Priority },
    Disposal {
        cap: f64,
        accepted: Vec<String>,
        schedule: Option<String>,
    },
}

pub use crate::wire::Priority;

impl Location {
    pub fn is_disposal(&self) -> bool {
        matches!(self, Location::Disposal { .. })
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Location::Collection { .. })
    }
}

/// A vertex: id, coordinates, name and kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
    pub kind: Location,
}

/// Undirected, non-negative-weighted graph over [`Vertex`] ids.
///
/// Adding an edge between unknown ids is an input error; adding one
/// between a vertex and itself is silently ignored (spec section 4.1).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: HashMap<u64, Vertex>,
    adjacency: HashMap<u64, Vec<(u64, f64)>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent on id: a duplicate id replaces the stored attributes.
    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.adjacency.entry(vertex.id).or_default();
        self.vertices.insert(vertex.id, vertex);
    }

    pub fn vertex(&self, id: u64) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn ordered_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.vertices.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Fails if either endpoint is unknown. If `distance` is omitted the
    /// Euclidean distance between the two vertices is used. A self-loop
    /// (`a == b`) is ignored. Stored symmetrically.
    pub fn add_edge(&mut self, a: u64, b: u64, distance: Option<f64>) -> Result<(), String> {
        let va = self
            .vertices
            .get(&a)
            .ok_or_else(|| format!("unknown vertex id {a}"))?;
        let vb = self
            .vertices
            .get(&b)
            .ok_or_else(|| format!("unknown vertex id {b}"))?;

        if a == b {
            return Ok(());
        }

        let d = distance.unwrap_or_else(|| euclidean(va.x, va.y, vb.x, vb.y));
        self.adjacency.entry(a).or_default().push((b, d));
        self.adjacency.entry(b).or_default().push((a, d));
        Ok(())
    }

    pub fn neighbours(&self, id: u64) -> &[(u64, f64)] {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub fn euclidean(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}
