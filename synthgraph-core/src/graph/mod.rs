//! Directed property graph shared by the generators, the extractor and the
//! veracity evaluator.
//!
//! A [`Graph`] is assembled once and never edited in place. Growth produces a
//! new value through [`Graph::extended`], which lets the attachment grower hand
//! an immutable snapshot to every worker of a round.

mod codec;
mod properties;

use std::{collections::HashMap, fmt};

use rayon::prelude::*;

use crate::error::GraphError;

pub use self::properties::{Properties, PropertyValue};

/// Identifier of a vertex.
///
/// # Examples
/// ```
/// use synthgraph_core::VertexId;
///
/// let id = VertexId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u64);

impl VertexId {
    /// Creates a vertex identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex and its attribute payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    id: VertexId,
    properties: Properties,
}

impl Vertex {
    /// Creates a vertex without properties.
    #[must_use]
    pub fn new(id: VertexId) -> Self {
        Self::with_properties(id, Properties::new())
    }

    /// Creates a vertex carrying `properties`.
    #[must_use]
    pub const fn with_properties(id: VertexId, properties: Properties) -> Self {
        Self { id, properties }
    }

    /// Returns the vertex identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn id(&self) -> VertexId { self.id }

    /// Returns the vertex properties.
    #[rustfmt::skip]
    #[must_use]
    pub const fn properties(&self) -> &Properties { &self.properties }
}

/// A directed edge and its attribute payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: VertexId,
    target: VertexId,
    properties: Properties,
}

impl Edge {
    /// Creates an edge without properties.
    #[must_use]
    pub fn new(source: VertexId, target: VertexId) -> Self {
        Self::with_properties(source, target, Properties::new())
    }

    /// Creates an edge carrying `properties`.
    #[must_use]
    pub const fn with_properties(source: VertexId, target: VertexId, properties: Properties) -> Self {
        Self {
            source,
            target,
            properties,
        }
    }

    /// Returns the tail of the edge.
    #[rustfmt::skip]
    #[must_use]
    pub const fn source(&self) -> VertexId { self.source }

    /// Returns the head of the edge.
    #[rustfmt::skip]
    #[must_use]
    pub const fn target(&self) -> VertexId { self.target }

    /// Returns the edge properties.
    #[rustfmt::skip]
    #[must_use]
    pub const fn properties(&self) -> &Properties { &self.properties }
}

/// Per-vertex degree counts, indexed by vertex position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeTable {
    in_degree: Vec<u64>,
    out_degree: Vec<u64>,
}

impl DegreeTable {
    /// Returns the in-degree of every vertex in graph order.
    #[rustfmt::skip]
    #[must_use]
    pub fn in_degrees(&self) -> &[u64] { &self.in_degree }

    /// Returns the out-degree of every vertex in graph order.
    #[rustfmt::skip]
    #[must_use]
    pub fn out_degrees(&self) -> &[u64] { &self.out_degree }

    /// Returns `in + out` for every vertex in graph order.
    #[must_use]
    pub fn total_degrees(&self) -> Vec<u64> {
        self.in_degree
            .iter()
            .zip(&self.out_degree)
            .map(|(inbound, outbound)| inbound + outbound)
            .collect()
    }

    fn zeroed(len: usize) -> Self {
        Self {
            in_degree: vec![0; len],
            out_degree: vec![0; len],
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (left, right) in self.in_degree.iter_mut().zip(other.in_degree) {
            *left += right;
        }
        for (left, right) in self.out_degree.iter_mut().zip(other.out_degree) {
            *left += right;
        }
        self
    }
}

/// Immutable directed multigraph with scalar vertex and edge attributes.
///
/// # Examples
/// ```
/// use synthgraph_core::Graph;
///
/// let graph = Graph::from_edge_list(3, [(0, 1), (1, 2)])?;
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// # Ok::<(), synthgraph_core::GraphError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    positions: HashMap<VertexId, usize>,
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.edges == other.edges
    }
}

impl Eq for Graph {}

impl Graph {
    /// Returns a graph with no vertices and no edges.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a graph after validating identifiers and edge endpoints.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateVertex`] when an identifier repeats and
    /// [`GraphError::DanglingEdge`] when an edge references a missing vertex.
    pub fn try_new(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        Self::empty().extended(vertices, edges)
    }

    /// Builds a property-free graph with vertices `0..vertex_count`.
    ///
    /// # Errors
    /// Returns [`GraphError::DanglingEdge`] when a pair references an identifier
    /// outside `0..vertex_count`.
    pub fn from_edge_list(
        vertex_count: u64,
        pairs: impl IntoIterator<Item = (u64, u64)>,
    ) -> Result<Self, GraphError> {
        let vertices = (0..vertex_count)
            .map(|id| Vertex::new(VertexId::new(id)))
            .collect();
        let edges = pairs
            .into_iter()
            .map(|(source, target)| Edge::new(VertexId::new(source), VertexId::new(target)))
            .collect();
        Self::try_new(vertices, edges)
    }

    /// Consumes the graph and returns it with `vertices` and `edges` appended.
    ///
    /// New edges may reference both existing and newly appended vertices.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateVertex`] when a new identifier collides
    /// and [`GraphError::DanglingEdge`] when an edge references a missing vertex.
    pub fn extended(mut self, vertices: Vec<Vertex>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        self.vertices.reserve(vertices.len());
        self.positions.reserve(vertices.len());
        for vertex in vertices {
            let position = self.vertices.len();
            if self.positions.insert(vertex.id(), position).is_some() {
                return Err(GraphError::DuplicateVertex { id: vertex.id() });
            }
            self.vertices.push(vertex);
        }

        let offset = self.edges.len();
        for (index, edge) in edges.iter().enumerate() {
            if !self.positions.contains_key(&edge.source())
                || !self.positions.contains_key(&edge.target())
            {
                return Err(GraphError::DanglingEdge {
                    index: offset + index,
                    from: edge.source(),
                    to: edge.target(),
                });
            }
        }
        self.edges.extend(edges);
        Ok(self)
    }

    /// Returns the number of vertices.
    #[rustfmt::skip]
    #[must_use]
    pub fn vertex_count(&self) -> usize { self.vertices.len() }

    /// Returns the number of edges.
    #[rustfmt::skip]
    #[must_use]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns whether the graph has no vertices.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.vertices.is_empty() }

    /// Returns the vertices in insertion order.
    #[rustfmt::skip]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] { &self.vertices }

    /// Returns the edges in insertion order.
    #[rustfmt::skip]
    #[must_use]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the position of `id` in [`Self::vertices`].
    #[must_use]
    pub fn position(&self, id: VertexId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Returns the vertex with identifier `id`.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.position(id).and_then(|position| self.vertices.get(position))
    }

    /// Returns the smallest identifier greater than every existing identifier.
    #[must_use]
    pub fn next_vertex_id(&self) -> VertexId {
        self.vertices
            .iter()
            .map(|vertex| vertex.id().get().saturating_add(1))
            .max()
            .map_or(VertexId::new(0), VertexId::new)
    }

    /// Counts in- and out-degrees for every vertex.
    ///
    /// Edges are folded per rayon worker and the partial tables merged, so the
    /// result does not depend on edge order.
    #[must_use]
    pub fn degree_table(&self) -> DegreeTable {
        let len = self.vertices.len();
        self.edges
            .par_iter()
            .fold(
                || DegreeTable::zeroed(len),
                |mut table, edge| {
                    if let Some(slot) = self
                        .position(edge.source())
                        .and_then(|position| table.out_degree.get_mut(position))
                    {
                        *slot += 1;
                    }
                    if let Some(slot) = self
                        .position(edge.target())
                        .and_then(|position| table.in_degree.get_mut(position))
                    {
                        *slot += 1;
                    }
                    table
                },
            )
            .reduce(|| DegreeTable::zeroed(len), DegreeTable::merge)
    }
}

#[cfg(test)]
mod tests;
