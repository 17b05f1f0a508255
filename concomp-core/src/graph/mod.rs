//! Graph model: a dense vertex range `[0, n)` plus an undirected edge list.
//!
//! Validation happens here and only here. Once a [`Graph`] exists every edge
//! is known to join two distinct in-range vertices, so the phases can index
//! the parent array without further checks.

use crate::error::{GraphError, InvalidEdgeReason};

/// An undirected edge between two distinct vertices.
///
/// # Examples
/// ```
/// use concomp_core::Graph;
///
/// let graph = Graph::try_from_edges(4, [(3, 1)])?;
/// let edge = graph.edges()[0];
/// assert_eq!((edge.source(), edge.target()), (3, 1));
/// assert_eq!(edge.ordered(), (3, 1));
/// # Ok::<(), concomp_core::GraphError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    source: usize,
    target: usize,
}

impl Edge {
    /// Builds an edge without validating it. Callers guarantee
    /// `source != target` and both endpoints in range.
    pub(crate) const fn new_unchecked(source: usize, target: usize) -> Self {
        debug_assert!(source != target);
        Self { source, target }
    }

    /// Returns the first endpoint as supplied.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(self) -> usize { self.source }

    /// Returns the second endpoint as supplied.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(self) -> usize { self.target }

    /// Returns the endpoints as `(hi, lo)`.
    #[must_use]
    pub const fn ordered(self) -> (usize, usize) {
        if self.source > self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

/// Vertex count plus an ordered edge sequence.
///
/// Edge order does not affect the computed components; it only decides
/// which worker or rank processes which edge. Duplicate edges are accepted.
///
/// # Examples
/// ```
/// use concomp_core::{Graph, GraphError};
///
/// let mut graph = Graph::new(3);
/// graph.add_edge(0, 1)?;
/// assert!(matches!(graph.add_edge(2, 2), Err(GraphError::InvalidEdge { .. })));
/// assert_eq!(graph.edge_count(), 1);
/// # Ok::<(), GraphError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates a graph with `vertex_count` isolated vertices.
    #[must_use]
    pub const fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    /// Creates an empty graph with room for `edges` edges.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, edges: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::with_capacity(edges),
        }
    }

    /// Builds a graph from endpoint pairs, rejecting the first invalid one.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidEdge`] for a self-loop or an endpoint
    /// `>= vertex_count`.
    ///
    /// # Examples
    /// ```
    /// use concomp_core::{Graph, GraphError, InvalidEdgeReason};
    ///
    /// let err = Graph::try_from_edges(2, [(0, 1), (1, 2)]).unwrap_err();
    /// assert!(matches!(
    ///     err,
    ///     GraphError::InvalidEdge { reason: InvalidEdgeReason::OutOfRange, .. }
    /// ));
    /// ```
    pub fn try_from_edges<I>(vertex_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let edges = edges.into_iter();
        let mut graph = Self::with_capacity(vertex_count, edges.size_hint().0);
        for (source, target) in edges {
            graph.add_edge(source, target)?;
        }
        Ok(graph)
    }

    /// Appends the undirected edge `{source, target}`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidEdge`] when the edge is a self-loop or
    /// either endpoint is out of range. The graph is left unchanged.
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<(), GraphError> {
        let reason = if source >= self.vertex_count || target >= self.vertex_count {
            Some(InvalidEdgeReason::OutOfRange)
        } else if source == target {
            Some(InvalidEdgeReason::SelfLoop)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GraphError::InvalidEdge {
                left: source,
                right: target,
                vertex_count: self.vertex_count,
                reason,
            });
        }
        self.edges.push(Edge::new_unchecked(source, target));
        Ok(())
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns the edges in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the number of edges, duplicates included.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns `true` when the graph has no vertices.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.vertex_count == 0 }

    pub(crate) fn into_parts(self) -> (usize, Vec<Edge>) {
        (self.vertex_count, self.edges)
    }
}

#[cfg(test)]
mod tests;
