//! Deterministic graph generators.
//!
//! Generators return plain [`EdgeList`]s so they can feed both the engine
//! (via `Graph::try_from_edges`) and the oracle without depending on the
//! core crate.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// A vertex count plus endpoint pairs; never contains self-loops.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EdgeList {
    /// Number of vertices; every endpoint is below it.
    pub vertex_count: usize,
    /// Undirected edges in generation order.
    pub edges: Vec<(usize, usize)>,
}

impl EdgeList {
    /// Creates a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn empty(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    /// Returns a copy with every edge listed twice, the second time with its
    /// endpoints swapped.
    #[must_use]
    pub fn with_duplicates(&self) -> Self {
        let mut edges = self.edges.clone();
        edges.extend(self.edges.iter().map(|&(left, right)| (right, left)));
        Self {
            vertex_count: self.vertex_count,
            edges,
        }
    }

    /// Returns a copy with the edges in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            vertex_count: self.vertex_count,
            edges: self.edges.iter().rev().copied().collect(),
        }
    }
}

/// `0 - 1 - … - (n-1)`.
#[must_use]
pub fn path(vertex_count: usize) -> EdgeList {
    EdgeList {
        vertex_count,
        edges: (1..vertex_count).map(|vertex| (vertex - 1, vertex)).collect(),
    }
}

/// Vertex 0 joined to every other vertex.
#[must_use]
pub fn star(vertex_count: usize) -> EdgeList {
    EdgeList {
        vertex_count,
        edges: (1..vertex_count).map(|leaf| (0, leaf)).collect(),
    }
}

/// A path closed back onto vertex 0; needs at least three vertices to add
/// the closing edge.
#[must_use]
pub fn cycle(vertex_count: usize) -> EdgeList {
    let mut graph = path(vertex_count);
    if vertex_count >= 3 {
        graph.edges.push((vertex_count - 1, 0));
    }
    graph
}

/// Every pair of distinct vertices.
#[must_use]
pub fn complete(vertex_count: usize) -> EdgeList {
    let edges = (0..vertex_count)
        .flat_map(|left| (left + 1..vertex_count).map(move |right| (left, right)))
        .collect();
    EdgeList {
        vertex_count,
        edges,
    }
}

/// Places `parts` side by side, offsetting each part's vertex ids by the
/// vertex counts before it.
///
/// # Examples
/// ```
/// use concomp_test_support::graphs::{disjoint_union, path, star};
///
/// let graph = disjoint_union(&[path(2), star(3)]);
/// assert_eq!(graph.vertex_count, 5);
/// assert_eq!(graph.edges, vec![(0, 1), (2, 3), (2, 4)]);
/// ```
#[must_use]
pub fn disjoint_union(parts: &[EdgeList]) -> EdgeList {
    let mut union = EdgeList::default();
    for part in parts {
        let offset = union.vertex_count;
        union.edges.extend(
            part.edges
                .iter()
                .map(|&(left, right)| (left + offset, right + offset)),
        );
        union.vertex_count += part.vertex_count;
    }
    union
}

/// `edge_count` uniformly random edges over `vertex_count` vertices, seeded
/// so failures reproduce. Duplicates are kept.
#[must_use]
pub fn random(vertex_count: usize, edge_count: usize, seed: u64) -> EdgeList {
    if vertex_count < 2 {
        return EdgeList::empty(vertex_count);
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(edge_count);
    while edges.len() < edge_count {
        let left = rng.gen_range(0..vertex_count);
        let right = rng.gen_range(0..vertex_count);
        if left != right {
            edges.push((left, right));
        }
    }
    EdgeList {
        vertex_count,
        edges,
    }
}

/// Shuffles vertex ids with a seeded permutation so component minima are no
/// longer aligned with generation order.
#[must_use]
pub fn relabelled(graph: &EdgeList, seed: u64) -> EdgeList {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut permutation: Vec<usize> = (0..graph.vertex_count).collect();
    for index in (1..permutation.len()).rev() {
        let other = rng.gen_range(0..=index);
        permutation.swap(index, other);
    }
    EdgeList {
        vertex_count: graph.vertex_count,
        edges: graph
            .edges
            .iter()
            .map(|&(left, right)| (permutation[left], permutation[right]))
            .collect(),
    }
}
