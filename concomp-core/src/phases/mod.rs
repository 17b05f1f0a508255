//! The three contraction phases with sequential reference semantics.
//!
//! The parallel back-ends reuse these functions on sub-ranges or restate
//! them over atomics; they must agree with the versions here.
//!
//! # Examples
//! ```
//! use concomp_core::{Graph, phases};
//!
//! let graph = Graph::try_from_edges(4, [(0, 1), (1, 2), (2, 3)])?;
//! let mut parent: Vec<usize> = (0..4).collect();
//!
//! assert!(phases::direct_connect(&mut parent, graph.edges()));
//! assert_eq!(parent, [0, 0, 1, 2]);
//! assert!(phases::shortcut(&mut parent));
//! assert_eq!(parent, [0, 0, 0, 1]);
//! let edges = phases::alter(&parent, graph.edges());
//! assert_eq!(edges.len(), 1);
//! # Ok::<(), concomp_core::GraphError>(())
//! ```

use std::ops::Range;

use crate::graph::Edge;

/// Lowers `parent[hi]` to `lo` for every edge `{hi, lo}` with `hi > lo`.
///
/// Returns `true` iff at least one entry strictly decreased.
pub fn direct_connect(parent: &mut [usize], edges: &[Edge]) -> bool {
    let mut changed = false;
    for edge in edges {
        let (hi, lo) = edge.ordered();
        if lo < parent[hi] {
            parent[hi] = lo;
            changed = true;
        }
    }
    changed
}

/// Replaces every entry with its grandparent, read from a snapshot taken
/// before any entry is written.
///
/// Returns `true` iff any entry changed.
pub fn shortcut(parent: &mut [usize]) -> bool {
    let snapshot = parent.to_vec();
    let len = parent.len();
    shortcut_range(parent, &snapshot, 0..len)
}

/// Applies [`shortcut`] to `range` only, reading grandparents from
/// `snapshot`.
///
/// `snapshot` must be the full pre-phase parent array; entries outside
/// `range` are left untouched.
pub fn shortcut_range(parent: &mut [usize], snapshot: &[usize], range: Range<usize>) -> bool {
    let mut changed = false;
    for (slot, &current) in parent[range.clone()].iter_mut().zip(&snapshot[range]) {
        let grandparent = snapshot[current];
        if *slot != grandparent {
            *slot = grandparent;
            changed = true;
        }
    }
    changed
}

/// Rewrites each edge in terms of representatives, dropping those whose
/// endpoints now share one.
#[must_use]
pub fn alter(parent: &[usize], edges: &[Edge]) -> Vec<Edge> {
    edges
        .iter()
        .filter_map(|edge| relabel(*edge, |vertex| parent[vertex]))
        .collect()
}

/// Maps both endpoints through `lookup`, returning `None` for a collapsed
/// edge.
pub(crate) fn relabel(edge: Edge, lookup: impl Fn(usize) -> usize) -> Option<Edge> {
    let source = lookup(edge.source());
    let target = lookup(edge.target());
    (source != target).then(|| Edge::new_unchecked(source, target))
}
