//! The converged parent array handed back to callers.

use std::collections::BTreeMap;

/// Output of a converged run: one representative per vertex plus the number
/// of iterations the engine needed.
///
/// Every representative is the minimum vertex id of its component, so two
/// vertices are connected exactly when their representatives match.
///
/// # Examples
/// ```
/// use concomp_core::{ExecutionMode, Graph, run};
///
/// let graph = Graph::try_from_edges(4, [(1, 3)])?;
/// let components = run(graph, ExecutionMode::Sequential, 1)?;
/// assert_eq!(components.component_count(), 3);
/// assert!(components.is_connected(3, 1));
/// assert_eq!(components.groups(), vec![(0, vec![0]), (1, vec![1, 3]), (2, vec![2])]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Components {
    parents: Vec<usize>,
    iterations: usize,
}

impl Components {
    pub(crate) const fn new(parents: Vec<usize>, iterations: usize) -> Self {
        Self {
            parents,
            iterations,
        }
    }

    /// Returns the representative of every vertex, indexed by vertex id.
    #[must_use]
    #[rustfmt::skip]
    pub fn parents(&self) -> &[usize] { &self.parents }

    /// Consumes the result, returning the parent array.
    #[must_use]
    #[rustfmt::skip]
    pub fn into_parents(self) -> Vec<usize> { self.parents }

    /// Returns how many iterations ran, including the final unchanged one.
    #[must_use]
    #[rustfmt::skip]
    pub const fn iterations(&self) -> usize { self.iterations }

    /// Returns the number of vertices covered.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.parents.len() }

    /// Returns the representative of `vertex`, or `None` when out of range.
    #[must_use]
    pub fn representative(&self, vertex: usize) -> Option<usize> {
        self.parents.get(vertex).copied()
    }

    /// Returns `true` when both vertices exist and share a component.
    #[must_use]
    pub fn is_connected(&self, left: usize, right: usize) -> bool {
        match (self.representative(left), self.representative(right)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Counts the distinct components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.parents
            .iter()
            .enumerate()
            .filter(|(vertex, parent)| vertex == *parent)
            .count()
    }

    /// Groups vertices by representative, ordered by representative with
    /// members ascending.
    #[must_use]
    pub fn groups(&self) -> Vec<(usize, Vec<usize>)> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (vertex, &parent) in self.parents.iter().enumerate() {
            groups.entry(parent).or_default().push(vertex);
        }
        groups.into_iter().collect()
    }
}
