//! Trusted connected-components reference used to check the engine.

/// Returns, for every vertex, the minimum vertex id of its component.
///
/// Uses a plain union-find whose roots are always the smaller id, so the
/// result is directly comparable with a converged parent array.
///
/// # Examples
/// ```
/// use concomp_test_support::oracle::min_label_components;
///
/// let labels = min_label_components(5, &[(4, 2), (2, 3)]);
/// assert_eq!(labels, vec![0, 1, 2, 2, 2]);
/// ```
///
/// # Panics
/// Panics when an endpoint is not below `vertex_count`.
#[must_use]
pub fn min_label_components(vertex_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut root: Vec<usize> = (0..vertex_count).collect();
    for &(left, right) in edges {
        let left = find(&mut root, left);
        let right = find(&mut root, right);
        if left < right {
            root[right] = left;
        } else {
            root[left] = right;
        }
    }
    (0..vertex_count).map(|vertex| find(&mut root, vertex)).collect()
}

/// Counts the distinct components.
#[must_use]
pub fn component_count(vertex_count: usize, edges: &[(usize, usize)]) -> usize {
    min_label_components(vertex_count, edges)
        .iter()
        .enumerate()
        .filter(|(vertex, label)| vertex == *label)
        .count()
}

fn find(root: &mut [usize], vertex: usize) -> usize {
    let mut current = vertex;
    while root[current] != current {
        root[current] = root[root[current]];
        current = root[current];
    }
    current
}
