//! Shared-memory back-end checks against the sequential phases.

use std::num::NonZeroUsize;

use concomp_test_support::{
    graphs::{EdgeList, complete, cycle, path, random, star},
    oracle::min_label_components,
};
use proptest::prelude::*;
use rstest::rstest;

use super::SharedMemory;
use crate::{
    engine::{Executor, drive},
    graph::Graph,
    phases,
    sequential::Sequential,
    test_utils::{graph_of, suite_proptest_config},
};

fn threads(count: usize) -> NonZeroUsize {
    NonZeroUsize::new(count).expect("thread count must be non-zero")
}

fn shared_parents(graph: Graph, count: usize) -> Vec<usize> {
    let (vertex_count, edges) = graph.into_parts();
    let executor = SharedMemory::new(vertex_count, threads(count)).expect("pool builds");
    drive(executor, edges, None)
        .expect("shared run converges")
        .into_parents()
}

#[rstest]
#[case::one_thread(1)]
#[case::two_threads(2)]
#[case::more_threads_than_edges(16)]
fn single_phase_matches_sequential(#[case] count: usize) {
    let graph = graph_of(&random(40, 60, 11));
    let mut shared = SharedMemory::new(graph.vertex_count(), threads(count)).expect("pool builds");
    let mut parent: Vec<usize> = (0..graph.vertex_count()).collect();

    let shared_changed = shared.direct_connect(graph.edges()).expect("phase runs");
    let sequential_changed = phases::direct_connect(&mut parent, graph.edges());
    assert_eq!(shared_changed, sequential_changed);

    let shared_changed = shared.shortcut().expect("phase runs");
    let sequential_changed = phases::shortcut(&mut parent);
    assert_eq!(shared_changed, sequential_changed);

    let mut shared_edges = shared.alter(graph.edges()).expect("phase runs");
    let mut sequential_edges = phases::alter(&parent, graph.edges());
    shared_edges.sort_unstable_by_key(|edge| (edge.source(), edge.target()));
    sequential_edges.sort_unstable_by_key(|edge| (edge.source(), edge.target()));
    assert_eq!(shared_edges, sequential_edges);
    assert_eq!(shared.into_parents(), parent);
}

#[rstest]
#[case::path(path(33))]
#[case::star(star(12))]
#[case::cycle(cycle(9))]
#[case::complete(complete(7))]
#[case::empty(EdgeList::empty(4))]
#[case::no_vertices(EdgeList::empty(0))]
fn converges_to_component_minima(#[case] list: EdgeList, #[values(1, 3, 8)] count: usize) {
    let expected = min_label_components(list.vertex_count, &list.edges);
    assert_eq!(shared_parents(graph_of(&list), count), expected);
}

#[test]
fn star_converges_in_two_iterations() {
    let (vertex_count, edges) = graph_of(&star(6)).into_parts();
    let executor = SharedMemory::new(vertex_count, threads(4)).expect("pool builds");
    let components = drive(executor, edges, None).expect("run converges");
    assert_eq!(components.parents(), &[0; 6]);
    assert_eq!(components.iterations(), 2);
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn agrees_with_sequential_for_any_thread_count(
        vertex_count in 1usize..48,
        edge_count in 0usize..96,
        seed in any::<u64>(),
        count in 1usize..9,
    ) {
        let list = random(vertex_count, edge_count, seed);
        let (vertices, edges) = graph_of(&list).into_parts();
        let sequential = drive(Sequential::new(vertices), edges, None)
            .expect("sequential run converges")
            .into_parents();
        prop_assert_eq!(shared_parents(graph_of(&list), count), sequential);
    }
}
