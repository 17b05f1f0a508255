//! End-to-end scenarios run through every back-end.

mod common;

use common::{MODES, graph_of};
use concomp_core::{ExecutionMode, Graph, phases, run};
use concomp_test_support::graphs::{EdgeList, complete, cycle, disjoint_union, path, star};
use rstest::rstest;

fn all_modes(graph: &Graph) -> Vec<(ExecutionMode, usize, concomp_core::Components)> {
    MODES
        .iter()
        .map(|&(mode, parallelism)| {
            let components = run(graph.clone(), mode, parallelism)
                .unwrap_or_else(|err| panic!("{mode} x{parallelism} failed: {err}"));
            (mode, parallelism, components)
        })
        .collect()
}

#[test]
fn ten_vertex_scenario() {
    let graph = Graph::try_from_edges(10, [(0, 1), (1, 2), (2, 3), (5, 6), (6, 7), (8, 9)])
        .expect("scenario edges are valid");
    for (mode, parallelism, components) in all_modes(&graph) {
        assert_eq!(
            components.parents(),
            &[0, 0, 0, 0, 4, 5, 5, 5, 8, 8],
            "{mode} x{parallelism}"
        );
        assert_eq!(
            components.groups(),
            vec![
                (0, vec![0, 1, 2, 3]),
                (4, vec![4]),
                (5, vec![5, 6, 7]),
                (8, vec![8, 9]),
            ]
        );
    }
}

#[test]
fn empty_edge_list_takes_one_iteration() {
    let graph = Graph::new(5);
    for (mode, parallelism, components) in all_modes(&graph) {
        assert_eq!(components.parents(), &[0, 1, 2, 3, 4], "{mode} x{parallelism}");
        assert_eq!(components.iterations(), 1, "{mode} x{parallelism}");
    }
}

#[test]
fn star_converges_within_two_iterations() {
    let graph = graph_of(&star(6));
    for (mode, parallelism, components) in all_modes(&graph) {
        assert_eq!(components.parents(), &[0; 6], "{mode} x{parallelism}");
        assert!(components.iterations() <= 2, "{mode} x{parallelism}");
        assert_eq!(components.component_count(), 1);
    }
}

#[rstest]
#[case::path(path(17))]
#[case::reverse_path(path(17).reversed())]
#[case::cycle(cycle(12))]
#[case::complete(complete(8))]
#[case::forest(disjoint_union(&[path(3), EdgeList::empty(2), star(4), cycle(5)]))]
fn duplicate_edges_do_not_change_the_result(#[case] list: EdgeList) {
    let plain = all_modes(&graph_of(&list));
    let doubled = all_modes(&graph_of(&list.with_duplicates()));
    for ((mode, parallelism, left), (_, _, right)) in plain.into_iter().zip(doubled) {
        assert_eq!(left.parents(), right.parents(), "{mode} x{parallelism}");
    }
}

#[test]
fn self_loops_never_reach_the_engine() {
    let mut graph = Graph::new(3);
    graph.add_edge(0, 1).expect("valid edge");
    assert!(graph.add_edge(2, 2).is_err());
    let components = run(graph, ExecutionMode::Sequential, 1).expect("run succeeds");
    assert_eq!(components.parents(), &[0, 0, 2]);
}

#[test]
fn converged_state_is_a_fixed_point() {
    let graph = graph_of(&disjoint_union(&[cycle(6), path(4)]));
    let components = run(graph.clone(), ExecutionMode::Sequential, 1).expect("run succeeds");
    let mut parent = components.into_parents();
    let converged = parent.clone();

    let remaining = phases::alter(&parent, graph.edges());
    assert!(remaining.is_empty());
    assert!(!phases::direct_connect(&mut parent, graph.edges()));
    assert!(!phases::shortcut(&mut parent));
    assert_eq!(parent, converged);
    assert!(parent.iter().all(|&representative| parent[representative] == representative));
}
