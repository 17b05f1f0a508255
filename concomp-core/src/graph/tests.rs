//! Unit tests for graph construction.

use rstest::rstest;

use super::{Edge, Graph};
use crate::error::{GraphError, GraphErrorCode, InvalidEdgeReason};

#[rstest]
#[case::self_loop(3, (1, 1), InvalidEdgeReason::SelfLoop)]
#[case::source_out_of_range(3, (3, 0), InvalidEdgeReason::OutOfRange)]
#[case::target_out_of_range(3, (0, 7), InvalidEdgeReason::OutOfRange)]
#[case::self_loop_out_of_range(3, (5, 5), InvalidEdgeReason::OutOfRange)]
#[case::empty_graph(0, (0, 1), InvalidEdgeReason::OutOfRange)]
fn add_edge_rejects_invalid_edges(
    #[case] vertex_count: usize,
    #[case] edge: (usize, usize),
    #[case] expected: InvalidEdgeReason,
) {
    let mut graph = Graph::new(vertex_count);
    let err = graph
        .add_edge(edge.0, edge.1)
        .expect_err("invalid edge must be rejected");
    assert_eq!(
        err,
        GraphError::InvalidEdge {
            left: edge.0,
            right: edge.1,
            vertex_count,
            reason: expected,
        }
    );
    assert_eq!(err.code(), GraphErrorCode::InvalidEdge);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn try_from_edges_keeps_order_and_duplicates() {
    let graph = Graph::try_from_edges(4, [(0, 1), (3, 2), (0, 1)]).expect("edges are valid");
    assert_eq!(graph.vertex_count(), 4);
    assert_eq!(
        graph.edges(),
        &[
            Edge::new_unchecked(0, 1),
            Edge::new_unchecked(3, 2),
            Edge::new_unchecked(0, 1),
        ]
    );
}

#[test]
fn try_from_edges_stops_at_first_invalid_edge() {
    let err = Graph::try_from_edges(4, [(0, 1), (2, 2), (9, 1)]).expect_err("self-loop first");
    assert!(matches!(
        err,
        GraphError::InvalidEdge {
            reason: InvalidEdgeReason::SelfLoop,
            left: 2,
            right: 2,
            ..
        }
    ));
}

#[rstest]
#[case((4, 1), (4, 1))]
#[case((1, 4), (4, 1))]
fn ordered_puts_larger_endpoint_first(#[case] edge: (usize, usize), #[case] expected: (usize, usize)) {
    assert_eq!(Edge::new_unchecked(edge.0, edge.1).ordered(), expected);
}

#[test]
fn empty_graph_has_no_vertices() {
    let graph = Graph::default();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}
