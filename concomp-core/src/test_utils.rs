//! Shared test utilities for `concomp-core`.

use concomp_test_support::{graphs::EdgeList, profile::ProptestRunProfile};
use proptest::test_runner::Config as ProptestConfig;

use crate::graph::Graph;

/// Builds a proptest configuration honouring `CONCOMP_PBT_CASES`.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}

/// Converts a generated edge list into a validated [`Graph`].
pub(crate) fn graph_of(list: &EdgeList) -> Graph {
    Graph::try_from_edges(list.vertex_count, list.edges.iter().copied())
        .expect("generated edge lists are valid")
}
