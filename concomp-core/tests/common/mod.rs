use concomp_core::{ExecutionMode, Graph};
use concomp_test_support::{graphs::EdgeList, profile::ProptestRunProfile};
use proptest::test_runner::Config as ProptestConfig;

/// Every back-end paired with a parallelism degree worth exercising.
pub const MODES: [(ExecutionMode, usize); 6] = [
    (ExecutionMode::Sequential, 1),
    (ExecutionMode::SharedMemory, 1),
    (ExecutionMode::SharedMemory, 4),
    (ExecutionMode::Distributed, 1),
    (ExecutionMode::Distributed, 3),
    (ExecutionMode::Distributed, 4),
];

#[must_use]
pub fn graph_of(list: &EdgeList) -> Graph {
    Graph::try_from_edges(list.vertex_count, list.edges.iter().copied())
        .expect("generated edge lists are valid")
}

#[must_use]
pub fn proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: ProptestRunProfile::load(default_cases).cases(),
        ..ProptestConfig::default()
    }
}
