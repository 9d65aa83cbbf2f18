//! Shared test utilities for `synthgraph-core`.

use proptest::test_runner::Config as ProptestConfig;
use synthgraph_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::graph::Graph;

/// Builds a standard proptest configuration from the shared CI profile.
///
/// Keeps property suites aligned on the same `SYNTHGRAPH_PBT_CASES` and
/// `SYNTHGRAPH_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Directed path `0 -> 1 -> ... -> n-1`.
#[must_use]
pub(crate) fn path_graph(vertices: u64) -> Graph {
    Graph::from_edge_list(vertices, (1..vertices).map(|target| (target - 1, target)))
        .expect("path edges reference existing vertices")
}

/// Star with hub `0` pointing at every leaf `1..n`.
#[must_use]
pub(crate) fn star_graph(vertices: u64) -> Graph {
    Graph::from_edge_list(vertices, (1..vertices).map(|leaf| (0, leaf)))
        .expect("star edges reference existing vertices")
}
