//! Benchmark parameter types.
//!
//! Each type renders as the Criterion parameter label of one benchmark case.

use std::fmt;

use synthgraph_core::KroneckerSampling;

/// Parameters for a preferential-attachment benchmark run.
#[derive(Clone, Debug)]
pub struct AttachmentBenchParams {
    /// Vertices in the seed graph.
    pub seed_vertices: usize,
    /// Growth rounds.
    pub iterations: usize,
    /// Vertices added per round.
    pub nodes_per_iteration: usize,
}

impl fmt::Display for AttachmentBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seed={},rounds={},per_round={}",
            self.seed_vertices, self.iterations, self.nodes_per_iteration
        )
    }
}

/// Parameters for a Kronecker expansion benchmark run.
#[derive(Clone, Debug)]
pub struct KroneckerBenchParams {
    /// Expansion depth.
    pub depth: u32,
    /// Candidate edge sampling strategy.
    pub sampling: KroneckerSampling,
}

impl fmt::Display for KroneckerBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d={},{}", self.depth, self.sampling.as_str())
    }
}

/// Parameters for a benchmark over one graph size.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Vertices in the benchmarked graph.
    pub vertex_count: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.vertex_count)
    }
}
