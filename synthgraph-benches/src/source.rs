//! Seeded synthetic inputs for benchmarks.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use synthgraph_core::{Edge, Graph, Properties, PropertyValue, SeedMatrix, Vertex, VertexId};

use crate::error::BenchSetupError;

const KINDS: [&str; 3] = ["host", "router", "switch"];
const PROTOCOLS: [&str; 2] = ["tcp", "udp"];

/// Configuration of a synthetic seed graph.
#[derive(Clone, Debug)]
pub struct SyntheticSeedConfig {
    /// Vertices in the graph.
    pub vertex_count: usize,
    /// Edges drawn from every vertex after the first.
    pub edges_per_vertex: usize,
    /// RNG seed.
    pub seed: u64,
}

/// Builds a labelled seed graph in which every vertex after the first links
/// to `edges_per_vertex` uniformly chosen earlier vertices.
///
/// Vertices carry a `kind` property and edges carry `bytes` and `proto`, so
/// property sampling has histograms to draw from.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `vertex_count` is zero.
///
/// # Examples
/// ```
/// use synthgraph_benches::source::{SyntheticSeedConfig, synthetic_seed};
///
/// let graph = synthetic_seed(&SyntheticSeedConfig {
///     vertex_count: 10,
///     edges_per_vertex: 2,
///     seed: 7,
/// })?;
/// assert_eq!(graph.edge_count(), 18);
/// # Ok::<(), synthgraph_benches::error::BenchSetupError>(())
/// ```
pub fn synthetic_seed(config: &SyntheticSeedConfig) -> Result<Graph, BenchSetupError> {
    if config.vertex_count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "vertex_count",
        });
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let vertices = (0..config.vertex_count)
        .map(|index| {
            let kind = KINDS.choose(&mut rng).copied().unwrap_or_default();
            Vertex::with_properties(
                VertexId::new(index as u64),
                Properties::new().with("kind", PropertyValue::text(kind)),
            )
        })
        .collect();

    let mut edges = Vec::with_capacity(
        config
            .vertex_count
            .saturating_sub(1)
            .saturating_mul(config.edges_per_vertex),
    );
    for source in 1..config.vertex_count {
        for _ in 0..config.edges_per_vertex {
            let target = rng.gen_range(0..source);
            let bytes = rng.gen_range(40..1_500);
            let proto = PROTOCOLS.choose(&mut rng).copied().unwrap_or_default();
            let properties = Properties::new()
                .with("bytes", PropertyValue::Int(bytes))
                .with("proto", PropertyValue::text(proto));
            edges.push(Edge::with_properties(
                VertexId::new(source as u64),
                VertexId::new(target as u64),
                properties,
            ));
        }
    }
    Ok(Graph::try_new(vertices, edges)?)
}

/// Returns the 2x2 core-periphery seed matrix used by the Kronecker
/// benchmarks.
///
/// # Errors
/// Returns [`BenchSetupError::SeedMatrix`] if the matrix is rejected.
pub fn benchmark_matrix() -> Result<SeedMatrix, BenchSetupError> {
    Ok(SeedMatrix::try_from_rows(vec![
        vec![0.9, 0.5],
        vec![0.5, 0.1],
    ])?)
}
