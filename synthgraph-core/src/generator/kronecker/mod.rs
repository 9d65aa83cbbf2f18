//! Recursive stochastic Kronecker expansion.
//!
//! A `k x k` seed matrix expanded to depth `d` describes a `k^d`-vertex graph
//! in which edge `(u, v)` exists with probability equal to the product of
//! the seed entries selected by the base-`k` digits of `u` and `v`. The dense
//! matrix is never built: rows are sampled by a digit-wise descent that skips
//! zero-probability prefixes.

mod matrix;

use std::collections::HashSet;

use rand::{Rng, rngs::SmallRng};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    distribution::DistributionSet,
    error::GenerationError,
    graph::{Edge, Graph, Vertex, VertexId},
    telemetry,
};

use super::{GenerationParams, GraphGenerator, ModelKind, PropertySampler, rng::stream_rng};

pub use self::matrix::SeedMatrix;

const VERTEX_PHASE: u64 = 0;
const ROW_PHASE: u64 = 1;
const PLACEMENT_PHASE: u64 = 2;
/// Extra batches drawn to replace collisions before giving up.
const MAX_REDRAW_BATCHES: usize = 16;

/// How candidate edges are sampled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KroneckerSampling {
    /// One Bernoulli trial per candidate edge, enumerated row by row.
    #[default]
    Exhaustive,
    /// `round(sum(P)^d)` independent placements with collisions redrawn.
    EdgePlacement,
}

impl KroneckerSampling {
    /// Returns the mode's stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::EdgePlacement => "edge-placement",
        }
    }
}

/// Parameters of the Kronecker model.
///
/// # Examples
/// ```
/// use synthgraph_core::{KroneckerParams, KroneckerSampling, SeedMatrix};
///
/// let matrix: SeedMatrix = "0.9 0.5\n0.5 0.1".parse()?;
/// let params = KroneckerParams::new(matrix, 3).with_sampling(KroneckerSampling::EdgePlacement);
/// assert_eq!(params.depth(), 3);
/// assert_eq!(params.vertex_count(), Some(8));
/// # Ok::<(), synthgraph_core::SeedMatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KroneckerParams {
    matrix: SeedMatrix,
    depth: u32,
    sampling: KroneckerSampling,
}

impl KroneckerParams {
    /// Expands `matrix` to `depth` levels with exhaustive sampling.
    #[must_use]
    pub fn new(matrix: SeedMatrix, depth: u32) -> Self {
        Self {
            matrix,
            depth,
            sampling: KroneckerSampling::default(),
        }
    }

    /// Selects the sampling mode.
    #[must_use]
    pub fn with_sampling(mut self, sampling: KroneckerSampling) -> Self {
        self.sampling = sampling;
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn matrix(&self) -> &SeedMatrix { &self.matrix }

    #[rustfmt::skip]
    #[must_use]
    pub fn depth(&self) -> u32 { self.depth }

    #[rustfmt::skip]
    #[must_use]
    pub fn sampling(&self) -> KroneckerSampling { self.sampling }

    /// Returns `k^depth`, or `None` when it overflows `u64`.
    #[must_use]
    pub fn vertex_count(&self) -> Option<u64> {
        self.matrix.vertex_count(self.depth)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(GenerationError::invalid("depth", "must be positive"));
        }
        self.addressable_vertices().map(|_| ())
    }

    fn addressable_vertices(&self) -> Result<usize> {
        self.vertex_count()
            .and_then(|count| usize::try_from(count).ok())
            .ok_or(GenerationError::VertexSpaceOverflow {
                dimension: self.matrix.dimension(),
                depth: self.depth,
            })
    }
}

/// [`GraphGenerator`] implementing Kronecker expansion.
#[derive(Debug, Clone)]
pub struct KroneckerExpander {
    params: KroneckerParams,
    generation: GenerationParams,
}

impl KroneckerExpander {
    pub(crate) fn new(params: KroneckerParams, generation: GenerationParams) -> Self {
        Self { params, generation }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn params(&self) -> &KroneckerParams { &self.params }

    #[rustfmt::skip]
    #[must_use]
    pub fn generation(&self) -> &GenerationParams { &self.generation }

    fn row_edges(&self, source: u64, vertices: usize, sampler: &PropertySampler) -> Vec<Edge> {
        let mut rng = stream_rng(self.generation.rng_seed(), ROW_PHASE, source);
        let digits = source_digits(self.params.matrix.dimension(), self.params.depth, source);
        let mut targets = Vec::new();
        let mut descent = RowDescent {
            matrix: &self.params.matrix,
            digits: &digits,
            rng: &mut rng,
            targets: &mut targets,
        };
        descent.visit(0, 1.0, 0);
        debug_assert!(targets.iter().all(|&target| target < vertices as u64));
        let id = VertexId::new(source);
        targets
            .into_iter()
            .map(|target| Edge::with_properties(id, VertexId::new(target), sampler.edge(&mut rng)))
            .collect()
    }

    fn exhaustive_edges(&self, vertices: usize, sampler: &PropertySampler) -> Vec<Edge> {
        (0..vertices)
            .into_par_iter()
            .with_min_len(self.generation.chunk_len(vertices))
            .flat_map_iter(|source| self.row_edges(source as u64, vertices, sampler))
            .collect()
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "expected edge count is rounded and saturates"
    )]
    fn placement_edges(&self, vertices: usize, sampler: &PropertySampler) -> Vec<Edge> {
        let matrix = &self.params.matrix;
        let total = matrix.total();
        let expected = total.powi(i32::try_from(self.params.depth).unwrap_or(i32::MAX)).round() as u64;
        let capacity = (vertices as u128).saturating_mul(vertices as u128);
        let wanted = u128::from(expected).min(capacity) as u64;
        if wanted == 0 || total <= 0.0 {
            return Vec::new();
        }

        let mut cumulative = Vec::with_capacity(matrix.cells().len());
        let mut running = 0.0;
        for cell in matrix.cells() {
            running += cell;
            cumulative.push(running);
        }

        let mut seen: HashSet<(u64, u64)> = HashSet::new();
        let mut edges = Vec::new();
        let mut next_draw = 0_u64;
        for batch in 0..=MAX_REDRAW_BATCHES {
            let missing = wanted - edges.len() as u64;
            if missing == 0 {
                break;
            }
            if batch == MAX_REDRAW_BATCHES {
                warn!(wanted, placed = edges.len(), "edge placement stopped after repeated collisions");
                break;
            }
            let offset = next_draw;
            let placed: Vec<Edge> = (0..missing as usize)
                .into_par_iter()
                .map(|draw| {
                    let mut rng =
                        stream_rng(self.generation.rng_seed(), PLACEMENT_PHASE, offset + draw as u64);
                    let (source, target) = self.place(&cumulative, &mut rng);
                    Edge::with_properties(
                        VertexId::new(source),
                        VertexId::new(target),
                        sampler.edge(&mut rng),
                    )
                })
                .collect();
            next_draw += missing;
            edges.extend(
                placed
                    .into_iter()
                    .filter(|edge| seen.insert((edge.source().get(), edge.target().get()))),
            );
        }
        edges
    }

    fn place(&self, cumulative: &[f64], rng: &mut SmallRng) -> (u64, u64) {
        let dimension = self.params.matrix.dimension();
        let base = dimension as u64;
        let total = cumulative.last().copied().unwrap_or(0.0);
        let (mut source, mut target) = (0_u64, 0_u64);
        for _ in 0..self.params.depth {
            let draw = rng.gen_range(0.0..total);
            let cell = cumulative
                .partition_point(|&bound| bound <= draw)
                .min(cumulative.len() - 1);
            source = source * base + (cell / dimension) as u64;
            target = target * base + (cell % dimension) as u64;
        }
        (source, target)
    }
}

/// Base-`k` digits of `source`, most significant first.
fn source_digits(dimension: usize, depth: u32, source: u64) -> Vec<usize> {
    let base = dimension as u64;
    let mut digits = vec![0; depth as usize];
    let mut rest = source;
    for digit in digits.iter_mut().rev() {
        *digit = (rest % base) as usize;
        rest /= base;
    }
    digits
}

struct RowDescent<'a> {
    matrix: &'a SeedMatrix,
    digits: &'a [usize],
    rng: &'a mut SmallRng,
    targets: &'a mut Vec<u64>,
}

impl RowDescent<'_> {
    fn visit(&mut self, level: usize, probability: f64, prefix: u64) {
        let Some(&row) = self.digits.get(level) else {
            if self.rng.gen_bool(probability) {
                self.targets.push(prefix);
            }
            return;
        };
        let base = self.matrix.dimension() as u64;
        for column in 0..self.matrix.dimension() {
            let next = probability * self.matrix.get(row, column);
            if next > 0.0 {
                self.visit(level + 1, next, prefix * base + column as u64);
            }
        }
    }
}

impl GraphGenerator for KroneckerExpander {
    fn model(&self) -> ModelKind {
        ModelKind::Kronecker
    }

    #[instrument(
        name = "core.kronecker.expand",
        skip_all,
        fields(
            dimension = self.params.matrix.dimension(),
            depth = self.params.depth,
            sampling = self.params.sampling.as_str(),
        ),
    )]
    fn synthesize(
        &self,
        _seed: &Graph,
        distributions: &DistributionSet,
        generate_properties: bool,
    ) -> Result<Graph> {
        let vertices = self.params.addressable_vertices()?;
        let sampler = PropertySampler::new(distributions, generate_properties);
        let edges = match self.params.sampling {
            KroneckerSampling::Exhaustive => self.exhaustive_edges(vertices, &sampler),
            KroneckerSampling::EdgePlacement => self.placement_edges(vertices, &sampler),
        };
        if self.generation.is_cancelled() {
            warn!("generation cancelled before assembly");
            return Err(GenerationError::Cancelled {
                completed_rounds: 0,
            });
        }
        debug!(vertices, edges = edges.len(), "edges sampled");

        let rng_seed = self.generation.rng_seed();
        let vertex_list = (0..vertices)
            .into_par_iter()
            .with_min_len(self.generation.chunk_len(vertices))
            .map(|raw| {
                let raw = raw as u64;
                let mut rng = stream_rng(rng_seed, VERTEX_PHASE, raw);
                Vertex::with_properties(VertexId::new(raw), sampler.vertex(&mut rng))
            })
            .collect();
        telemetry::record_edges(edges.len());
        let graph = Graph::try_new(vertex_list, edges)?;
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "kronecker expansion complete"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests;
