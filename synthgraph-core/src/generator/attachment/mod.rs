//! Barabási–Albert preferential-attachment grower.
//!
//! The grower runs a fixed number of rounds. Each round captures a
//! [`DegreeSnapshot`] of the current graph, lets every new vertex of the round
//! pick its targets against that snapshot in parallel, and applies the whole
//! round at the barrier to produce the next graph value.

mod snapshot;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    distribution::DistributionSet,
    error::{GenerationError, StoreError},
    graph::{Edge, Graph, Vertex, VertexId},
    telemetry,
};

use super::{
    CheckpointConfig, GenerationParams, GraphGenerator, ModelKind, PropertySampler, rng::stream_rng,
};

pub(crate) use self::snapshot::DegreeSnapshot;

/// Parameters of the preferential-attachment model.
///
/// # Examples
/// ```
/// use synthgraph_core::AttachmentParams;
///
/// let params = AttachmentParams::new(2, 5).with_edges_per_vertex(3);
/// assert_eq!(params.iterations(), 2);
/// assert_eq!(params.nodes_per_iteration(), 5);
/// assert_eq!(params.edges_per_vertex(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentParams {
    iterations: usize,
    nodes_per_iteration: usize,
    edges_per_vertex: Option<usize>,
}

impl AttachmentParams {
    /// Grows for `iterations` rounds of `nodes_per_iteration` new vertices.
    #[must_use]
    pub const fn new(iterations: usize, nodes_per_iteration: usize) -> Self {
        Self {
            iterations,
            nodes_per_iteration,
            edges_per_vertex: None,
        }
    }

    /// Fixes the number of out-edges per new vertex instead of deriving it
    /// from the seed's average degree.
    #[must_use]
    pub const fn with_edges_per_vertex(mut self, edges: usize) -> Self {
        self.edges_per_vertex = Some(edges);
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub const fn iterations(&self) -> usize { self.iterations }

    #[rustfmt::skip]
    #[must_use]
    pub const fn nodes_per_iteration(&self) -> usize { self.nodes_per_iteration }

    #[rustfmt::skip]
    #[must_use]
    pub const fn edges_per_vertex(&self) -> Option<usize> { self.edges_per_vertex }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(GenerationError::invalid("iterations", "must be positive"));
        }
        if self.nodes_per_iteration == 0 {
            return Err(GenerationError::invalid(
                "nodes_per_iteration",
                "must be positive",
            ));
        }
        if self.edges_per_vertex == Some(0) {
            return Err(GenerationError::invalid(
                "edges_per_vertex",
                "must be positive when set",
            ));
        }
        Ok(())
    }

    /// Out-edges per new vertex: the explicit value, or the seed's average
    /// out-degree rounded to the nearest integer and at least one.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the rounded average is a small non-negative count"
    )]
    #[must_use]
    pub fn fan_out(&self, distributions: &DistributionSet) -> usize {
        self.edges_per_vertex
            .unwrap_or_else(|| (distributions.average_out_degree().round() as usize).max(1))
    }
}

#[derive(Debug)]
enum GrowthState {
    Init,
    Growing { graph: Graph, completed: usize },
    Done(Graph),
}

/// [`GraphGenerator`] implementing preferential attachment.
#[derive(Debug, Clone)]
pub struct AttachmentGrower {
    params: AttachmentParams,
    generation: GenerationParams,
}

impl AttachmentGrower {
    pub(crate) fn new(params: AttachmentParams, generation: GenerationParams) -> Self {
        Self { params, generation }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn params(&self) -> &AttachmentParams { &self.params }

    #[rustfmt::skip]
    #[must_use]
    pub fn generation(&self) -> &GenerationParams { &self.generation }

    fn start(&self, seed: &Graph) -> Result<(Graph, usize)> {
        let Some(checkpoint) = self.generation.checkpoint().filter(|config| config.resume()) else {
            return Ok((seed.clone(), 0));
        };
        let exists = checkpoint
            .store()
            .contains(checkpoint.name())
            .map_err(|error| checkpoint_error(checkpoint, error))?;
        if !exists {
            info!(checkpoint = checkpoint.name(), "no checkpoint found; starting from the seed");
            return Ok((seed.clone(), 0));
        }
        let graph = checkpoint
            .store()
            .load_graph(checkpoint.name())
            .map_err(|error| checkpoint_error(checkpoint, error))?;
        let completed = self.completed_rounds(seed, &graph, checkpoint)?;
        info!(
            checkpoint = checkpoint.name(),
            completed_rounds = completed,
            vertices = graph.vertex_count(),
            "resuming from checkpoint"
        );
        Ok((graph, completed))
    }

    fn completed_rounds(
        &self,
        seed: &Graph,
        restored: &Graph,
        checkpoint: &CheckpointConfig,
    ) -> Result<usize> {
        let per_round = self.params.nodes_per_iteration;
        let completed = restored
            .vertex_count()
            .checked_sub(seed.vertex_count())
            .filter(|added| added % per_round == 0)
            .map(|added| added / per_round)
            .filter(|&rounds| rounds <= self.params.iterations)
            .ok_or_else(|| GenerationError::CheckpointMismatch {
                name: checkpoint.shared_name(),
                vertices: restored.vertex_count(),
                seed_vertices: seed.vertex_count(),
                nodes_per_iteration: per_round,
                iterations: self.params.iterations,
            })?;
        let foreign = seed
            .vertices()
            .iter()
            .zip(restored.vertices())
            .find(|(expected, found)| expected.id() != found.id());
        if let Some((expected, found)) = foreign {
            return Err(GenerationError::CheckpointSeedMismatch {
                name: checkpoint.shared_name(),
                expected: expected.id(),
                found: found.id(),
            });
        }
        Ok(completed)
    }

    #[instrument(
        name = "core.attachment.round",
        skip(self, graph, sampler),
        fields(vertices = graph.vertex_count(), edges = graph.edge_count()),
    )]
    fn grow_round(
        &self,
        graph: Graph,
        round: usize,
        fan_out: usize,
        sampler: &PropertySampler,
    ) -> Result<Graph> {
        let snapshot = DegreeSnapshot::capture(&graph, round);
        let per_round = self.params.nodes_per_iteration;
        let first = graph.next_vertex_id().get();
        if first.checked_add(per_round as u64).is_none() {
            return Err(GenerationError::invalid(
                "nodes_per_iteration",
                "vertex identifiers would overflow",
            ));
        }
        let rng_seed = self.generation.rng_seed();
        let round_key = round as u64;

        let additions: Vec<(Vertex, Vec<Edge>)> = (0..per_round)
            .into_par_iter()
            .with_min_len(self.generation.chunk_len(per_round))
            .map(|ordinal| {
                let ordinal = ordinal as u64;
                let mut rng = stream_rng(rng_seed, round_key, ordinal);
                let id = VertexId::new(first + ordinal);
                let vertex = Vertex::with_properties(id, sampler.vertex(&mut rng));
                let edges = snapshot
                    .sample_targets(fan_out, &mut rng)
                    .into_iter()
                    .map(|target| Edge::with_properties(id, target, sampler.edge(&mut rng)))
                    .collect();
                (vertex, edges)
            })
            .collect();

        let (vertices, edges): (Vec<Vertex>, Vec<Vec<Edge>>) = additions.into_iter().unzip();
        let edges: Vec<Edge> = edges.into_iter().flatten().collect();
        debug!(
            snapshot = snapshot.version(),
            eligible = snapshot.eligible(),
            new_edges = edges.len(),
            "round sampled"
        );
        telemetry::record_round(edges.len());
        Ok(graph.extended(vertices, edges)?)
    }

    fn save_checkpoint(&self, graph: &Graph, completed: usize) -> Result<()> {
        let Some(checkpoint) = self.generation.checkpoint() else {
            return Ok(());
        };
        let due = completed % checkpoint.interval() == 0 || completed == self.params.iterations;
        if !due {
            return Ok(());
        }
        checkpoint
            .store()
            .save_graph(graph, checkpoint.name(), true)
            .map_err(|error| checkpoint_error(checkpoint, error))?;
        info!(
            checkpoint = checkpoint.name(),
            completed_rounds = completed,
            vertices = graph.vertex_count(),
            "checkpoint saved"
        );
        Ok(())
    }
}

fn checkpoint_error(checkpoint: &CheckpointConfig, error: StoreError) -> GenerationError {
    GenerationError::Checkpoint {
        name: checkpoint.shared_name(),
        error,
    }
}

impl GraphGenerator for AttachmentGrower {
    fn model(&self) -> ModelKind {
        ModelKind::Attachment
    }

    fn synthesize(
        &self,
        seed: &Graph,
        distributions: &DistributionSet,
        generate_properties: bool,
    ) -> Result<Graph> {
        let fan_out = self.params.fan_out(distributions);
        let sampler = PropertySampler::new(distributions, generate_properties);
        let mut state = GrowthState::Init;
        loop {
            state = match state {
                GrowthState::Init => {
                    let (graph, completed) = self.start(seed)?;
                    GrowthState::Growing { graph, completed }
                }
                GrowthState::Growing { graph, completed } if completed >= self.params.iterations => {
                    GrowthState::Done(graph)
                }
                GrowthState::Growing { graph, completed } => {
                    if self.generation.is_cancelled() {
                        warn!(completed_rounds = completed, "generation cancelled");
                        return Err(GenerationError::Cancelled {
                            completed_rounds: completed,
                        });
                    }
                    let round = completed + 1;
                    let graph = self.grow_round(graph, round, fan_out, &sampler)?;
                    self.save_checkpoint(&graph, round)?;
                    GrowthState::Growing {
                        graph,
                        completed: round,
                    }
                }
                GrowthState::Done(graph) => {
                    info!(
                        vertices = graph.vertex_count(),
                        edges = graph.edge_count(),
                        "attachment growth complete"
                    );
                    return Ok(graph);
                }
            };
        }
    }
}
