//! Per-round degree snapshot used for preferential target selection.

use rand::Rng;

use crate::graph::{Graph, VertexId};

/// Immutable view of the degrees at the start of a round.
///
/// Every new vertex of round `version` samples against the same snapshot, so
/// no worker observes edges produced by the round in flight. When every
/// existing vertex has degree zero the weights fall back to one per vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DegreeSnapshot {
    version: usize,
    ids: Vec<VertexId>,
    weights: Vec<u64>,
    cumulative: Vec<u64>,
    eligible: usize,
}

impl DegreeSnapshot {
    pub(crate) fn capture(graph: &Graph, version: usize) -> Self {
        let ids: Vec<VertexId> = graph.vertices().iter().map(|vertex| vertex.id()).collect();
        let degrees = graph.degree_table().total_degrees();
        let weights = if degrees.iter().all(|&degree| degree == 0) {
            vec![1; degrees.len()]
        } else {
            degrees
        };
        let mut running = 0_u64;
        let cumulative = weights
            .iter()
            .map(|weight| {
                running += weight;
                running
            })
            .collect();
        let eligible = weights.iter().filter(|&&weight| weight > 0).count();
        Self {
            version,
            ids,
            weights,
            cumulative,
            eligible,
        }
    }

    /// Round the snapshot was captured for.
    #[rustfmt::skip]
    pub(crate) fn version(&self) -> usize { self.version }

    /// Number of vertices that can be chosen as targets.
    #[rustfmt::skip]
    pub(crate) fn eligible(&self) -> usize { self.eligible }

    fn total(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    fn lower_bound(&self, index: usize) -> u64 {
        self.cumulative[index] - self.weights[index]
    }

    /// Picks up to `wanted` distinct targets, each draw weighted by degree
    /// among the vertices not yet picked.
    pub(crate) fn sample_targets<R: Rng + ?Sized>(&self, wanted: usize, rng: &mut R) -> Vec<VertexId> {
        let wanted = wanted.min(self.eligible);
        let total = self.total();
        let mut picked: Vec<usize> = Vec::with_capacity(wanted);
        let mut targets = Vec::with_capacity(wanted);
        let mut excluded_weight = 0_u64;

        for _ in 0..wanted {
            let mut draw = rng.gen_range(0..total - excluded_weight);
            // `picked` is sorted, so each shift moves past one removed interval.
            for &index in &picked {
                if draw >= self.lower_bound(index) {
                    draw += self.weights[index];
                } else {
                    break;
                }
            }
            let index = self.cumulative.partition_point(|&bound| bound <= draw);
            let slot = picked.partition_point(|&existing| existing < index);
            picked.insert(slot, index);
            excluded_weight += self.weights[index];
            targets.push(self.ids[index]);
        }
        targets
    }
}
