//! PageRank by pull-based power iteration.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{error::VeracityError, graph::Graph};

/// Power-iteration settings.
///
/// # Examples
/// ```
/// use synthgraph_core::PageRankConfig;
///
/// let config = PageRankConfig::default();
/// assert_eq!(config.tolerance(), 0.001);
/// assert_eq!(config.reset_probability(), 0.15);
/// assert!(PageRankConfig::new(0.0, 0.15, 100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    tolerance: f64,
    reset_probability: f64,
    max_iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            reset_probability: 0.15,
            max_iterations: 100,
        }
    }
}

impl PageRankConfig {
    /// Validates and builds a configuration.
    ///
    /// # Errors
    /// Returns [`VeracityError::InvalidParameter`] unless `tolerance` is
    /// positive and finite, `reset_probability` lies in `(0, 1]` and
    /// `max_iterations` is positive.
    pub fn new(
        tolerance: f64,
        reset_probability: f64,
        max_iterations: usize,
    ) -> Result<Self, VeracityError> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(VeracityError::InvalidParameter {
                parameter: "tolerance",
                reason: format!("must be positive and finite, got {tolerance}"),
            });
        }
        if !(reset_probability > 0.0 && reset_probability <= 1.0) {
            return Err(VeracityError::InvalidParameter {
                parameter: "reset_probability",
                reason: format!("must lie in (0, 1], got {reset_probability}"),
            });
        }
        if max_iterations == 0 {
            return Err(VeracityError::InvalidParameter {
                parameter: "max_iterations",
                reason: "must be positive".to_owned(),
            });
        }
        Ok(Self {
            tolerance,
            reset_probability,
            max_iterations,
        })
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn tolerance(&self) -> f64 { self.tolerance }

    #[rustfmt::skip]
    #[must_use]
    pub fn reset_probability(&self) -> f64 { self.reset_probability }

    #[rustfmt::skip]
    #[must_use]
    pub fn max_iterations(&self) -> usize { self.max_iterations }
}

/// Incoming adjacency in compressed sparse row form.
struct InboundCsr {
    offsets: Vec<usize>,
    sources: Vec<usize>,
    out_degree: Vec<u64>,
}

impl InboundCsr {
    fn build(graph: &Graph) -> Self {
        let len = graph.vertex_count();
        let degrees = graph.degree_table();
        let mut offsets = Vec::with_capacity(len + 1);
        offsets.push(0);
        let mut running = 0;
        for &inbound in degrees.in_degrees() {
            running += usize::try_from(inbound).unwrap_or(usize::MAX);
            offsets.push(running);
        }
        let mut cursor = offsets.clone();
        let mut sources = vec![0; running];
        for edge in graph.edges() {
            let (Some(source), Some(target)) =
                (graph.position(edge.source()), graph.position(edge.target()))
            else {
                continue;
            };
            sources[cursor[target]] = source;
            cursor[target] += 1;
        }
        Self {
            offsets,
            sources,
            out_degree: degrees.out_degrees().to_vec(),
        }
    }

    fn inbound(&self, target: usize) -> &[usize] {
        &self.sources[self.offsets[target]..self.offsets[target + 1]]
    }
}

/// Returns one rank per vertex in graph order, scaled so the ranks average
/// `1.0`.
///
/// Dangling vertices spread their mass uniformly. Iteration stops when no
/// scaled rank moves by `tolerance` or more, or after `max_iterations`.
#[expect(clippy::cast_precision_loss, reason = "vertex and edge counts become rank weights")]
pub(crate) fn page_rank(graph: &Graph, config: &PageRankConfig) -> Vec<f64> {
    let len = graph.vertex_count();
    if len == 0 {
        return Vec::new();
    }
    let csr = InboundCsr::build(graph);
    let n = len as f64;
    let damping = 1.0 - config.reset_probability();
    let teleport = config.reset_probability() / n;
    let mut ranks = vec![1.0 / n; len];

    for iteration in 1..=config.max_iterations() {
        // Summed in vertex order so equal graphs get bit-identical ranks.
        let dangling: f64 = ranks
            .iter()
            .zip(&csr.out_degree)
            .filter(|&(_, &out)| out == 0)
            .map(|(rank, _)| rank)
            .sum();
        let shares: Vec<f64> = ranks
            .par_iter()
            .zip(&csr.out_degree)
            .map(|(rank, &out)| if out == 0 { 0.0 } else { rank / out as f64 })
            .collect();
        let next: Vec<f64> = (0..len)
            .into_par_iter()
            .map(|target| {
                let inflow: f64 = csr.inbound(target).iter().map(|&source| shares[source]).sum();
                teleport + damping * (inflow + dangling / n)
            })
            .collect();
        let change = next
            .par_iter()
            .zip(&ranks)
            .map(|(new, old)| (new - old).abs() * n)
            .reduce(|| 0.0, f64::max);
        ranks = next;
        if change < config.tolerance() {
            debug!(iteration, change, "pagerank converged");
            return ranks.into_iter().map(|rank| rank * n).collect();
        }
    }
    warn!(
        max_iterations = config.max_iterations(),
        "pagerank stopped at the iteration cap"
    );
    ranks.into_iter().map(|rank| rank * n).collect()
}
