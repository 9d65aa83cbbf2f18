//! Veracity evaluation: how faithfully a synthetic graph reproduces a seed.
//!
//! Each [`Metric`] maps a graph to one value per vertex; the two samples are
//! compared with the two-sample Kolmogorov–Smirnov statistic, so a score of
//! `0.0` means identical distributions and `1.0` means disjoint ones.

mod distance;
mod pagerank;
mod report;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::{Span, field, info, instrument, warn};

use crate::{
    error::VeracityError,
    generator::CancellationToken,
    graph::{Graph, VertexId},
    telemetry,
};

pub use self::{distance::ks_statistic, pagerank::PageRankConfig};

/// Structural metric compared between seed and synthetic graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// In-degree plus out-degree.
    Degree,
    /// Number of incoming edges.
    InDegree,
    /// Number of outgoing edges.
    OutDegree,
    /// PageRank scaled by the vertex count.
    PageRank,
}

impl Metric {
    /// Every supported metric.
    pub const ALL: [Self; 4] = [Self::Degree, Self::InDegree, Self::OutDegree, Self::PageRank];

    /// Returns the metric's stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::InDegree => "inDegree",
            Self::OutDegree => "outDegree",
            Self::PageRank => "pageRank",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = VeracityError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == name)
            .ok_or_else(|| VeracityError::UnknownMetric {
                name: name.to_owned(),
            })
    }
}

/// Per-vertex metric values for one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDistribution {
    metric: Metric,
    values: Vec<(VertexId, f64)>,
}

impl MetricDistribution {
    /// Computes `metric` for every participating vertex of `graph`.
    ///
    /// Degree metrics skip vertices without a qualifying edge; PageRank
    /// covers every vertex.
    #[expect(clippy::cast_precision_loss, reason = "degree counts become samples")]
    #[must_use]
    pub fn compute(metric: Metric, graph: &Graph, pagerank: &PageRankConfig) -> Self {
        let ids = graph.vertices().iter().map(|vertex| vertex.id());
        let values = match metric {
            Metric::PageRank => ids.zip(pagerank::page_rank(graph, pagerank)).collect(),
            Metric::Degree | Metric::InDegree | Metric::OutDegree => {
                let table = graph.degree_table();
                let counts = match metric {
                    Metric::InDegree => table.in_degrees().to_vec(),
                    Metric::OutDegree => table.out_degrees().to_vec(),
                    _ => table.total_degrees(),
                };
                ids.zip(counts)
                    .filter(|&(_, count)| count > 0)
                    .map(|(id, count)| (id, count as f64))
                    .collect()
            }
        };
        Self { metric, values }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn metric(&self) -> Metric { self.metric }

    /// Returns `(vertex, value)` pairs in graph order.
    #[rustfmt::skip]
    #[must_use]
    pub fn values(&self) -> &[(VertexId, f64)] { &self.values }

    /// Returns the values without their vertices.
    #[must_use]
    pub fn samples(&self) -> Vec<f64> {
        self.values.iter().map(|&(_, value)| value).collect()
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.values.len() }

    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

/// Seed and synthetic distributions of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionPair {
    /// Values computed on the seed graph.
    pub seed: MetricDistribution,
    /// Values computed on the synthetic graph.
    pub synthetic: MetricDistribution,
}

/// Outcome of one metric evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct VeracityResult {
    metric: Metric,
    score: f64,
    distributions: Option<DistributionPair>,
}

impl VeracityResult {
    #[rustfmt::skip]
    #[must_use]
    pub fn metric(&self) -> Metric { self.metric }

    /// Kolmogorov–Smirnov distance in `[0, 1]`; `0.0` is a perfect match.
    #[rustfmt::skip]
    #[must_use]
    pub fn score(&self) -> f64 { self.score }

    /// Returns the raw distributions when the evaluator retains them.
    #[must_use]
    pub fn distributions(&self) -> Option<&DistributionPair> {
        self.distributions.as_ref()
    }
}

/// Scores seed/synthetic pairs and optionally writes the raw distributions.
///
/// # Examples
/// ```
/// use synthgraph_core::{Graph, Metric, VeracityEvaluator};
///
/// let seed = Graph::from_edge_list(4, [(0, 1), (0, 2), (0, 3)])?;
/// let evaluator = VeracityEvaluator::new();
/// let result = evaluator.evaluate(Metric::Degree, &seed, &seed, false, false)?;
/// assert_eq!(result.score(), 0.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VeracityEvaluator {
    pagerank: PageRankConfig,
    output_dir: Option<PathBuf>,
    retain_distributions: bool,
    cancellation: Option<CancellationToken>,
}

impl VeracityEvaluator {
    /// Creates an evaluator with default PageRank settings and no output
    /// directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the PageRank settings.
    #[must_use]
    pub fn with_pagerank(mut self, pagerank: PageRankConfig) -> Self {
        self.pagerank = pagerank;
        self
    }

    /// Sets the directory CSV output is written to.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Keeps both raw distributions in every [`VeracityResult`].
    #[must_use]
    pub fn with_retained_distributions(mut self, retain: bool) -> Self {
        self.retain_distributions = retain;
        self
    }

    /// Aborts evaluations once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn pagerank(&self) -> &PageRankConfig { &self.pagerank }

    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Scores `metric` between `seed` and `synthetic`.
    ///
    /// With `save_as_csv`, writes `<metric>_seed.csv` and
    /// `<metric>_synthetic.csv` into the output directory.
    ///
    /// # Errors
    /// Returns [`VeracityError::MissingOutputDirectory`] when saving without
    /// an output directory, [`VeracityError::OutputExists`] when an output
    /// file exists and `overwrite` is false (checked before anything is
    /// computed or written), [`VeracityError::Cancelled`] when the
    /// cancellation token fires before the score is aggregated, and
    /// [`VeracityError::Io`] when writing fails.
    #[instrument(
        name = "core.veracity.evaluate",
        skip(self, seed, synthetic),
        fields(
            metric = metric.as_str(),
            seed_vertices = seed.vertex_count(),
            synthetic_vertices = synthetic.vertex_count(),
            score = field::Empty,
        ),
    )]
    pub fn evaluate(
        &self,
        metric: Metric,
        seed: &Graph,
        synthetic: &Graph,
        save_as_csv: bool,
        overwrite: bool,
    ) -> Result<VeracityResult, VeracityError> {
        let outputs = if save_as_csv {
            let dir = self
                .output_dir
                .as_deref()
                .ok_or(VeracityError::MissingOutputDirectory)?;
            let paths = report::output_paths(dir, metric);
            report::ensure_writable(&paths, overwrite)?;
            Some(paths)
        } else {
            None
        };

        let (seed_values, synthetic_values) = rayon::join(
            || MetricDistribution::compute(metric, seed, &self.pagerank),
            || MetricDistribution::compute(metric, synthetic, &self.pagerank),
        );
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            warn!("evaluation cancelled before aggregation");
            return Err(VeracityError::Cancelled {
                metric: metric.as_str(),
            });
        }
        let score = ks_statistic(&seed_values.samples(), &synthetic_values.samples());
        Span::current().record("score", score);

        if let Some([seed_path, synthetic_path]) = &outputs {
            report::write_distributions([
                (seed_path.as_path(), &seed_values),
                (synthetic_path.as_path(), &synthetic_values),
            ])?;
            info!(
                seed = %seed_path.display(),
                synthetic = %synthetic_path.display(),
                "distributions saved"
            );
        }
        telemetry::record_evaluation(metric.as_str());
        info!(score, "metric evaluated");

        Ok(VeracityResult {
            metric,
            score,
            distributions: self.retain_distributions.then(|| DistributionPair {
                seed: seed_values,
                synthetic: synthetic_values,
            }),
        })
    }

    /// Like [`Self::evaluate`], taking the metric by name (`degree`,
    /// `inDegree`, `outDegree` or `pageRank`).
    ///
    /// # Errors
    /// Returns [`VeracityError::UnknownMetric`] for any other name, before
    /// anything is computed, plus every error of [`Self::evaluate`].
    pub fn evaluate_named(
        &self,
        name: &str,
        seed: &Graph,
        synthetic: &Graph,
        save_as_csv: bool,
        overwrite: bool,
    ) -> Result<VeracityResult, VeracityError> {
        let metric: Metric = name.parse()?;
        self.evaluate(metric, seed, synthetic, save_as_csv, overwrite)
    }
}
