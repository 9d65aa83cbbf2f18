//! Distribution extraction from a seed graph.

use std::{collections::BTreeMap, sync::Arc};

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::graph::{Graph, Properties, PropertyValue};

use super::{DistributionSet, Histogram};

type PropertyHistograms = BTreeMap<Arc<str>, Histogram<PropertyValue>>;

/// Controls which distributions [`extract`] computes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionConfig {
    track_properties: bool,
}

impl ExtractionConfig {
    /// Returns a configuration that only extracts the degree histogram.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            track_properties: false,
        }
    }

    /// Enables or disables per-property histograms.
    #[must_use]
    pub const fn with_properties(mut self, track_properties: bool) -> Self {
        self.track_properties = track_properties;
        self
    }

    /// Returns whether per-property histograms are extracted.
    #[must_use]
    pub const fn track_properties(&self) -> bool {
        self.track_properties
    }
}

/// Computes the degree histogram and, when enabled, one histogram per
/// property key across vertices and across edges.
///
/// Isolated vertices populate degree bucket `0`. The result does not depend on
/// vertex or edge order.
///
/// # Examples
/// ```
/// use synthgraph_core::{ExtractionConfig, Graph, extract};
///
/// let graph = Graph::from_edge_list(4, [(0, 1), (0, 2)])?;
/// let distributions = extract(&graph, ExtractionConfig::new());
/// assert_eq!(distributions.degree().count(&2), 1);
/// assert_eq!(distributions.degree().count(&1), 2);
/// assert_eq!(distributions.degree().count(&0), 1);
/// # Ok::<(), synthgraph_core::GraphError>(())
/// ```
#[instrument(
    name = "core.extract",
    skip(graph),
    fields(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        track_properties = config.track_properties(),
    ),
)]
#[must_use]
pub fn extract(graph: &Graph, config: ExtractionConfig) -> DistributionSet {
    let degree = graph
        .degree_table()
        .total_degrees()
        .into_par_iter()
        .fold(Histogram::new, Histogram::with)
        .reduce(Histogram::new, Histogram::merge);

    let (vertex_properties, edge_properties) = if config.track_properties() {
        rayon::join(
            || property_histograms(graph.vertices().par_iter().map(|vertex| vertex.properties())),
            || property_histograms(graph.edges().par_iter().map(|edge| edge.properties())),
        )
    } else {
        (BTreeMap::new(), BTreeMap::new())
    };

    debug!(
        degree_buckets = degree.len(),
        vertex_keys = vertex_properties.len(),
        edge_keys = edge_properties.len(),
        "distributions extracted"
    );

    DistributionSet {
        degree,
        vertex_properties,
        edge_properties,
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
    }
}

fn property_histograms<'a>(
    payloads: impl ParallelIterator<Item = &'a Properties>,
) -> PropertyHistograms {
    payloads
        .fold(PropertyHistograms::new, |mut histograms, properties| {
            for (key, value) in properties.iter() {
                let histogram = histograms.remove(key).unwrap_or_default();
                histograms.insert(Arc::clone(key), histogram.with(value.clone()));
            }
            histograms
        })
        .reduce(PropertyHistograms::new, merge_property_histograms)
}

fn merge_property_histograms(
    mut left: PropertyHistograms,
    right: PropertyHistograms,
) -> PropertyHistograms {
    for (key, histogram) in right {
        let merged = match left.remove(&key) {
            Some(existing) => existing.merge(histogram),
            None => histogram,
        };
        left.insert(key, merged);
    }
    left
}
