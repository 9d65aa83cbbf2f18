//! Property payload sampling for generated vertices and edges.

use std::{collections::BTreeMap, sync::Arc};

use rand::Rng;

use crate::{
    distribution::{Distribution, DistributionSet, Histogram},
    graph::{Properties, PropertyValue},
};

type Samplers = Vec<(Arc<str>, Distribution<PropertyValue>)>;

/// Draws each property key independently from the seed's histogram for that
/// key. A disabled sampler yields empty payloads.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropertySampler {
    vertex: Samplers,
    edge: Samplers,
}

impl PropertySampler {
    pub(crate) fn new(distributions: &DistributionSet, enabled: bool) -> Self {
        if !enabled {
            return Self::default();
        }
        Self {
            vertex: samplers(distributions.vertex_properties()),
            edge: samplers(distributions.edge_properties()),
        }
    }

    pub(crate) fn vertex<R: Rng + ?Sized>(&self, rng: &mut R) -> Properties {
        draw(&self.vertex, rng)
    }

    pub(crate) fn edge<R: Rng + ?Sized>(&self, rng: &mut R) -> Properties {
        draw(&self.edge, rng)
    }
}

fn samplers(histograms: &BTreeMap<Arc<str>, Histogram<PropertyValue>>) -> Samplers {
    histograms
        .iter()
        .filter_map(|(key, histogram)| {
            Distribution::from_histogram(histogram).map(|distribution| (Arc::clone(key), distribution))
        })
        .collect()
}

fn draw<R: Rng + ?Sized>(samplers: &Samplers, rng: &mut R) -> Properties {
    samplers
        .iter()
        .map(|(key, distribution)| (Arc::clone(key), distribution.sample(rng).clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        distribution::{ExtractionConfig, extract},
        graph::{Graph, Vertex, VertexId},
    };
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    fn labelled_seed() -> DistributionSet {
        let vertices = (0..4)
            .map(|raw| {
                Vertex::with_properties(
                    VertexId::new(raw),
                    Properties::new().with("kind", PropertyValue::text("host")),
                )
            })
            .collect();
        let graph = Graph::try_new(vertices, Vec::new()).expect("valid graph");
        extract(&graph, ExtractionConfig::new().with_properties(true))
    }

    #[rstest]
    fn disabled_sampler_yields_empty_payloads() {
        let sampler = PropertySampler::new(&labelled_seed(), false);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(sampler.vertex(&mut rng).is_empty());
        assert!(sampler.edge(&mut rng).is_empty());
    }

    #[rstest]
    fn enabled_sampler_draws_observed_values() {
        let sampler = PropertySampler::new(&labelled_seed(), true);
        let mut rng = SmallRng::seed_from_u64(1);
        let properties = sampler.vertex(&mut rng);
        assert_eq!(properties.get("kind"), Some(&PropertyValue::text("host")));
        assert!(sampler.edge(&mut rng).is_empty());
    }
}
