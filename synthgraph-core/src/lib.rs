//! Synthgraph core library.
//!
//! Grows or expands synthetic property graphs from a seed graph and scores
//! how faithfully the result reproduces the seed's structure.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod distribution;
mod error;
mod generator;
mod graph;
mod store;
mod synthesizer;
mod telemetry;
mod veracity;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::SynthesizerBuilder,
    distribution::{Distribution, DistributionSet, ExtractionConfig, Histogram, extract},
    error::{
        CodecError, CodecErrorCode, GenerationError, GenerationErrorCode, GraphError,
        GraphErrorCode, Result, SeedMatrixError, SeedMatrixErrorCode, StoreError, StoreErrorCode,
        VeracityError, VeracityErrorCode,
    },
    generator::{
        AttachmentGrower, AttachmentParams, CancellationToken, CheckpointConfig,
        DEFAULT_RNG_SEED, GenerationModel, GenerationParams, GraphGenerator, KroneckerExpander,
        KroneckerParams, KroneckerSampling, ModelKind, SeedMatrix,
    },
    graph::{DegreeTable, Edge, Graph, Properties, PropertyValue, Vertex, VertexId},
    store::{GraphStore, MemoryGraphStore, validate_graph_name},
    synthesizer::Synthesizer,
    veracity::{
        DistributionPair, Metric, MetricDistribution, PageRankConfig, VeracityEvaluator,
        VeracityResult, ks_statistic,
    },
};
