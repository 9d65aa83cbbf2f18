//! Distribution extraction and veracity evaluation benchmarks.
//!
//! Scores a grown graph against its seed for every metric, and times
//! histogram extraction on its own.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use synthgraph_benches::{
    error::BenchSetupError,
    params::GraphBenchParams,
    source::{SyntheticSeedConfig, synthetic_seed},
};
use synthgraph_core::{
    AttachmentParams, ExtractionConfig, Metric, SynthesizerBuilder, VeracityEvaluator, extract,
};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Seed graph sizes to benchmark.
const VERTEX_COUNTS: &[usize] = &[1_000, 10_000];

/// Vertices added per round when growing the synthetic graph.
const GROWTH_PER_ROUND: usize = 100;

fn veracity_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("veracity");
    group.sample_size(20);
    let evaluator = VeracityEvaluator::new();

    for &vertex_count in VERTEX_COUNTS {
        let seed = synthetic_seed(&SyntheticSeedConfig {
            vertex_count,
            edges_per_vertex: 3,
            seed: SEED,
        })?;
        let synthetic = SynthesizerBuilder::new()
            .with_model(AttachmentParams::new(10, GROWTH_PER_ROUND))
            .with_rng_seed(SEED)
            .build()?
            .synthesize_from_seed(&seed)?;

        for metric in Metric::ALL {
            group.bench_with_input(
                BenchmarkId::new(metric.as_str(), GraphBenchParams { vertex_count }),
                &(&seed, &synthetic),
                |b, &(seed, synthetic)| {
                    b.iter(|| {
                        if let Err(err) = evaluator.evaluate(metric, seed, synthetic, false, false) {
                            panic!("veracity evaluation failed during benchmark: {err}");
                        }
                    });
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn extraction_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("extract");
    group.sample_size(20);

    for &vertex_count in VERTEX_COUNTS {
        let seed = synthetic_seed(&SyntheticSeedConfig {
            vertex_count,
            edges_per_vertex: 3,
            seed: SEED,
        })?;
        group.bench_with_input(
            BenchmarkId::from_parameter(GraphBenchParams { vertex_count }),
            &seed,
            |b, seed| {
                b.iter(|| extract(seed, ExtractionConfig::new().with_properties(true)));
            },
        );
    }

    group.finish();
    Ok(())
}

fn veracity(c: &mut Criterion) {
    if let Err(err) = veracity_impl(c) {
        panic!("veracity benchmark setup failed: {err}");
    }
}

fn extraction(c: &mut Criterion) {
    if let Err(err) = extraction_impl(c) {
        panic!("extraction benchmark setup failed: {err}");
    }
}

criterion_group!(benches, veracity, extraction);
criterion_main!(benches);
