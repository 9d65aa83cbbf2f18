//! Scoring synthetic graphs against their seeds.

mod common;

use std::fs;

use common::{labelled_seed, path_seed, recorded};
use rstest::rstest;
use synthgraph_core::{
    AttachmentParams, Metric, PageRankConfig, SynthesizerBuilder, VeracityError,
    VeracityEvaluator,
};
use tempfile::TempDir;

fn grown(seed: &synthgraph_core::Graph) -> synthgraph_core::Graph {
    SynthesizerBuilder::new()
        .with_model(AttachmentParams::new(6, 10))
        .with_rng_seed(5)
        .build()
        .expect("valid configuration")
        .synthesize_from_seed(seed)
        .expect("synthesis succeeds")
}

#[rstest]
fn every_metric_scores_within_bounds() {
    let seed = labelled_seed();
    let synthetic = grown(&seed);
    let evaluator = VeracityEvaluator::new();
    for metric in Metric::ALL {
        let result = evaluator
            .evaluate(metric, &seed, &synthetic, false, false)
            .expect("evaluation succeeds");
        assert_eq!(result.metric(), metric);
        assert!((0.0..=1.0).contains(&result.score()), "{metric}: {}", result.score());
    }
}

#[rstest]
fn a_graph_scores_zero_against_itself() {
    let synthetic = grown(&path_seed(12));
    for name in ["degree", "inDegree", "outDegree", "pageRank"] {
        let result = VeracityEvaluator::new()
            .evaluate_named(name, &synthetic, &synthetic, false, false)
            .expect("evaluation succeeds");
        assert_eq!(result.score(), 0.0, "{name}");
    }
}

#[rstest]
fn unknown_metrics_fail_before_any_output() {
    let dir = TempDir::new().expect("temp dir");
    let seed = path_seed(4);
    let err = VeracityEvaluator::new()
        .with_output_dir(dir.path())
        .evaluate_named("betweenness", &seed, &seed, true, false)
        .expect_err("unknown metric");
    assert_eq!(err.code().as_str(), "VERACITY_UNKNOWN_METRIC");
    assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 0);
}

#[rstest]
fn saved_distributions_cover_each_graph() {
    let dir = TempDir::new().expect("temp dir");
    let seed = path_seed(6);
    let synthetic = grown(&seed);
    VeracityEvaluator::new()
        .with_output_dir(dir.path())
        .evaluate(Metric::PageRank, &seed, &synthetic, true, false)
        .expect("evaluation succeeds");

    for (file, rows) in [
        ("pageRank_seed.csv", seed.vertex_count()),
        ("pageRank_synthetic.csv", synthetic.vertex_count()),
    ] {
        let text = fs::read_to_string(dir.path().join(file)).expect("csv written");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("vertex,value"));
        assert_eq!(lines.count(), rows, "{file}");
    }

    let err = VeracityEvaluator::new()
        .with_output_dir(dir.path())
        .evaluate(Metric::PageRank, &seed, &synthetic, true, false)
        .expect_err("outputs exist");
    assert!(matches!(err, VeracityError::OutputExists { .. }));
}

#[rstest]
fn custom_pagerank_settings_are_used() {
    let config = PageRankConfig::new(1e-6, 0.3, 500).expect("valid config");
    let evaluator = VeracityEvaluator::new()
        .with_pagerank(config)
        .with_retained_distributions(true);
    assert_eq!(evaluator.pagerank(), &config);

    let seed = path_seed(5);
    let result = evaluator
        .evaluate(Metric::PageRank, &seed, &seed, false, false)
        .expect("evaluation succeeds");
    let pair = result.distributions().expect("retained");
    let total: f64 = pair.seed.samples().iter().sum();
    assert!((total - 5.0).abs() < 1e-6, "{total}");
}

#[rstest]
fn evaluation_records_the_score_on_its_span() {
    let seed = path_seed(4);
    let star = synthgraph_core::Graph::from_edge_list(4, [(0, 1), (0, 2), (0, 3)])
        .expect("valid graph");
    let (result, layer) = recorded(|| {
        VeracityEvaluator::new().evaluate(Metric::OutDegree, &seed, &star, false, false)
    });
    let score = result.expect("evaluation succeeds").score();
    assert_eq!(score, 1.0);

    let span = layer.span_named("core.veracity.evaluate").expect("evaluation span");
    assert_eq!(span.field("metric"), Some("outDegree"));
    assert_eq!(span.field("seed_vertices"), Some("4"));
    assert_eq!(span.field("synthetic_vertices"), Some("4"));
    assert_eq!(span.field("score"), Some("1"));
    assert!(layer.has_message("metric evaluated"));
}

#[rstest]
fn large_graph_scores_zero_against_itself_on_many_threads() {
    let len = 200_000_u64;
    let graph = synthgraph_core::Graph::from_edge_list(
        len,
        (0..len / 2).map(|source| (source, (source * 7_919 + 13) % len)),
    )
    .expect("valid graph");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(8)
        .build()
        .expect("thread pool");
    let evaluator = VeracityEvaluator::new();
    for _ in 0..5 {
        let score = pool
            .install(|| evaluator.evaluate(Metric::PageRank, &graph, &graph.clone(), false, false))
            .expect("evaluation succeeds")
            .score();
        assert_eq!(score, 0.0);
    }
}
