//! Tests for Kronecker expansion.

use std::num::NonZeroUsize;

use proptest::prelude::*;
use rstest::{fixture, rstest};

use super::*;
use crate::{
    distribution::DistributionSet,
    generator::{CancellationToken, DEFAULT_RNG_SEED},
    test_utils::suite_proptest_config,
};

#[fixture]
fn network_matrix() -> SeedMatrix {
    SeedMatrix::try_from_rows(vec![vec![0.9, 0.5], vec![0.5, 0.1]]).expect("valid matrix")
}

fn generation(partitions: usize, rng_seed: u64) -> GenerationParams {
    GenerationParams::new(
        NonZeroUsize::new(partitions).expect("non-zero partitions"),
        rng_seed,
        None,
        None,
    )
}

fn expand(params: KroneckerParams, generation: GenerationParams) -> Result<Graph> {
    KroneckerExpander::new(params, generation).synthesize(
        &Graph::empty(),
        &DistributionSet::default(),
        false,
    )
}

/// Dense Kronecker power of `matrix`, built by repeated products.
fn dense_power(matrix: &SeedMatrix, depth: u32) -> Vec<Vec<f64>> {
    let k = matrix.dimension();
    let mut dense = vec![vec![1.0]];
    for _ in 0..depth {
        let size = dense.len();
        let mut next = vec![vec![0.0; size * k]; size * k];
        for (row, values) in dense.iter().enumerate() {
            for (column, value) in values.iter().enumerate() {
                for i in 0..k {
                    for j in 0..k {
                        next[row * k + i][column * k + j] = value * matrix.get(i, j);
                    }
                }
            }
        }
        dense = next;
    }
    dense
}

#[rstest]
fn digit_probabilities_match_the_dense_product(network_matrix: SeedMatrix) {
    let dense = dense_power(&network_matrix, 3);
    assert_eq!(dense.len(), 8);
    for (source, row) in dense.iter().enumerate() {
        for (target, expected) in row.iter().enumerate() {
            let actual = network_matrix.edge_probability(3, source as u64, target as u64);
            assert!((actual - expected).abs() < 1e-12, "({source}, {target})");
        }
    }
}

#[rstest]
#[case::exhaustive(KroneckerSampling::Exhaustive)]
#[case::placement(KroneckerSampling::EdgePlacement)]
fn expansion_has_k_to_the_d_vertices(network_matrix: SeedMatrix, #[case] sampling: KroneckerSampling) {
    let graph = expand(
        KroneckerParams::new(network_matrix, 3).with_sampling(sampling),
        generation(2, DEFAULT_RNG_SEED),
    )
    .expect("expansion succeeds");
    assert_eq!(graph.vertex_count(), 8);
    let ids: Vec<u64> = graph.vertices().iter().map(|v| v.id().get()).collect();
    assert_eq!(ids, (0..8).collect::<Vec<_>>());
    assert!(graph.edges().iter().all(|edge| edge.source().get() < 8 && edge.target().get() < 8));
}

#[rstest]
fn zero_entries_never_produce_edges() {
    let matrix = SeedMatrix::try_from_rows(vec![vec![1.0, 0.0], vec![0.0, 0.0]]).expect("valid");
    let graph = expand(KroneckerParams::new(matrix, 4), generation(1, 3)).expect("expansion");
    // Only vertex 0 has all-zero digits.
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges()[0].source(), VertexId::new(0));
    assert_eq!(graph.edges()[0].target(), VertexId::new(0));
}

#[rstest]
fn certain_entries_produce_the_complete_graph() {
    let matrix = SeedMatrix::try_from_rows(vec![vec![1.0; 3]; 3]).expect("valid");
    let graph = expand(KroneckerParams::new(matrix, 2), generation(4, 3)).expect("expansion");
    assert_eq!(graph.vertex_count(), 9);
    assert_eq!(graph.edge_count(), 81);
}

#[rstest]
fn exhaustive_edge_count_tracks_the_expected_mass(network_matrix: SeedMatrix) {
    // sum(P)^d = 2^6 = 64 expected edges out of 4096 candidates.
    let graph = expand(KroneckerParams::new(network_matrix, 6), generation(4, 11)).expect("expansion");
    assert!((30..=110).contains(&graph.edge_count()), "edges = {}", graph.edge_count());
}

#[rstest]
fn edge_placement_draws_the_rounded_mass_without_duplicates(network_matrix: SeedMatrix) {
    let graph = expand(
        KroneckerParams::new(network_matrix, 6).with_sampling(KroneckerSampling::EdgePlacement),
        generation(4, 11),
    )
    .expect("expansion");
    assert_eq!(graph.edge_count(), 64);
    let unique: HashSet<(u64, u64)> = graph
        .edges()
        .iter()
        .map(|edge| (edge.source().get(), edge.target().get()))
        .collect();
    assert_eq!(unique.len(), 64);
}

#[rstest]
#[case::exhaustive(KroneckerSampling::Exhaustive)]
#[case::placement(KroneckerSampling::EdgePlacement)]
fn expansion_is_deterministic_across_partitions(
    network_matrix: SeedMatrix,
    #[case] sampling: KroneckerSampling,
) {
    let params = KroneckerParams::new(network_matrix, 5).with_sampling(sampling);
    let single = expand(params.clone(), generation(1, 42)).expect("expansion");
    let many = expand(params, generation(8, 42)).expect("expansion");
    assert_eq!(single, many);
}

#[rstest]
fn edges_concentrate_on_low_digit_identifiers(network_matrix: SeedMatrix) {
    let mut low = 0_usize;
    let mut high = 0_usize;
    let mut low_block = 0_usize;
    let mut high_block = 0_usize;
    for rng_seed in 0..200 {
        let graph = expand(KroneckerParams::new(network_matrix.clone(), 3), generation(2, rng_seed))
            .expect("expansion");
        for edge in graph.edges() {
            let (source, target) = (edge.source().get(), edge.target().get());
            match (source, target) {
                (0, 0 | 1) => low += 1,
                (7, 7) => high += 1,
                _ => {}
            }
            match (source < 4, target < 4) {
                (true, true) => low_block += 1,
                (false, false) => high_block += 1,
                _ => {}
            }
        }
    }
    // 0 -> 0 and 0 -> 1 appear with 0.729 and 0.405; 7 -> 7 with 0.001.
    assert!(low > 150, "low = {low}");
    assert!(high < 5, "high = {high}");
    assert!(low_block > 5 * high_block, "{low_block} vs {high_block}");
}

#[rstest]
fn validate_rejects_zero_depth(network_matrix: SeedMatrix) {
    let err = KroneckerParams::new(network_matrix, 0)
        .validate()
        .expect_err("zero depth rejected");
    assert_eq!(err.code().as_str(), "GENERATION_INVALID_PARAMETER");
}

#[rstest]
fn validate_rejects_overflowing_vertex_space(network_matrix: SeedMatrix) {
    let err = KroneckerParams::new(network_matrix, 64)
        .validate()
        .expect_err("overflow rejected");
    assert_eq!(
        err,
        GenerationError::VertexSpaceOverflow {
            dimension: 2,
            depth: 64,
        }
    );
}

#[rstest]
fn cancelled_expansion_returns_no_graph(network_matrix: SeedMatrix) {
    let token = CancellationToken::new();
    token.cancel();
    let generation = GenerationParams::new(
        NonZeroUsize::new(1).expect("non-zero"),
        DEFAULT_RNG_SEED,
        None,
        Some(token),
    );
    let err = expand(KroneckerParams::new(network_matrix, 2), generation)
        .expect_err("cancelled run fails");
    assert_eq!(err.code().as_str(), "GENERATION_CANCELLED");
}

fn matrix_strategy() -> impl Strategy<Value = SeedMatrix> {
    (1_usize..4).prop_flat_map(|k| {
        prop::collection::vec(prop::collection::vec(0.0_f64..=1.0, k), k).prop_map(|rows| {
            SeedMatrix::try_from_rows(rows).expect("generated entries are probabilities")
        })
    })
}

proptest! {
    #![proptest_config(suite_proptest_config(32))]

    #[test]
    fn identifiers_stay_inside_the_vertex_space(
        matrix in matrix_strategy(),
        depth in 1_u32..4,
        placement in any::<bool>(),
        rng_seed in any::<u64>(),
    ) {
        let sampling = if placement {
            KroneckerSampling::EdgePlacement
        } else {
            KroneckerSampling::Exhaustive
        };
        let bound = matrix.vertex_count(depth).expect("small expansion");
        let graph = expand(
            KroneckerParams::new(matrix, depth).with_sampling(sampling),
            generation(3, rng_seed),
        )
        .expect("expansion succeeds");
        prop_assert_eq!(graph.vertex_count() as u64, bound);
        for edge in graph.edges() {
            prop_assert!(edge.source().get() < bound);
            prop_assert!(edge.target().get() < bound);
        }
    }
}
