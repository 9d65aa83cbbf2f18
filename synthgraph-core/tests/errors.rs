use std::{error::Error as _, path::PathBuf, sync::Arc};

use rstest::rstest;
use synthgraph_core::{
    GenerationError, GenerationErrorCode, GraphError, GraphErrorCode, SeedMatrixError,
    SeedMatrixErrorCode, StoreError, StoreErrorCode, VeracityError, VeracityErrorCode, VertexId,
};

#[rstest]
#[case(GraphError::DuplicateVertex { id: VertexId::new(3) }, GraphErrorCode::DuplicateVertex)]
#[case(
    GraphError::DanglingEdge { index: 0, from: VertexId::new(1), to: VertexId::new(9) },
    GraphErrorCode::DanglingEdge,
)]
fn returns_expected_graph_code(#[case] error: GraphError, #[case] expected: GraphErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(
    StoreError::InvalidName { name: Arc::from(".hidden"), reason: "hidden" },
    "STORE_INVALID_NAME",
)]
#[case(
    StoreError::NotFound { store: Arc::from("memory"), name: Arc::from("g") },
    "STORE_NOT_FOUND",
)]
#[case(
    StoreError::AlreadyExists { store: Arc::from("text"), name: Arc::from("g") },
    "STORE_ALREADY_EXISTS",
)]
#[case(
    StoreError::Backend {
        store: Arc::from("parquet"),
        name: Arc::from("g"),
        message: Arc::from("disk full"),
    },
    "STORE_BACKEND_FAILURE",
)]
fn returns_expected_store_code(#[case] error: StoreError, #[case] expected: &str) {
    assert_eq!(error.code().as_str(), expected);
}

#[rstest]
#[case(SeedMatrixError::Empty, SeedMatrixErrorCode::Empty)]
#[case(
    SeedMatrixError::NotSquare { row: 1, expected: 2, actual: 3 },
    SeedMatrixErrorCode::NotSquare,
)]
#[case(
    SeedMatrixError::ProbabilityOutOfRange { row: 0, column: 0, value: 1.5 },
    SeedMatrixErrorCode::ProbabilityOutOfRange,
)]
#[case(
    SeedMatrixError::Parse { line: 2, token: "x".to_owned() },
    SeedMatrixErrorCode::Parse,
)]
#[case(
    SeedMatrixError::Io { path: PathBuf::from("m.txt"), message: Arc::from("missing") },
    SeedMatrixErrorCode::Io,
)]
fn returns_expected_seed_matrix_code(
    #[case] error: SeedMatrixError,
    #[case] expected: SeedMatrixErrorCode,
) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(
    GenerationError::SeedMatrix(SeedMatrixError::Empty),
    GenerationErrorCode::SeedMatrix,
    None,
)]
#[case(
    GenerationError::VertexSpaceOverflow { dimension: 2, depth: 64 },
    GenerationErrorCode::VertexSpaceOverflow,
    None,
)]
#[case(
    GenerationError::Graph(GraphError::DuplicateVertex { id: VertexId::new(0) }),
    GenerationErrorCode::Graph,
    None,
)]
#[case(
    GenerationError::Checkpoint {
        name: Arc::from("run"),
        error: StoreError::NotFound { store: Arc::from("memory"), name: Arc::from("run") },
    },
    GenerationErrorCode::Checkpoint,
    Some(StoreErrorCode::NotFound),
)]
#[case(
    GenerationError::CheckpointMismatch {
        name: Arc::from("run"),
        vertices: 7,
        seed_vertices: 5,
        nodes_per_iteration: 3,
        iterations: 2,
    },
    GenerationErrorCode::CheckpointMismatch,
    None,
)]
#[case(
    GenerationError::CheckpointSeedMismatch {
        name: Arc::from("run"),
        expected: VertexId::new(0),
        found: VertexId::new(9),
    },
    GenerationErrorCode::CheckpointSeedMismatch,
    None,
)]
#[case(
    GenerationError::Cancelled { completed_rounds: 4 },
    GenerationErrorCode::Cancelled,
    None,
)]
fn returns_expected_generation_code(
    #[case] error: GenerationError,
    #[case] expected: GenerationErrorCode,
    #[case] store: Option<StoreErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.store_code(), store);
}

#[rstest]
fn checkpoint_errors_expose_their_source() {
    let error = GenerationError::Checkpoint {
        name: Arc::from("run"),
        error: StoreError::Backend {
            store: Arc::from("text"),
            name: Arc::from("run"),
            message: Arc::from("permission denied"),
        },
    };
    let source = error.source().expect("store error is the source");
    assert!(source.to_string().contains("permission denied"));
}

#[rstest]
#[case(VeracityError::UnknownMetric { name: "closeness".to_owned() }, VeracityErrorCode::UnknownMetric)]
#[case(VeracityError::MissingOutputDirectory, VeracityErrorCode::MissingOutputDirectory)]
#[case(
    VeracityError::OutputExists { path: PathBuf::from("degree_seed.csv") },
    VeracityErrorCode::OutputExists,
)]
#[case(VeracityError::Cancelled { metric: "degree" }, VeracityErrorCode::Cancelled)]
fn returns_expected_veracity_code(
    #[case] error: VeracityError,
    #[case] expected: VeracityErrorCode,
) {
    assert_eq!(error.code(), expected);
    assert!(!error.to_string().is_empty());
}
