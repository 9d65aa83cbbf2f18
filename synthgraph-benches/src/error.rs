//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise while preparing benchmark inputs so
//! setup functions can propagate failures with `?`.

use synthgraph_core::{GenerationError, GraphError, SeedMatrixError, VeracityError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A synthetic seed graph violated the graph invariants.
    #[error("synthetic seed construction failed: {0}")]
    Graph(#[from] GraphError),
    /// The benchmark seed matrix was rejected.
    #[error("seed matrix rejected: {0}")]
    SeedMatrix(#[from] SeedMatrixError),
    /// Synthesizer configuration or generation failed.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Evaluator configuration or evaluation failed.
    #[error("veracity evaluation failed: {0}")]
    Veracity(#[from] VeracityError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
