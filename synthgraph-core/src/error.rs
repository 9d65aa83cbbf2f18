//! Error types for the synthgraph core library.
//!
//! Every public error enum carries a stable machine-readable code so the CLI
//! and log pipelines can classify failures without matching on messages.

use std::{fmt, path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::graph::VertexId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while assembling a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// Two vertices share an identifier.
    #[error("vertex {id} appears more than once")]
    DuplicateVertex {
        /// The repeated identifier.
        id: VertexId,
    },
    /// An edge references a vertex that is not part of the graph.
    #[error("edge {index} ({from} -> {to}) references a missing vertex")]
    DanglingEdge {
        /// Position of the edge in the supplied edge list.
        index: usize,
        /// Tail of the offending edge.
        from: VertexId,
        /// Head of the offending edge.
        to: VertexId,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// Two vertices share an identifier.
        DuplicateVertex => DuplicateVertex { .. } => "GRAPH_DUPLICATE_VERTEX",
        /// An edge references a vertex that is not part of the graph.
        DanglingEdge => DanglingEdge { .. } => "GRAPH_DANGLING_EDGE",
    }
}

/// An error raised while decoding an encoded property payload.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CodecError {
    /// The payload ended in the middle of an escape sequence.
    #[error("property payload ends with a dangling escape")]
    UnterminatedEscape,
    /// An escape sequence named an unsupported character.
    #[error("unsupported escape sequence `\\{escaped}`")]
    InvalidEscape {
        /// Character following the backslash.
        escaped: char,
    },
    /// An entry lacked the `key=value` separator.
    #[error("property entry `{entry}` is missing `=`")]
    MissingSeparator {
        /// The malformed entry.
        entry: String,
    },
    /// An entry had an empty key.
    #[error("property entry has an empty key")]
    EmptyKey,
    /// The value tag was not one of `i`, `f` or `s`.
    #[error("property `{key}` has unknown value tag in `{value}`")]
    UnknownTag {
        /// Key of the offending property.
        key: String,
        /// Raw tagged value.
        value: String,
    },
    /// A numeric value failed to parse.
    #[error("property `{key}` has invalid numeric value `{value}`")]
    InvalidNumber {
        /// Key of the offending property.
        key: String,
        /// Raw value text.
        value: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`CodecError`] variants.
    enum CodecErrorCode for CodecError {
        /// The payload ended in the middle of an escape sequence.
        UnterminatedEscape => UnterminatedEscape => "CODEC_UNTERMINATED_ESCAPE",
        /// An escape sequence named an unsupported character.
        InvalidEscape => InvalidEscape { .. } => "CODEC_INVALID_ESCAPE",
        /// An entry lacked the `key=value` separator.
        MissingSeparator => MissingSeparator { .. } => "CODEC_MISSING_SEPARATOR",
        /// An entry had an empty key.
        EmptyKey => EmptyKey => "CODEC_EMPTY_KEY",
        /// The value tag was not one of `i`, `f` or `s`.
        UnknownTag => UnknownTag { .. } => "CODEC_UNKNOWN_TAG",
        /// A numeric value failed to parse.
        InvalidNumber => InvalidNumber { .. } => "CODEC_INVALID_NUMBER",
    }
}

/// An error produced by [`crate::GraphStore`] implementations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum StoreError {
    /// Graph names must be plain, non-hidden file names.
    #[error("invalid graph name `{name}`: {reason}")]
    InvalidName {
        /// The rejected name.
        name: Arc<str>,
        /// Why the name was rejected.
        reason: &'static str,
    },
    /// No graph is stored under the requested name.
    #[error("store `{store}` has no graph named `{name}`")]
    NotFound {
        /// Backend label.
        store: Arc<str>,
        /// Requested graph name.
        name: Arc<str>,
    },
    /// A graph already exists and overwriting was not requested.
    #[error("store `{store}` already holds a graph named `{name}`")]
    AlreadyExists {
        /// Backend label.
        store: Arc<str>,
        /// Conflicting graph name.
        name: Arc<str>,
    },
    /// The backend failed to read or write the graph.
    #[error("store `{store}` failed on graph `{name}`: {message}")]
    Backend {
        /// Backend label.
        store: Arc<str>,
        /// Graph being read or written.
        name: Arc<str>,
        /// Backend-specific failure description.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`StoreError`] variants.
    enum StoreErrorCode for StoreError {
        /// Graph names must be plain, non-hidden file names.
        InvalidName => InvalidName { .. } => "STORE_INVALID_NAME",
        /// No graph is stored under the requested name.
        NotFound => NotFound { .. } => "STORE_NOT_FOUND",
        /// A graph already exists and overwriting was not requested.
        AlreadyExists => AlreadyExists { .. } => "STORE_ALREADY_EXISTS",
        /// The backend failed to read or write the graph.
        Backend => Backend { .. } => "STORE_BACKEND_FAILURE",
    }
}

/// An error raised while loading or validating a Kronecker seed matrix.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SeedMatrixError {
    /// The matrix has no rows.
    #[error("seed matrix is empty")]
    Empty,
    /// A row length differs from the row count.
    #[error("seed matrix row {row} has {actual} entries but the matrix needs {expected}")]
    NotSquare {
        /// Zero-based row index.
        row: usize,
        /// Required row length (the row count).
        expected: usize,
        /// Observed row length.
        actual: usize,
    },
    /// An entry is not a probability.
    #[error("seed matrix entry ({row}, {column}) = {value} is outside [0, 1]")]
    ProbabilityOutOfRange {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// Offending value.
        value: f64,
    },
    /// A token could not be parsed as a float.
    #[error("seed matrix line {line}: `{token}` is not a number")]
    Parse {
        /// One-based line number in the source text.
        line: usize,
        /// The unparsable token.
        token: String,
    },
    /// The matrix file could not be read.
    #[error("failed to read seed matrix `{path}`: {message}")]
    Io {
        /// Path of the matrix file.
        path: PathBuf,
        /// Operating system error description.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`SeedMatrixError`] variants.
    enum SeedMatrixErrorCode for SeedMatrixError {
        /// The matrix has no rows.
        Empty => Empty => "SEED_MATRIX_EMPTY",
        /// A row length differs from the row count.
        NotSquare => NotSquare { .. } => "SEED_MATRIX_NOT_SQUARE",
        /// An entry is not a probability.
        ProbabilityOutOfRange => ProbabilityOutOfRange { .. } => "SEED_MATRIX_PROBABILITY_OUT_OF_RANGE",
        /// A token could not be parsed as a float.
        Parse => Parse { .. } => "SEED_MATRIX_PARSE",
        /// The matrix file could not be read.
        Io => Io { .. } => "SEED_MATRIX_IO",
    }
}

/// Error type produced when configuring or running a graph generator.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// A generation parameter failed validation.
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the rejected parameter.
        parameter: &'static str,
        /// Human-readable validation failure.
        reason: String,
    },
    /// The Kronecker seed matrix was unusable.
    #[error(transparent)]
    SeedMatrix(#[from] SeedMatrixError),
    /// `k^depth` does not fit the addressable vertex space.
    #[error("a {dimension}x{dimension} seed matrix expanded to depth {depth} overflows the vertex space")]
    VertexSpaceOverflow {
        /// Seed matrix dimension `k`.
        dimension: usize,
        /// Requested expansion depth.
        depth: u32,
    },
    /// A generated graph violated the graph invariants.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Reading or writing a checkpoint failed.
    #[error("checkpoint `{name}` failed: {error}")]
    Checkpoint {
        /// Checkpoint graph name.
        name: Arc<str>,
        /// Underlying persistence failure.
        #[source]
        error: StoreError,
    },
    /// A stored checkpoint does not belong to this run's parameters.
    #[error(
        "checkpoint `{name}` holds {vertices} vertices, which is not a completed round for a seed of {seed_vertices} vertices growing by {nodes_per_iteration} per round over {iterations} rounds"
    )]
    CheckpointMismatch {
        /// Checkpoint graph name.
        name: Arc<str>,
        /// Vertex count found in the checkpoint.
        vertices: usize,
        /// Vertex count of the seed graph.
        seed_vertices: usize,
        /// Vertices added per round.
        nodes_per_iteration: usize,
        /// Total rounds configured.
        iterations: usize,
    },
    /// A stored checkpoint was not grown from this run's seed graph.
    #[error(
        "checkpoint `{name}` holds vertex {found} where the seed has vertex {expected}; it was grown from a different seed"
    )]
    CheckpointSeedMismatch {
        /// Checkpoint graph name.
        name: Arc<str>,
        /// Seed vertex expected at the first differing position.
        expected: VertexId,
        /// Checkpoint vertex found at that position.
        found: VertexId,
    },
    /// The run was cancelled at a round boundary.
    #[error("generation cancelled after {completed_rounds} completed rounds")]
    Cancelled {
        /// Rounds fully applied before cancellation.
        completed_rounds: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerationError`] variants.
    enum GenerationErrorCode for GenerationError {
        /// A generation parameter failed validation.
        InvalidParameter => InvalidParameter { .. } => "GENERATION_INVALID_PARAMETER",
        /// The Kronecker seed matrix was unusable.
        SeedMatrix => SeedMatrix { .. } => "GENERATION_SEED_MATRIX",
        /// `k^depth` does not fit the addressable vertex space.
        VertexSpaceOverflow => VertexSpaceOverflow { .. } => "GENERATION_VERTEX_SPACE_OVERFLOW",
        /// A generated graph violated the graph invariants.
        Graph => Graph { .. } => "GENERATION_GRAPH_INVARIANT",
        /// Reading or writing a checkpoint failed.
        Checkpoint => Checkpoint { .. } => "GENERATION_CHECKPOINT_FAILURE",
        /// A stored checkpoint does not belong to this run's parameters.
        CheckpointMismatch => CheckpointMismatch { .. } => "GENERATION_CHECKPOINT_MISMATCH",
        /// A stored checkpoint was grown from a different seed graph.
        CheckpointSeedMismatch => CheckpointSeedMismatch { .. } => "GENERATION_CHECKPOINT_SEED_MISMATCH",
        /// The run was cancelled at a round boundary.
        Cancelled => Cancelled { .. } => "GENERATION_CANCELLED",
    }
}

impl GenerationError {
    /// Retrieve the inner [`StoreErrorCode`] when a checkpoint operation failed.
    #[must_use]
    pub const fn store_code(&self) -> Option<StoreErrorCode> {
        match self {
            Self::Checkpoint { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Error type produced by the veracity evaluator.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum VeracityError {
    /// The metric name is not one of the supported metrics.
    #[error("unknown metric `{name}`; expected one of degree, inDegree, outDegree, pageRank")]
    UnknownMetric {
        /// The rejected metric name.
        name: String,
    },
    /// An evaluator parameter failed validation.
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the rejected parameter.
        parameter: &'static str,
        /// Human-readable validation failure.
        reason: String,
    },
    /// CSV output was requested without an output directory.
    #[error("saving distributions requires an output directory")]
    MissingOutputDirectory,
    /// An output file exists and overwriting was not requested.
    #[error("output `{path}` already exists")]
    OutputExists {
        /// The existing output file.
        path: PathBuf,
    },
    /// Writing a distribution file failed.
    #[error("failed to write `{path}`: {message}")]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Operating system error description.
        message: Arc<str>,
    },
    /// The evaluation was cancelled before its score was aggregated.
    #[error("evaluation of `{metric}` cancelled")]
    Cancelled {
        /// Name of the metric being evaluated.
        metric: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`VeracityError`] variants.
    enum VeracityErrorCode for VeracityError {
        /// The metric name is not one of the supported metrics.
        UnknownMetric => UnknownMetric { .. } => "VERACITY_UNKNOWN_METRIC",
        /// An evaluator parameter failed validation.
        InvalidParameter => InvalidParameter { .. } => "VERACITY_INVALID_PARAMETER",
        /// CSV output was requested without an output directory.
        MissingOutputDirectory => MissingOutputDirectory => "VERACITY_MISSING_OUTPUT_DIRECTORY",
        /// An output file exists and overwriting was not requested.
        OutputExists => OutputExists { .. } => "VERACITY_OUTPUT_EXISTS",
        /// Writing a distribution file failed.
        Io => Io { .. } => "VERACITY_IO",
        /// The evaluation was cancelled before its score was aggregated.
        Cancelled => Cancelled { .. } => "VERACITY_CANCELLED",
    }
}

/// Convenient alias for results returned by the generation API.
pub type Result<T> = core::result::Result<T, GenerationError>;
