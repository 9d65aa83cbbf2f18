use synthgraph_core::{CodecError, GraphError};
use thiserror::Error;

/// Failure while reading or writing a `.graph` file.
#[derive(Debug, Error)]
pub enum TextStoreError {
    /// A record did not have the expected shape.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },
    /// A vertex identifier was not an unsigned integer.
    #[error("line {line}: `{token}` is not a vertex id")]
    InvalidId { line: usize, token: String },
    /// A property payload failed to decode.
    #[error("line {line}: invalid property payload")]
    Codec {
        line: usize,
        #[source]
        error: CodecError,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while ingesting an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// A line named a source but no target.
    #[error("line {line}: missing target vertex")]
    MissingTarget { line: usize },
    /// A vertex identifier was not an unsigned integer.
    #[error("line {line}: `{token}` is not a vertex id")]
    InvalidId { line: usize, token: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
