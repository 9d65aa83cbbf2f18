use arrow_schema::{ArrowError, DataType};
use synthgraph_core::{CodecError, GraphError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParquetStoreError {
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound { column: &'static str },
    #[error("column `{column}` must be {expected:?} but found {actual:?}")]
    InvalidColumnType {
        column: &'static str,
        expected: DataType,
        actual: DataType,
    },
    #[error("column `{column}` is null at row {row}")]
    NullValue { column: &'static str, row: usize },
    #[error("row {row} has an invalid property payload")]
    Codec {
        row: usize,
        #[source]
        error: CodecError,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
