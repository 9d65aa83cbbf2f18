use std::sync::Arc;

use arrow_array::{ArrayRef, Int64Array, StringArray, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use rstest::rstest;

use super::support::{labelled_graph, parquet_bytes};
use crate::columns::{read_edges, read_vertices, write_edges, write_vertices};
use crate::errors::ParquetStoreError;

#[rstest]
fn tables_preserve_ids_and_properties() {
    let graph = labelled_graph();
    let mut vertex_buffer = Vec::new();
    write_vertices(&mut vertex_buffer, graph.vertices()).expect("write vertices");
    let mut edge_buffer = Vec::new();
    write_edges(&mut edge_buffer, graph.edges()).expect("write edges");

    let vertices = read_vertices(Bytes::from(vertex_buffer)).expect("read vertices");
    let edges = read_edges(Bytes::from(edge_buffer)).expect("read edges");
    assert_eq!(vertices, graph.vertices());
    assert_eq!(edges, graph.edges());
}

#[rstest]
fn empty_tables_read_back_empty() {
    let mut buffer = Vec::new();
    write_edges(&mut buffer, &[]).expect("write empty table");
    assert!(read_edges(Bytes::from(buffer)).expect("read").is_empty());
}

#[rstest]
fn missing_columns_are_reported() {
    let bytes = parquet_bytes(
        Schema::new(vec![Field::new("id", DataType::UInt64, false)]),
        vec![Arc::new(UInt64Array::from(vec![1_u64])) as ArrayRef],
    );
    let err = read_vertices(bytes).expect_err("properties column is required");
    assert!(matches!(
        err,
        ParquetStoreError::ColumnNotFound { column: "properties" }
    ));
}

#[rstest]
fn signed_ids_are_rejected() {
    let bytes = parquet_bytes(
        Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("properties", DataType::Utf8, false),
        ]),
        vec![
            Arc::new(Int64Array::from(vec![1_i64])) as ArrayRef,
            Arc::new(StringArray::from(vec![""])) as ArrayRef,
        ],
    );
    let err = read_vertices(bytes).expect_err("ids must be unsigned");
    assert!(matches!(
        err,
        ParquetStoreError::InvalidColumnType {
            column: "id",
            actual: DataType::Int64,
            ..
        }
    ));
}

#[rstest]
fn null_payloads_name_their_row() {
    let bytes = parquet_bytes(
        Schema::new(vec![
            Field::new("id", DataType::UInt64, false),
            Field::new("properties", DataType::Utf8, true),
        ]),
        vec![
            Arc::new(UInt64Array::from(vec![0_u64, 1, 2])) as ArrayRef,
            Arc::new(StringArray::from(vec![Some(""), Some(""), None])) as ArrayRef,
        ],
    );
    let err = read_vertices(bytes).expect_err("nulls are rejected");
    assert!(matches!(
        err,
        ParquetStoreError::NullValue {
            column: "properties",
            row: 2
        }
    ));
}

#[rstest]
fn malformed_payloads_name_their_row() {
    let bytes = parquet_bytes(
        Schema::new(vec![
            Field::new("id", DataType::UInt64, false),
            Field::new("properties", DataType::Utf8, false),
        ]),
        vec![
            Arc::new(UInt64Array::from(vec![0_u64, 1])) as ArrayRef,
            Arc::new(StringArray::from(vec!["kind=s:host", "kind"])) as ArrayRef,
        ],
    );
    let err = read_vertices(bytes).expect_err("payload lacks a separator");
    assert!(matches!(err, ParquetStoreError::Codec { row: 1, .. }));
}
