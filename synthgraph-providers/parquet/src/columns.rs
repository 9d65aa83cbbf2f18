//! Column layout and typed access for the vertex and edge tables.
use std::{io::Write, sync::Arc};

use arrow_array::{
    Array, ArrayRef, RecordBatch, RecordBatchReader, StringArray, UInt64Array,
};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::{ArrowWriter, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;
use synthgraph_core::{Edge, Properties, Vertex, VertexId};

use crate::errors::ParquetStoreError;

pub(crate) const ID: &str = "id";
pub(crate) const SOURCE: &str = "source";
pub(crate) const TARGET: &str = "target";
pub(crate) const PROPERTIES: &str = "properties";

/// Rows per record batch when writing.
const BATCH_ROWS: usize = 64 * 1024;

pub(crate) fn vertex_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(ID, DataType::UInt64, false),
        Field::new(PROPERTIES, DataType::Utf8, false),
    ]))
}

pub(crate) fn edge_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(SOURCE, DataType::UInt64, false),
        Field::new(TARGET, DataType::UInt64, false),
        Field::new(PROPERTIES, DataType::Utf8, false),
    ]))
}

fn column_index(
    schema: &Schema,
    column: &'static str,
    expected: &DataType,
) -> Result<usize, ParquetStoreError> {
    let index = schema
        .index_of(column)
        .map_err(|_| ParquetStoreError::ColumnNotFound { column })?;
    let actual = schema.field(index).data_type();
    if actual != expected {
        return Err(ParquetStoreError::InvalidColumnType {
            column,
            expected: expected.clone(),
            actual: actual.clone(),
        });
    }
    Ok(index)
}

fn typed_column<'a, A: Array + 'static>(
    batch: &'a RecordBatch,
    index: usize,
    column: &'static str,
    expected: &DataType,
    start_row: usize,
) -> Result<&'a A, ParquetStoreError> {
    let array = batch.column(index);
    let typed = array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| ParquetStoreError::InvalidColumnType {
            column,
            expected: expected.clone(),
            actual: array.data_type().clone(),
        })?;
    if let Some(row) = (0..typed.len()).find(|&row| typed.is_null(row)) {
        return Err(ParquetStoreError::NullValue {
            column,
            row: start_row + row,
        });
    }
    Ok(typed)
}

fn decode(payload: &str, row: usize) -> Result<Properties, ParquetStoreError> {
    Properties::decode(payload).map_err(|error| ParquetStoreError::Codec { row, error })
}

pub(crate) fn read_vertices<R>(reader: R) -> Result<Vec<Vertex>, ParquetStoreError>
where
    R: ChunkReader + 'static,
{
    let reader = ParquetRecordBatchReaderBuilder::try_new(reader)?.build()?;
    let schema = reader.schema();
    let id_index = column_index(&schema, ID, &DataType::UInt64)?;
    let payload_index = column_index(&schema, PROPERTIES, &DataType::Utf8)?;

    let mut vertices = Vec::new();
    for batch in reader {
        let batch = batch?;
        let start = vertices.len();
        let ids: &UInt64Array = typed_column(&batch, id_index, ID, &DataType::UInt64, start)?;
        let payloads: &StringArray =
            typed_column(&batch, payload_index, PROPERTIES, &DataType::Utf8, start)?;
        vertices.reserve(batch.num_rows());
        for row in 0..batch.num_rows() {
            let properties = decode(payloads.value(row), start + row)?;
            vertices.push(Vertex::with_properties(VertexId::new(ids.value(row)), properties));
        }
    }
    Ok(vertices)
}

pub(crate) fn read_edges<R>(reader: R) -> Result<Vec<Edge>, ParquetStoreError>
where
    R: ChunkReader + 'static,
{
    let reader = ParquetRecordBatchReaderBuilder::try_new(reader)?.build()?;
    let schema = reader.schema();
    let source_index = column_index(&schema, SOURCE, &DataType::UInt64)?;
    let target_index = column_index(&schema, TARGET, &DataType::UInt64)?;
    let payload_index = column_index(&schema, PROPERTIES, &DataType::Utf8)?;

    let mut edges = Vec::new();
    for batch in reader {
        let batch = batch?;
        let start = edges.len();
        let sources: &UInt64Array =
            typed_column(&batch, source_index, SOURCE, &DataType::UInt64, start)?;
        let targets: &UInt64Array =
            typed_column(&batch, target_index, TARGET, &DataType::UInt64, start)?;
        let payloads: &StringArray =
            typed_column(&batch, payload_index, PROPERTIES, &DataType::Utf8, start)?;
        edges.reserve(batch.num_rows());
        for row in 0..batch.num_rows() {
            let properties = decode(payloads.value(row), start + row)?;
            edges.push(Edge::with_properties(
                VertexId::new(sources.value(row)),
                VertexId::new(targets.value(row)),
                properties,
            ));
        }
    }
    Ok(edges)
}

pub(crate) fn write_vertices<W>(writer: W, vertices: &[Vertex]) -> Result<(), ParquetStoreError>
where
    W: Write + Send,
{
    let schema = vertex_schema();
    let mut writer = ArrowWriter::try_new(writer, Arc::clone(&schema), None)?;
    for chunk in vertices.chunks(BATCH_ROWS) {
        let ids = UInt64Array::from_iter_values(chunk.iter().map(|vertex| vertex.id().get()));
        let payloads =
            StringArray::from_iter_values(chunk.iter().map(|vertex| vertex.properties().encode()));
        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![Arc::new(ids) as ArrayRef, Arc::new(payloads) as ArrayRef],
        )?;
        writer.write(&batch)?;
    }
    writer.close()?;
    Ok(())
}

pub(crate) fn write_edges<W>(writer: W, edges: &[Edge]) -> Result<(), ParquetStoreError>
where
    W: Write + Send,
{
    let schema = edge_schema();
    let mut writer = ArrowWriter::try_new(writer, Arc::clone(&schema), None)?;
    for chunk in edges.chunks(BATCH_ROWS) {
        let sources = UInt64Array::from_iter_values(chunk.iter().map(|edge| edge.source().get()));
        let targets = UInt64Array::from_iter_values(chunk.iter().map(|edge| edge.target().get()));
        let payloads =
            StringArray::from_iter_values(chunk.iter().map(|edge| edge.properties().encode()));
        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(sources) as ArrayRef,
                Arc::new(targets) as ArrayRef,
                Arc::new(payloads) as ArrayRef,
            ],
        )?;
        writer.write(&batch)?;
    }
    writer.close()?;
    Ok(())
}
