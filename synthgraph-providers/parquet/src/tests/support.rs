use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::Schema;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use synthgraph_core::{Edge, Graph, Properties, PropertyValue, Vertex, VertexId};

/// Three hosts talking over labelled connections.
pub(crate) fn labelled_graph() -> Graph {
    let vertices = (0..3_u64)
        .map(|id| {
            Vertex::with_properties(
                VertexId::new(id),
                Properties::new().with("name", PropertyValue::text(&format!("host;{id}"))),
            )
        })
        .collect();
    let edges = vec![
        Edge::with_properties(
            VertexId::new(0),
            VertexId::new(1),
            Properties::new()
                .with("bytes", PropertyValue::Int(512))
                .with("protocol", PropertyValue::text("tcp")),
        ),
        Edge::with_properties(
            VertexId::new(1),
            VertexId::new(2),
            Properties::new().with("duration", PropertyValue::Float(0.25)),
        ),
        Edge::new(VertexId::new(2), VertexId::new(2)),
    ];
    Graph::try_new(vertices, edges).expect("consistent graph")
}

/// Encodes `columns` as an in-memory Parquet file.
pub(crate) fn parquet_bytes(schema: Schema, columns: Vec<ArrayRef>) -> Bytes {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns).expect("valid batch");
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");
    Bytes::from(buffer)
}
