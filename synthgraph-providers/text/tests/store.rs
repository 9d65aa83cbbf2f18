//! Integration tests for the flat-file [`GraphStore`].
use std::{fs, io::Cursor};

use rstest::{fixture, rstest};
use synthgraph_core::{
    Edge, Graph, GraphStore, Properties, PropertyValue, StoreErrorCode, Vertex, VertexId,
};
use synthgraph_providers_text::{TextGraphStore, TextStoreError};
use tempfile::TempDir;

#[fixture]
fn annotated() -> Graph {
    let vertices = vec![
        Vertex::with_properties(
            VertexId::new(10),
            Properties::new().with("note", PropertyValue::text("tab\there;semi=colon")),
        ),
        Vertex::new(VertexId::new(11)),
    ];
    let edges = vec![Edge::with_properties(
        VertexId::new(10),
        VertexId::new(11),
        Properties::new()
            .with("bytes", PropertyValue::Int(-3))
            .with("rate", PropertyValue::Float(1.5)),
    )];
    Graph::try_new(vertices, edges).expect("consistent graph")
}

#[rstest]
fn graphs_survive_a_save_and_load(annotated: Graph) -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = TextGraphStore::new(dir.path());
    store.save_graph(&annotated, "seed", false)?;

    assert!(dir.path().join("seed.graph").is_file());
    assert_eq!(store.load_graph("seed")?, annotated);
    Ok(())
}

#[rstest]
fn records_are_one_per_line(annotated: Graph) -> anyhow::Result<()> {
    let mut buffer = Vec::new();
    TextGraphStore::write_graph(&mut buffer, &annotated)?;
    let text = String::from_utf8(buffer)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with('#'));
    assert_eq!(lines[2], "v\t11\t");
    assert_eq!(lines[3], "e\t10\t11\tbytes=i:-3;rate=f:1.5");
    Ok(())
}

#[rstest]
fn overwrite_is_explicit(annotated: Graph) -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = TextGraphStore::new(dir.path());
    store.save_graph(&annotated, "seed", false)?;

    let err = store
        .save_graph(&Graph::empty(), "seed", false)
        .expect_err("name is taken");
    assert_eq!(err.code(), StoreErrorCode::AlreadyExists);

    store.save_graph(&Graph::empty(), "seed", true)?;
    assert!(store.load_graph("seed")?.is_empty());
    let entries = fs::read_dir(dir.path())?.count();
    assert_eq!(entries, 1, "temporary files must be renamed away");
    Ok(())
}

#[rstest]
#[case("", StoreErrorCode::InvalidName)]
#[case("a/b", StoreErrorCode::InvalidName)]
#[case("missing", StoreErrorCode::NotFound)]
fn loads_report_store_codes(#[case] name: &str, #[case] expected: StoreErrorCode) {
    let dir = TempDir::new().expect("temp dir");
    let store = TextGraphStore::new(dir.path());
    let err = store.load_graph(name).expect_err("nothing to load");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[case("x\t1\t\n", 1)]
#[case("v\t1\t\nv\tone\t\n", 2)]
#[case("# header\nv\t1\n", 2)]
#[case("v\t1\t\nv\t2\t\ne\t1\t2\t\textra\n", 3)]
#[case("v\t1\tkey\n", 1)]
fn malformed_records_name_their_line(#[case] text: &str, #[case] expected: usize) {
    let err = TextGraphStore::read_graph(Cursor::new(text)).expect_err("malformed record");
    let line = match err {
        TextStoreError::Malformed { line, .. }
        | TextStoreError::InvalidId { line, .. }
        | TextStoreError::Codec { line, .. } => line,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(line, expected);
}

#[rstest]
fn dangling_edges_are_rejected() {
    let err = TextGraphStore::read_graph(Cursor::new("v\t1\t\ne\t1\t2\t\n"))
        .expect_err("vertex 2 is missing");
    assert!(matches!(err, TextStoreError::Graph(_)));
}

#[rstest]
fn corrupt_files_surface_as_backend_errors() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("seed.graph"), "garbage\n")?;
    let err = TextGraphStore::new(dir.path())
        .load_graph("seed")
        .expect_err("corrupt file");
    assert_eq!(err.code(), StoreErrorCode::Backend);
    Ok(())
}
