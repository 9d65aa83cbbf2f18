use std::fs;

use rstest::{fixture, rstest};
use synthgraph_core::{Graph, GraphStore, StoreError, StoreErrorCode};
use tempfile::TempDir;

use super::support::labelled_graph;
use crate::ParquetGraphStore;

#[fixture]
fn workspace() -> (TempDir, ParquetGraphStore) {
    let dir = TempDir::new().expect("temp dir");
    let store = ParquetGraphStore::new(dir.path().join("graphs"));
    (dir, store)
}

#[rstest]
fn saved_graphs_load_back(workspace: (TempDir, ParquetGraphStore)) {
    let (_dir, store) = workspace;
    let graph = labelled_graph();
    assert!(!store.contains("seed").expect("valid name"));
    store.save_graph(&graph, "seed", false).expect("save");

    assert!(store.contains("seed").expect("valid name"));
    assert_eq!(store.load_graph("seed").expect("load"), graph);
    let dir = store.root().join("seed");
    assert!(dir.join(ParquetGraphStore::VERTICES_FILE).is_file());
    assert!(dir.join(ParquetGraphStore::EDGES_FILE).is_file());
}

#[rstest]
fn existing_graphs_need_overwrite(workspace: (TempDir, ParquetGraphStore)) {
    let (_dir, store) = workspace;
    let first = labelled_graph();
    let second = Graph::from_edge_list(2, [(1, 0)]).expect("valid graph");
    store.save_graph(&first, "seed", false).expect("first save");

    let err = store
        .save_graph(&second, "seed", false)
        .expect_err("name is taken");
    assert_eq!(err.code(), StoreErrorCode::AlreadyExists);
    assert_eq!(store.load_graph("seed").expect("load"), first);

    store.save_graph(&second, "seed", true).expect("overwrite");
    assert_eq!(store.load_graph("seed").expect("load"), second);
}

#[rstest]
fn staging_directories_do_not_linger(workspace: (TempDir, ParquetGraphStore)) {
    let (_dir, store) = workspace;
    store.save_graph(&labelled_graph(), "seed", false).expect("save");
    store.save_graph(&Graph::empty(), "seed", true).expect("overwrite");

    let names: Vec<String> = fs::read_dir(store.root())
        .expect("list root")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["seed"]);
    assert!(store.load_graph("seed").expect("load").is_empty());
}

#[rstest]
fn missing_graphs_are_not_found(workspace: (TempDir, ParquetGraphStore)) {
    let (_dir, store) = workspace;
    let err = store.load_graph("absent").expect_err("nothing saved");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[rstest]
#[case("")]
#[case("../escape")]
#[case(".hidden")]
fn unsafe_names_are_rejected(workspace: (TempDir, ParquetGraphStore), #[case] name: &str) {
    let (_dir, store) = workspace;
    let err = store
        .save_graph(&labelled_graph(), name, true)
        .expect_err("invalid name");
    assert_eq!(err.code(), StoreErrorCode::InvalidName);
}

#[rstest]
fn corrupt_tables_surface_as_backend_errors(workspace: (TempDir, ParquetGraphStore)) {
    let (_dir, store) = workspace;
    store.save_graph(&labelled_graph(), "seed", false).expect("save");
    fs::write(
        store.root().join("seed").join(ParquetGraphStore::EDGES_FILE),
        b"not parquet",
    )
    .expect("corrupt edges");

    let err = store.load_graph("seed").expect_err("corrupt table");
    assert!(matches!(err, StoreError::Backend { .. }));
}
