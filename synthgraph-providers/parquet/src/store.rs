//! [`GraphStore`] over a directory of per-graph Parquet tables.
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Arc,
};

use synthgraph_core::{Graph, GraphStore, StoreError, validate_graph_name};

use crate::{
    columns::{read_edges, read_vertices, write_edges, write_vertices},
    errors::ParquetStoreError,
};

/// Stores each graph as `<root>/<name>/{vertices,edges}.parquet`.
///
/// Saves are staged in a hidden sibling directory and renamed into place, so
/// readers never observe a half-written graph.
///
/// # Examples
/// ```
/// use synthgraph_core::{Graph, GraphStore};
/// use synthgraph_providers_parquet::ParquetGraphStore;
///
/// let dir = tempfile::tempdir()?;
/// let store = ParquetGraphStore::new(dir.path());
/// let graph = Graph::from_edge_list(3, [(0, 1), (1, 2)])?;
/// store.save_graph(&graph, "seed", false)?;
/// assert_eq!(store.load_graph("seed")?, graph);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParquetGraphStore {
    root: PathBuf,
}

impl ParquetGraphStore {
    const LABEL: &'static str = "parquet";
    /// Vertex table file name inside a graph directory.
    pub const VERTICES_FILE: &'static str = "vertices.parquet";
    /// Edge table file name inside a graph directory.
    pub const EDGES_FILE: &'static str = "edges.parquet";

    /// Creates a store rooted at `root`; the directory is created on first
    /// save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the graph stored in `dir`.
    ///
    /// # Errors
    /// Returns [`ParquetStoreError`] when either table is missing, has an
    /// unexpected schema, holds malformed property payloads, or describes an
    /// inconsistent graph.
    pub fn read_graph_dir(dir: &Path) -> Result<Graph, ParquetStoreError> {
        let vertices = read_vertices(File::open(dir.join(Self::VERTICES_FILE))?)?;
        let edges = read_edges(File::open(dir.join(Self::EDGES_FILE))?)?;
        Ok(Graph::try_new(vertices, edges)?)
    }

    /// Writes `graph` into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns [`ParquetStoreError`] when the directory or either table cannot
    /// be written.
    pub fn write_graph_dir(dir: &Path, graph: &Graph) -> Result<(), ParquetStoreError> {
        fs::create_dir_all(dir)?;
        write_vertices(File::create(dir.join(Self::VERTICES_FILE))?, graph.vertices())?;
        write_edges(File::create(dir.join(Self::EDGES_FILE))?, graph.edges())?;
        Ok(())
    }

    fn graph_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn replace(&self, graph: &Graph, name: &str) -> Result<(), ParquetStoreError> {
        let staging = self.root.join(format!(".{name}.partial"));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        Self::write_graph_dir(&staging, graph)?;

        let target = self.graph_dir(name);
        if target.exists() {
            let stale = self.root.join(format!(".{name}.stale"));
            if stale.exists() {
                fs::remove_dir_all(&stale)?;
            }
            fs::rename(&target, &stale)?;
            fs::rename(&staging, &target)?;
            fs::remove_dir_all(&stale)?;
        } else {
            fs::rename(&staging, &target)?;
        }
        Ok(())
    }

    fn backend_error(name: &str, error: &ParquetStoreError) -> StoreError {
        StoreError::Backend {
            store: Arc::from(Self::LABEL),
            name: Arc::from(name),
            message: Arc::from(error.to_string()),
        }
    }
}

impl GraphStore for ParquetGraphStore {
    fn name(&self) -> &str {
        Self::LABEL
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        validate_graph_name(name)?;
        Ok(self.graph_dir(name).join(Self::VERTICES_FILE).is_file())
    }

    fn load_graph(&self, name: &str) -> Result<Graph, StoreError> {
        if !self.contains(name)? {
            return Err(StoreError::NotFound {
                store: Arc::from(Self::LABEL),
                name: Arc::from(name),
            });
        }
        Self::read_graph_dir(&self.graph_dir(name)).map_err(|error| Self::backend_error(name, &error))
    }

    fn save_graph(&self, graph: &Graph, name: &str, overwrite: bool) -> Result<(), StoreError> {
        if !overwrite && self.contains(name)? {
            return Err(StoreError::AlreadyExists {
                store: Arc::from(Self::LABEL),
                name: Arc::from(name),
            });
        }
        self.replace(graph, name)
            .map_err(|error| Self::backend_error(name, &error))
    }
}
