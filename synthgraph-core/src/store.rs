//! Persistence seam used by the generators and the CLI.
//!
//! The core only needs "load a graph by name" and "save a graph by name,
//! optionally overwriting". Backends live in the provider crates;
//! [`MemoryGraphStore`] ships here for tests and in-process checkpoints.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{error::StoreError, graph::Graph};

/// Named graph persistence.
///
/// Implementations must never leave a partially written graph visible under
/// `name`: a failed save keeps the previous contents (or nothing).
pub trait GraphStore: Send + Sync {
    /// Returns a human-readable label for the backend.
    fn name(&self) -> &str;

    /// Returns whether a graph is stored under `name`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidName`] for a malformed name or
    /// [`StoreError::Backend`] when the backend cannot be queried.
    fn contains(&self, name: &str) -> Result<bool, StoreError>;

    /// Loads the graph stored under `name`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when nothing is stored under `name`.
    fn load_graph(&self, name: &str) -> Result<Graph, StoreError>;

    /// Stores `graph` under `name`.
    ///
    /// # Errors
    /// Returns [`StoreError::AlreadyExists`] when `name` is taken and
    /// `overwrite` is false.
    fn save_graph(&self, graph: &Graph, name: &str, overwrite: bool) -> Result<(), StoreError>;
}

/// Checks that `name` can be used as a single path component.
///
/// # Errors
/// Returns [`StoreError::InvalidName`] when the name is empty, contains a path
/// separator or a NUL byte, or starts with `.`.
///
/// # Examples
/// ```
/// use synthgraph_core::validate_graph_name;
///
/// assert!(validate_graph_name("seed").is_ok());
/// assert!(validate_graph_name("../seed").is_err());
/// assert!(validate_graph_name(".hidden").is_err());
/// ```
pub fn validate_graph_name(name: &str) -> Result<(), StoreError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else if name.starts_with('.') {
        Some("name starts with `.`")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            name: Arc::from(name),
            reason,
        }),
        None => Ok(()),
    }
}

/// In-process [`GraphStore`] backed by a map.
///
/// # Examples
/// ```
/// use synthgraph_core::{Graph, GraphStore, MemoryGraphStore};
///
/// let store = MemoryGraphStore::new();
/// let graph = Graph::from_edge_list(2, [(0, 1)])?;
/// store.save_graph(&graph, "seed", false)?;
/// assert_eq!(store.load_graph("seed")?, graph);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    graphs: Mutex<BTreeMap<String, Graph>>,
}

impl MemoryGraphStore {
    const LABEL: &'static str = "memory";

    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored names in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.graphs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl GraphStore for MemoryGraphStore {
    fn name(&self) -> &str {
        Self::LABEL
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        validate_graph_name(name)?;
        Ok(self
            .graphs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name))
    }

    fn load_graph(&self, name: &str) -> Result<Graph, StoreError> {
        validate_graph_name(name)?;
        self.graphs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                store: Arc::from(Self::LABEL),
                name: Arc::from(name),
            })
    }

    fn save_graph(&self, graph: &Graph, name: &str, overwrite: bool) -> Result<(), StoreError> {
        validate_graph_name(name)?;
        let mut graphs = self.graphs.lock().unwrap_or_else(PoisonError::into_inner);
        if !overwrite && graphs.contains_key(name) {
            return Err(StoreError::AlreadyExists {
                store: Arc::from(Self::LABEL),
                name: Arc::from(name),
            });
        }
        graphs.insert(name.to_owned(), graph.clone());
        Ok(())
    }
}
