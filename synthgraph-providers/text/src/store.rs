//! [`GraphStore`] over tab-separated `.graph` files.
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use synthgraph_core::{
    Edge, Graph, GraphStore, Properties, StoreError, Vertex, VertexId, validate_graph_name,
};

use crate::errors::TextStoreError;

const HEADER: &str = "# synthgraph graph v1";
const VERTEX_TAG: &str = "v";
const EDGE_TAG: &str = "e";

/// Stores each graph as `<root>/<name>.graph`.
///
/// Records are one per line: `v<TAB>id<TAB>properties` and
/// `e<TAB>source<TAB>target<TAB>properties`, with properties in the core's
/// single-line encoding. Lines starting with `#` are comments. Saves go to a
/// hidden temporary file that is renamed over the target.
///
/// # Examples
/// ```
/// use synthgraph_core::{Graph, GraphStore};
/// use synthgraph_providers_text::TextGraphStore;
///
/// let dir = tempfile::tempdir()?;
/// let store = TextGraphStore::new(dir.path());
/// let graph = Graph::from_edge_list(2, [(0, 1)])?;
/// store.save_graph(&graph, "seed", false)?;
/// assert_eq!(store.load_graph("seed")?, graph);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct TextGraphStore {
    root: PathBuf,
}

impl TextGraphStore {
    const LABEL: &'static str = "text";
    /// File extension of stored graphs.
    pub const EXTENSION: &'static str = "graph";

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

    /// Parses a graph from `.graph` records.
    ///
    /// # Errors
    /// Returns [`TextStoreError`] naming the one-based line of the first
    /// malformed record, or [`TextStoreError::Graph`] when the records
    /// describe an inconsistent graph.
    pub fn read_graph<R: BufRead>(reader: R) -> Result<Graph, TextStoreError> {
        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            match fields.next() {
                Some(VERTEX_TAG) => {
                    let id = parse_id(fields.next(), line_number)?;
                    let properties = parse_properties(fields.next(), line_number)?;
                    ensure_consumed(&mut fields, line_number)?;
                    vertices.push(Vertex::with_properties(id, properties));
                }
                Some(EDGE_TAG) => {
                    let source = parse_id(fields.next(), line_number)?;
                    let target = parse_id(fields.next(), line_number)?;
                    let properties = parse_properties(fields.next(), line_number)?;
                    ensure_consumed(&mut fields, line_number)?;
                    edges.push(Edge::with_properties(source, target, properties));
                }
                _ => {
                    return Err(TextStoreError::Malformed {
                        line: line_number,
                        reason: "record must start with `v` or `e`",
                    });
                }
            }
        }
        Ok(Graph::try_new(vertices, edges)?)
    }

    /// Writes `graph` as `.graph` records.
    ///
    /// # Errors
    /// Returns [`TextStoreError::Io`] when writing fails.
    pub fn write_graph<W: Write>(writer: W, graph: &Graph) -> Result<(), TextStoreError> {
        let mut writer = BufWriter::new(writer);
        writeln!(writer, "{HEADER}")?;
        for vertex in graph.vertices() {
            writeln!(
                writer,
                "{VERTEX_TAG}\t{}\t{}",
                vertex.id(),
                vertex.properties().encode()
            )?;
        }
        for edge in graph.edges() {
            writeln!(
                writer,
                "{EDGE_TAG}\t{}\t{}\t{}",
                edge.source(),
                edge.target(),
                edge.properties().encode()
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    fn graph_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{}", Self::EXTENSION))
    }

    fn replace(&self, graph: &Graph, name: &str) -> Result<(), TextStoreError> {
        fs::create_dir_all(&self.root)?;
        let staging = self.root.join(format!(".{name}.{}.tmp", Self::EXTENSION));
        Self::write_graph(File::create(&staging)?, graph)?;
        fs::rename(&staging, self.graph_path(name))?;
        Ok(())
    }

    fn backend_error(name: &str, error: &TextStoreError) -> StoreError {
        StoreError::Backend {
            store: Arc::from(Self::LABEL),
            name: Arc::from(name),
            message: Arc::from(error.to_string()),
        }
    }
}

impl GraphStore for TextGraphStore {
    fn name(&self) -> &str {
        Self::LABEL
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        validate_graph_name(name)?;
        Ok(self.graph_path(name).is_file())
    }

    fn load_graph(&self, name: &str) -> Result<Graph, StoreError> {
        if !self.contains(name)? {
            return Err(StoreError::NotFound {
                store: Arc::from(Self::LABEL),
                name: Arc::from(name),
            });
        }
        File::open(self.graph_path(name))
            .map_err(TextStoreError::from)
            .and_then(|file| Self::read_graph(BufReader::new(file)))
            .map_err(|error| Self::backend_error(name, &error))
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

fn parse_id(field: Option<&str>, line: usize) -> Result<VertexId, TextStoreError> {
    let token = field.ok_or(TextStoreError::Malformed {
        line,
        reason: "record is missing a vertex id",
    })?;
    token
        .parse::<u64>()
        .map(VertexId::new)
        .map_err(|_| TextStoreError::InvalidId {
            line,
            token: token.to_owned(),
        })
}

fn parse_properties(field: Option<&str>, line: usize) -> Result<Properties, TextStoreError> {
    let payload = field.ok_or(TextStoreError::Malformed {
        line,
        reason: "record is missing its property payload",
    })?;
    Properties::decode(payload).map_err(|error| TextStoreError::Codec { line, error })
}

fn ensure_consumed<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<(), TextStoreError> {
    match fields.next() {
        Some(_) => Err(TextStoreError::Malformed {
            line,
            reason: "record has trailing fields",
        }),
        None => Ok(()),
    }
}
