//! Seed ingestion from `source target [label]` edge lists.
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use synthgraph_core::{Edge, Graph, Properties, PropertyValue, Vertex, VertexId};

use crate::errors::EdgeListError;

/// Reads an edge-labelled seed graph.
///
/// Each non-blank line holds a source id, a target id and an optional label
/// (the rest of the line). `#` starts a comment. Every id that appears
/// becomes a vertex; vertices are ordered by id and edges keep file order.
///
/// # Examples
/// ```
/// use synthgraph_core::PropertyValue;
/// use synthgraph_providers_text::EdgeListReader;
///
/// let text = "# connections\n1 2 ssh scan\n2 3\n";
/// let graph = EdgeListReader::new().read(text.as_bytes()).expect("valid edge list");
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(
///     graph.edges()[0].properties().get("label"),
///     Some(&PropertyValue::text("ssh scan")),
/// );
/// assert!(graph.edges()[1].properties().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    label_key: Arc<str>,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            label_key: Arc::from("label"),
        }
    }
}

impl EdgeListReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores labels under `key` instead of `label`.
    #[must_use]
    pub fn with_label_key(mut self, key: &str) -> Self {
        self.label_key = Arc::from(key);
        self
    }

    #[must_use]
    pub fn label_key(&self) -> &str {
        &self.label_key
    }

    /// Reads the edge list at `path`.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Io`] when the file cannot be read, plus every
    /// error of [`Self::read`].
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Graph, EdgeListError> {
        self.read(BufReader::new(File::open(path)?))
    }

    /// Reads an edge list from `reader`.
    ///
    /// # Errors
    /// Returns [`EdgeListError::MissingTarget`] or
    /// [`EdgeListError::InvalidId`] with the one-based line number of the
    /// first malformed line.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<Graph, EdgeListError> {
        let mut ids = BTreeSet::new();
        let mut edges = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line?;
            let content = line.split_once('#').map_or(line.as_str(), |(before, _)| before);
            let Some((source, rest)) = split_token(content) else {
                continue;
            };
            let (target, label) =
                split_token(rest).ok_or(EdgeListError::MissingTarget { line: line_number })?;
            let source = parse_id(source, line_number)?;
            let target = parse_id(target, line_number)?;
            ids.insert(source);
            ids.insert(target);

            let label = label.trim();
            let properties = if label.is_empty() {
                Properties::new()
            } else {
                Properties::new().with(&self.label_key, PropertyValue::text(label))
            };
            edges.push(Edge::with_properties(source, target, properties));
        }
        let vertices = ids.into_iter().map(Vertex::new).collect();
        Ok(Graph::try_new(vertices, edges)?)
    }
}

/// Splits off the first whitespace-delimited token.
fn split_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(text.split_once(char::is_whitespace).unwrap_or((text, "")))
}

fn parse_id(token: &str, line: usize) -> Result<VertexId, EdgeListError> {
    token
        .parse::<u64>()
        .map(VertexId::new)
        .map_err(|_| EdgeListError::InvalidId {
            line,
            token: token.to_owned(),
        })
}
