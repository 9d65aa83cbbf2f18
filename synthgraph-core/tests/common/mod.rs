use synthgraph_core::{Graph, Properties, PropertyValue, Vertex, VertexId, Edge};
use synthgraph_test_support::tracing::RecordingLayer;
use tracing_subscriber::layer::SubscriberExt;

/// Directed path `0 -> 1 -> ... -> n-1`.
#[must_use]
pub fn path_seed(vertices: u64) -> Graph {
    Graph::from_edge_list(vertices, (1..vertices).map(|target| (target - 1, target)))
        .expect("path edges reference existing vertices")
}

/// Small labelled seed: vertices carry a `kind`, edges carry a `weight`.
#[must_use]
pub fn labelled_seed() -> Graph {
    let kinds = ["host", "host", "router", "host", "switch", "host"];
    let vertices = kinds
        .iter()
        .zip(0_u64..)
        .map(|(kind, id)| {
            Vertex::with_properties(
                VertexId::new(id),
                Properties::new().with("kind", PropertyValue::text(kind)),
            )
        })
        .collect();
    let edges = [(0, 2), (1, 2), (3, 2), (2, 4), (5, 4), (4, 0)]
        .into_iter()
        .zip([1_i64, 1, 2, 5, 2, 1])
        .map(|((source, target), weight)| {
            Edge::with_properties(
                VertexId::new(source),
                VertexId::new(target),
                Properties::new().with("weight", PropertyValue::Int(weight)),
            )
        })
        .collect();
    Graph::try_new(vertices, edges).expect("labelled seed is consistent")
}

/// Runs `body` under a recording subscriber.
pub fn recorded<T>(body: impl FnOnce() -> T) -> (T, RecordingLayer) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let output = tracing::subscriber::with_default(subscriber, body);
    (output, layer)
}
