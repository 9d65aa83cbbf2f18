//! Unit tests for graph construction and degree counting.

use super::*;
use rstest::rstest;

fn id(raw: u64) -> VertexId {
    VertexId::new(raw)
}

#[rstest]
fn try_new_rejects_duplicate_vertices() {
    let err = Graph::try_new(vec![Vertex::new(id(1)), Vertex::new(id(1))], Vec::new())
        .expect_err("duplicate ids must be rejected");
    assert_eq!(err, GraphError::DuplicateVertex { id: id(1) });
}

#[rstest]
#[case::missing_source(9, 0)]
#[case::missing_target(0, 9)]
fn try_new_rejects_dangling_edges(#[case] source: u64, #[case] target: u64) {
    let err = Graph::from_edge_list(2, [(0, 1), (source, target)])
        .expect_err("dangling edge must be rejected");
    assert_eq!(
        err,
        GraphError::DanglingEdge {
            index: 1,
            from: id(source),
            to: id(target),
        }
    );
}

#[rstest]
fn self_loops_and_multi_edges_are_permitted() {
    let graph = Graph::from_edge_list(2, [(0, 0), (0, 1), (0, 1)]).expect("graph is valid");
    assert_eq!(graph.edge_count(), 3);
    let degrees = graph.degree_table();
    assert_eq!(degrees.out_degrees(), &[3, 0]);
    assert_eq!(degrees.in_degrees(), &[1, 2]);
    assert_eq!(degrees.total_degrees(), vec![4, 2]);
}

#[rstest]
fn extended_appends_vertices_and_edges() {
    let graph = Graph::from_edge_list(2, [(0, 1)]).expect("seed is valid");
    let grown = graph
        .extended(
            vec![Vertex::new(id(2))],
            vec![Edge::new(id(2), id(0)), Edge::new(id(2), id(1))],
        )
        .expect("extension is valid");
    assert_eq!(grown.vertex_count(), 3);
    assert_eq!(grown.edge_count(), 3);
    assert_eq!(grown.position(id(2)), Some(2));
    assert_eq!(grown.degree_table().total_degrees(), vec![2, 2, 2]);
}

#[rstest]
fn extended_rejects_colliding_ids() {
    let graph = Graph::from_edge_list(2, []).expect("seed is valid");
    let err = graph
        .extended(vec![Vertex::new(id(1))], Vec::new())
        .expect_err("collision must be rejected");
    assert_eq!(err, GraphError::DuplicateVertex { id: id(1) });
}

#[rstest]
#[case::empty(Graph::empty(), 0)]
#[case::dense(Graph::from_edge_list(3, []).expect("valid"), 3)]
#[case::sparse(
    Graph::try_new(vec![Vertex::new(VertexId::new(4)), Vertex::new(VertexId::new(10))], Vec::new())
        .expect("valid"),
    11
)]
fn next_vertex_id_follows_the_maximum(#[case] graph: Graph, #[case] expected: u64) {
    assert_eq!(graph.next_vertex_id(), id(expected));
}

#[rstest]
fn equality_ignores_the_position_index() {
    let left = Graph::from_edge_list(2, [(0, 1)]).expect("valid");
    let right = Graph::empty()
        .extended(vec![Vertex::new(id(0)), Vertex::new(id(1))], Vec::new())
        .and_then(|graph| graph.extended(Vec::new(), vec![Edge::new(id(0), id(1))]))
        .expect("valid");
    assert_eq!(left, right);
}
