//! Integration tests for task dependency graphs

use taskforge_foundation::{AggregateRef, EdgeKind, Object, TaskDependencyGraph};

fn task(item: &str) -> Object {
    Object::new(AggregateRef::new(1, "fetch_quest")).with("item", item.into())
}

fn chain() -> TaskDependencyGraph {
    let mut graph = TaskDependencyGraph::new("chain");
    let a = graph.add_node("a", task("key"));
    let b = graph.add_node("b", task("door"));
    let c = graph.add_node("c", task("chest"));
    graph.add_edge(a, b, EdgeKind::Sequence);
    graph.add_edge(b, c, EdgeKind::ConditionalCorrect);
    graph
}

#[test]
fn edge_kind_attributes() {
    for kind in EdgeKind::ALL {
        assert_eq!(EdgeKind::from_attribute(kind.attribute()), Some(kind));
    }
    assert_eq!(EdgeKind::from_attribute("st_m"), Some(EdgeKind::SubtaskMandatory));
    assert_eq!(EdgeKind::from_attribute("parallel"), None);
    assert_eq!(EdgeKind::default(), EdgeKind::Sequence);
}

#[test]
fn nodes_are_unique_by_name() {
    let mut graph = chain();
    assert_eq!(graph.add_node("a", task("other")), 0);
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.node("a").unwrap().task, task("key"));
}

#[test]
fn edges_need_existing_nodes() {
    let mut graph = chain();
    assert!(!graph.add_edge(0, 9, EdgeKind::Sequence));
    assert!(graph.add_edge(0, 1, EdgeKind::Sequence));
    assert_eq!(graph.edges.len(), 2);
}

#[test]
fn roots_and_order() {
    let graph = chain();
    assert_eq!(graph.roots(), vec![0]);
    assert_eq!(graph.topological_order(), Some(vec![0, 1, 2]));
    assert_eq!(graph.successors(1).count(), 1);
    assert_eq!(graph.predecessors(0).count(), 0);
}

#[test]
fn cycles_have_no_order() {
    let mut graph = chain();
    graph.add_edge(2, 0, EdgeKind::SequenceOr);
    assert_eq!(graph.topological_order(), None);
    assert!(graph.roots().is_empty());
}
