#![allow(non_snake_case)]

use super::*;
use structgen_core::{FieldValue, PointerKind, SeqKind, StructRef, TypeShape};

fn str_field(name: &str, value: &str) -> FieldValue {
    FieldValue::new(name, TypeShape::Str, Value::Str(value.to_string()))
}

fn link_field(name: &str, source: &str, target: &str, kind: PointerKind) -> FieldValue {
    FieldValue::new(
        name,
        TypeShape::optional(TypeShape::pointer(
            kind,
            TypeShape::Struct(StructRef::new(target, "")),
        )),
        Value::Optional {
            inner: TypeShape::Bool,
            value: None,
        },
    )
    .with_relation(source)
}

/// A record of `kind` named `id` pointing at `target_id` in dataset `target`
fn node(kind: &str, id: &str, target: &str, target_id: &str, link: PointerKind) -> StructValue {
    StructValue::new(StructRef::new(kind, ""))
        .with_field(str_field("id", id))
        .with_field(str_field("next_id", target_id))
        .with_field(link_field("next", "next_id", target, link))
}

fn dataset(records: Vec<StructValue>) -> Dataset {
    Dataset {
        label: "test".into(),
        kind: records[0].ty.clone(),
        records,
        identifier_fields: vec!["id".into()],
    }
}

#[test]
fn collect_edges___matching_identifiers___edges_between_records() {
    let data = vec![
        dataset(vec![node("Post", "p1", "Author", "a1", PointerKind::Ref)]),
        dataset(vec![node("Author", "a1", "Post", "none", PointerKind::Ref)]),
    ];

    let edges = collect_edges(&data);

    assert_eq!(
        edges,
        vec![Edge {
            from: (0, 0),
            to: (1, 0),
            link: LinkKind::Ref,
        }]
    );
}

#[test]
fn collect_edges___nested_struct___attributed_to_top_level_record() {
    let inner = node("Post", "inner", "Author", "a1", PointerKind::Ref);
    let outer = StructValue::new(StructRef::new("Post", ""))
        .with_field(str_field("id", "p1"))
        .with_field(FieldValue::new(
            "draft",
            TypeShape::Struct(StructRef::new("Post", "")),
            Value::Struct(inner),
        ));
    let data = vec![
        dataset(vec![outer]),
        dataset(vec![node("Author", "a1", "Post", "none", PointerKind::Ref)]),
    ];

    let edges = collect_edges(&data);

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].from, (0, 0));
}

#[test]
fn build___mutual_references___cyclic_component() {
    let data = vec![
        dataset(vec![node("Post", "p1", "Author", "a1", PointerKind::Ref)]),
        dataset(vec![node("Author", "a1", "Post", "p1", PointerKind::Ref)]),
    ];

    let graph = LinkGraph::build(&data);

    assert!(graph.has_cycle());
    assert!(graph.same_component((0, 0), (1, 0)));
    assert_eq!(graph.edges().len(), 2);
}

#[test]
fn build___chain___acyclic() {
    let data = vec![
        dataset(vec![node("Post", "p1", "Author", "a1", PointerKind::Ref)]),
        dataset(vec![node("Author", "a1", "Post", "none", PointerKind::Ref)]),
    ];

    let graph = LinkGraph::build(&data);

    assert!(!graph.has_cycle());
    assert!(!graph.same_component((0, 0), (1, 0)));
}

#[test]
fn build___kinds_reference_each_other_without_record_cycle___acyclic() {
    let data = vec![
        dataset(vec![
            node("Post", "p1", "Author", "a1", PointerKind::Ref),
            node("Post", "p2", "Author", "none", PointerKind::Ref),
        ]),
        dataset(vec![node("Author", "a1", "Post", "p2", PointerKind::Ref)]),
    ];

    let graph = LinkGraph::build(&data);

    assert!(!graph.has_cycle());
}

#[test]
fn build___same_dataset_cycle___detected() {
    let data = vec![dataset(vec![
        node("Node", "a", "Node", "b", PointerKind::Ref),
        node("Node", "b", "Node", "c", PointerKind::Ref),
        node("Node", "c", "Node", "a", PointerKind::Ref),
    ])];

    let graph = LinkGraph::build(&data);

    assert!(graph.has_cycle());
    assert!(graph.same_component((0, 0), (0, 2)));
}

#[test]
fn build___self_identifier___never_links_to_itself() {
    let data = vec![dataset(vec![node("Node", "a", "Node", "a", PointerKind::Ref)])];

    let graph = LinkGraph::build(&data);

    assert!(graph.edges().is_empty());
    assert!(!graph.has_cycle());
}

#[test]
fn filter___lazy_mutual_references___blocks_only_the_edge_back_to_the_first_record() {
    let data = vec![
        dataset(vec![node("Post", "p1", "Author", "a1", PointerKind::Ref)]),
        dataset(vec![node("Author", "a1", "Post", "p1", PointerKind::Ref)]),
    ];
    let graph = LinkGraph::build(&data);

    let filter = graph.filter(DeclarationStyle::Lazy);

    assert!(!filter.is_blocked((0, 0), (1, 0), LinkKind::Ref));
    assert!(filter.is_blocked((1, 0), (0, 0), LinkKind::Ref));
}

#[test]
fn filter___lazy_three_record_ring___one_edge_blocked() {
    let data = vec![dataset(vec![
        node("Node", "a", "Node", "b", PointerKind::Box),
        node("Node", "b", "Node", "c", PointerKind::Box),
        node("Node", "c", "Node", "a", PointerKind::Box),
    ])];
    let graph = LinkGraph::build(&data);

    let filter = graph.filter(DeclarationStyle::Lazy);

    let blocked: Vec<_> = graph
        .edges()
        .iter()
        .filter(|e| filter.is_blocked(e.from, e.to, e.link))
        .map(|e| (e.from, e.to))
        .collect();
    assert_eq!(blocked, vec![((0, 2), (0, 0))]);
}

#[test]
fn filter___lazy_shared_target___every_edge_back_to_earlier_records_blocked() {
    let data = vec![
        dataset(vec![
            node("Post", "p1", "Author", "a1", PointerKind::Ref),
            node("Post", "p2", "Author", "a1", PointerKind::Ref),
        ]),
        dataset(vec![node("Author", "a1", "Post", "p2", PointerKind::Ref)]),
    ];
    let graph = LinkGraph::build(&data);

    let filter = graph.filter(DeclarationStyle::Lazy);

    assert!(!filter.is_blocked((0, 0), (1, 0), LinkKind::Ref));
    assert!(!filter.is_blocked((0, 1), (1, 0), LinkKind::Ref));
    assert!(filter.is_blocked((1, 0), (0, 1), LinkKind::Ref));
}

#[test]
fn filter___static___allows_refs_blocks_copies() {
    let data = vec![
        dataset(vec![node("Post", "p1", "Author", "a1", PointerKind::Ref)]),
        dataset(vec![node("Author", "a1", "Post", "p1", PointerKind::Box)]),
    ];
    let graph = LinkGraph::build(&data);

    let filter = graph.filter(DeclarationStyle::Static);

    assert!(!filter.is_blocked((0, 0), (1, 0), LinkKind::Ref));
    assert!(filter.is_blocked((1, 0), (0, 0), LinkKind::Box));
}

#[test]
fn filter___edge_outside_cycle___never_blocked() {
    let data = vec![
        dataset(vec![node("Post", "p1", "Author", "a1", PointerKind::Ref)]),
        dataset(vec![node("Author", "a1", "Post", "none", PointerKind::Ref)]),
    ];
    let graph = LinkGraph::build(&data);

    let filter = graph.filter(DeclarationStyle::Lazy);

    assert!(!filter.is_blocked((0, 0), (1, 0), LinkKind::Value));
}

#[test]
fn components___disconnected_nodes___distinct_components() {
    let adjacency = vec![vec![1], vec![], vec![]];
    let reverse = vec![vec![], vec![0], vec![]];

    let component = components(&adjacency, &reverse);

    assert_ne!(component[0], component[1]);
    assert_ne!(component[1], component[2]);
}

#[test]
fn components___two_cycles_joined_by_edge___two_components() {
    // 0 <-> 1 -> 2 <-> 3
    let adjacency = vec![vec![1], vec![0, 2], vec![3], vec![2]];
    let reverse = vec![vec![1], vec![0], vec![1, 3], vec![2]];

    let component = components(&adjacency, &reverse);

    assert_eq!(component[0], component[1]);
    assert_eq!(component[2], component[3]);
    assert_ne!(component[0], component[2]);
}
