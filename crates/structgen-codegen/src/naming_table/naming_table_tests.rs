#![allow(non_snake_case)]

use super::*;
use std::path::PathBuf;
use structgen_core::{DeclarationStyle, FieldValue, IntKind, StructValue, TypeShape, Value};

fn tag(id: &str, slug: &str) -> StructValue {
    StructValue::new(StructRef::new("Tag", "blog"))
        .with_field(FieldValue::new("id", TypeShape::String, Value::String(id.into())))
        .with_field(FieldValue::new("slug", TypeShape::String, Value::String(slug.into())))
}

fn counter(n: i128) -> StructValue {
    StructValue::new(StructRef::new("Counter", "blog")).with_field(FieldValue::new(
        "n",
        TypeShape::Int(IntKind::I32),
        Value::Int {
            kind: IntKind::I32,
            value: n,
        },
    ))
}

fn dataset(records: Vec<StructValue>, fields: &[&str]) -> Dataset {
    Dataset {
        label: "primary".into(),
        kind: records[0].ty.clone(),
        records,
        identifier_fields: fields.iter().map(|s| s.to_string()).collect(),
    }
}

fn assign(table: &mut NamingTable, data: &Dataset) -> usize {
    let mut resolver = IdentifierResolver::new(None);
    table.assign(data, DatasetNaming::reference(&data.kind), &mut resolver)
}

#[test]
fn assign___records___named_from_prefix_and_identifier() {
    let mut table = NamingTable::new();
    let data = dataset(vec![tag("t1", "go"), tag("t2", "rust")], &["slug"]);

    let index = assign(&mut table, &data);

    assert_eq!(table.item_name(index, 0), Some("TAG_GO"));
    assert_eq!(table.item_name(index, 1), Some("TAG_RUST"));
    assert_eq!(table.dataset(index).unwrap().collection, "ALL_TAGS");
}

#[test]
fn assign___colliding_identifiers___suffixed_names() {
    let mut table = NamingTable::new();
    let data = dataset(
        vec![tag("t1", "go-lang"), tag("t2", "go lang"), tag("t3", "GoLang")],
        &["slug"],
    );

    let index = assign(&mut table, &data);

    let names: Vec<&str> = (0..3).map(|i| table.item_name(index, i).unwrap()).collect();
    assert_eq!(names, vec!["TAG_GO_LANG", "TAG_GO_LANG_2", "TAG_GOLANG"]);
}

#[test]
fn assign___names_unique_across_datasets() {
    let mut table = NamingTable::new();
    let first = dataset(vec![tag("t1", "go")], &["slug"]);
    let second = dataset(vec![tag("t9", "go")], &["slug"]);

    let a = assign(&mut table, &first);
    let b = assign(&mut table, &second);

    assert_eq!(table.item_name(a, 0), Some("TAG_GO"));
    assert_eq!(table.item_name(b, 0), Some("TAG_GO_2"));
    assert_eq!(table.dataset(b).unwrap().collection, "ALL_TAGS_2");
}

#[test]
fn assign___id_field___constants_for_each_record() {
    let mut table = NamingTable::new();
    let data = dataset(vec![tag("t1", "go"), tag("", "rust")], &["slug"]);

    let index = assign(&mut table, &data);
    let records = &table.dataset(index).unwrap().records;

    assert_eq!(
        records[0].id_constant,
        Some(IdConstant {
            name: "TAG_GO_ID".into(),
            value: "t1".into(),
        })
    );
    assert_eq!(
        records[1].id_constant,
        Some(IdConstant {
            name: "TAG_RUST_ID".into(),
            value: "tag-2".into(),
        })
    );
}

#[test]
fn assign___no_id_field___no_constants() {
    let mut table = NamingTable::new();
    let data = dataset(vec![counter(1), counter(2)], &["id"]);

    let index = assign(&mut table, &data);

    assert!(
        table
            .dataset(index)
            .unwrap()
            .records
            .iter()
            .all(|r| r.id_constant.is_none())
    );
}

#[test]
fn assign___no_string_fields___synthetic_names() {
    let mut table = NamingTable::new();
    let data = dataset(vec![counter(1), counter(2)], &["id"]);

    let index = assign(&mut table, &data);

    assert_eq!(table.item_name(index, 0), Some("COUNTER_COUNTER1"));
    assert_eq!(table.item_name(index, 1), Some("COUNTER_COUNTER2"));
}

#[test]
fn primary___uses_resolved_prefixes() {
    let config = ResolvedConfig {
        module_name: "generated".into(),
        type_name: "Post".into(),
        constant_prefix: "Const".into(),
        var_prefix: "Item".into(),
        output_file: PathBuf::from("post_generated.rs"),
        identifier_fields: vec![],
        qualify_types: false,
        crate_name: None,
        declaration_style: DeclarationStyle::Auto,
        custom_identifier: None,
    };

    let naming = DatasetNaming::primary(&config);

    assert_eq!(naming, DatasetNaming::new("Post", "Const", "Item"));
}

#[test]
fn item_name___out_of_range___none() {
    let table = NamingTable::new();

    assert!(table.is_empty());
    assert_eq!(table.item_name(0, 0), None);
}
