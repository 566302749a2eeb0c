#![allow(non_snake_case)]

use super::*;

fn post_kind() -> StructRef {
    StructRef::new("Post", "blog::model")
}

#[test]
fn GeneratorConfig___default___has_expected_values() {
    let config = GeneratorConfig::default();

    assert_eq!(config.module_name, "generated");
    assert_eq!(
        config.identifier_fields,
        vec!["id", "name", "slug", "title", "key", "code"]
    );
    assert_eq!(config.declaration_style, DeclarationStyle::Auto);
    assert!(config.type_name.is_none());
    assert!(config.custom_identifier.is_none());
}

#[test]
fn GeneratorConfig___from_empty_bytes___returns_defaults() {
    let config = GeneratorConfig::from_json(&[]).unwrap();

    assert_eq!(config.module_name, "generated");
}

#[test]
fn GeneratorConfig___from_json___parses_declaration_style() {
    let json = r#"{"declaration_style": "static"}"#;

    let config = GeneratorConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.declaration_style, DeclarationStyle::Static);
}

#[test]
fn GeneratorConfig___from_json_invalid___returns_config_error() {
    let result = GeneratorConfig::from_json(b"{not json");

    assert!(matches!(result, Err(crate::GenerateError::Config(_))));
}

#[test]
fn GeneratorConfig___from_toml___parses_all_fields() {
    let text = r#"
        module_name = "data"
        type_name = "Article"
        output_file = "src/data/articles.rs"
        identifier_fields = ["slug"]
        crate_name = "blog"
        declaration_style = "lazy"
    "#;

    let config = GeneratorConfig::from_toml(text).unwrap();

    assert_eq!(config.module_name, "data");
    assert_eq!(config.type_name.as_deref(), Some("Article"));
    assert_eq!(config.output_file, Some(PathBuf::from("src/data/articles.rs")));
    assert_eq!(config.identifier_fields, vec!["slug"]);
    assert_eq!(config.crate_name.as_deref(), Some("blog"));
    assert_eq!(config.declaration_style, DeclarationStyle::Lazy);
}

#[test]
fn GeneratorConfig___from_toml_unknown_style___returns_config_error() {
    let result = GeneratorConfig::from_toml(r#"declaration_style = "eager""#);

    assert!(matches!(result, Err(crate::GenerateError::Config(_))));
}

#[test]
fn GeneratorConfig___resolve_without_overrides___infers_from_element_kind() {
    let config = GeneratorConfig::default();

    let resolved = config.resolve(&post_kind());

    assert_eq!(resolved.type_name, "Post");
    assert_eq!(resolved.constant_prefix, "Post");
    assert_eq!(resolved.var_prefix, "Post");
    assert_eq!(resolved.output_file, PathBuf::from("post_generated.rs"));
    assert!(!resolved.qualify_types);
}

#[test]
fn GeneratorConfig___resolve_with_type_name___prefixes_follow_type_name() {
    let config = GeneratorConfig::new().with_type_name("Article");

    let resolved = config.resolve(&post_kind());

    assert_eq!(resolved.type_name, "Article");
    assert_eq!(resolved.constant_prefix, "Article");
    assert_eq!(resolved.output_file, PathBuf::from("article_generated.rs"));
}

#[test]
fn GeneratorConfig___resolve_with_explicit_prefixes___keeps_them() {
    let config = GeneratorConfig::new()
        .with_constant_prefix("P")
        .with_var_prefix("Entry");

    let resolved = config.resolve(&post_kind());

    assert_eq!(resolved.constant_prefix, "P");
    assert_eq!(resolved.var_prefix, "Entry");
}

#[test]
fn GeneratorConfig___resolve_output_in_directory___enables_qualification() {
    let config = GeneratorConfig::new().with_output_file("src/generated/posts.rs");

    let resolved = config.resolve(&post_kind());

    assert!(resolved.qualify_types);
}

#[test]
fn GeneratorConfig___resolve_explicit_qualification___overrides_inference() {
    let config = GeneratorConfig::new()
        .with_output_file("src/generated/posts.rs")
        .with_qualify_types(false);

    let resolved = config.resolve(&post_kind());

    assert!(!resolved.qualify_types);
}

#[test]
fn GeneratorConfig___custom_identifier___carried_into_resolved() {
    let config = GeneratorConfig::new().with_custom_identifier(|record| record.ty.name.clone());

    let resolved = config.resolve(&post_kind());
    let name = resolved.custom_identifier.as_ref().map(|f| f(&StructValue::new(post_kind())));

    assert_eq!(name.as_deref(), Some("Post"));
}

#[test]
fn GeneratorConfig___debug___does_not_print_closure() {
    let config = GeneratorConfig::new().with_custom_identifier(|_| String::new());

    let debug = format!("{config:?}");

    assert!(debug.contains("custom_identifier: true"));
}

#[test]
fn DeclarationStyle___display___lowercase() {
    assert_eq!(DeclarationStyle::Auto.to_string(), "auto");
    assert_eq!(DeclarationStyle::Lazy.to_string(), "lazy");
    assert_eq!(DeclarationStyle::Static.to_string(), "static");
}
