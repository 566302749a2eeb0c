#![allow(non_snake_case)]

use super::*;
use structgen_core::IntKind;
use test_case::test_case;

fn bare() -> TypeRenderer {
    TypeRenderer::new(false, "generated", None)
}

fn tag_shape() -> TypeShape {
    TypeShape::Struct(StructRef::new("Tag", "blog::model"))
}

#[test_case(TypeShape::Bool, quote!(bool) ; "bool")]
#[test_case(TypeShape::Char, quote!(char) ; "char")]
#[test_case(TypeShape::Int(IntKind::U64), quote!(u64) ; "int")]
#[test_case(TypeShape::Float(FloatKind::F32), quote!(f32) ; "float")]
#[test_case(TypeShape::Complex(FloatKind::F64), quote!(::num_complex::Complex<f64>) ; "complex")]
#[test_case(TypeShape::Str, quote!(&'static str) ; "str")]
#[test_case(TypeShape::String, quote!(String) ; "string")]
#[test_case(TypeShape::Timestamp, quote!(::chrono::DateTime<::chrono::Utc>) ; "timestamp")]
#[test_case(TypeShape::Dynamic, quote!(Option<Box<dyn ::std::any::Any + Send + Sync>>) ; "dynamic")]
#[test_case(TypeShape::Opaque("std::time::Duration".into()), quote!(std::time::Duration) ; "opaque")]
fn emit_type___leaf___renders(shape: TypeShape, expected: TokenStream) {
    assert_eq!(bare().emit_type(&shape).to_string(), expected.to_string());
}

#[test_case(SeqKind::Vec, quote!(Vec<Tag>) ; "vec")]
#[test_case(SeqKind::Slice, quote!(&'static [Tag]) ; "slice")]
#[test_case(SeqKind::Array(3), quote!([Tag; 3]) ; "array")]
fn emit_type___sequence___renders_container(kind: SeqKind, expected: TokenStream) {
    let shape = TypeShape::sequence(kind, tag_shape());

    assert_eq!(bare().emit_type(&shape).to_string(), expected.to_string());
}

#[test]
fn emit_type___map___std_collections_path() {
    let shape = TypeShape::map(MapKind::BTree, TypeShape::String, TypeShape::Bool);

    assert_eq!(
        bare().emit_type(&shape).to_string(),
        quote!(::std::collections::BTreeMap<String, bool>).to_string()
    );
}

#[test]
fn emit_type___nested_pointers___renders_wrappers() {
    let shape = TypeShape::optional(TypeShape::pointer(PointerKind::Ref, tag_shape()));
    let boxed = TypeShape::pointer(PointerKind::Box, tag_shape());

    assert_eq!(
        bare().emit_type(&shape).to_string(),
        quote!(Option<&'static Tag>).to_string()
    );
    assert_eq!(bare().emit_type(&boxed).to_string(), quote!(Box<Tag>).to_string());
}

#[test]
fn struct_path___qualification_off___bare_name() {
    let ty = StructRef::new("Tag", "blog::model");

    assert_eq!(bare().struct_path_string(&ty), "Tag");
}

#[test]
fn struct_path___other_module___absolute_path() {
    let renderer = TypeRenderer::new(true, "generated", None);
    let ty = StructRef::new("Tag", "blog::model");

    assert_eq!(renderer.struct_path_string(&ty), "::blog::model::Tag");
}

#[test]
fn struct_path___same_module___bare_name() {
    let renderer = TypeRenderer::new(true, "model", None);
    let ty = StructRef::new("Tag", "blog::model");

    assert_eq!(renderer.struct_path_string(&ty), "Tag");
}

#[test]
fn struct_path___configured_crate___crate_relative_path() {
    let renderer = TypeRenderer::new(true, "generated", Some("blog".into()));
    let ty = StructRef::new("Tag", "blog::model");

    assert_eq!(renderer.struct_path_string(&ty), "crate::model::Tag");
}

#[test]
fn struct_path___crate_root_type___crate_path() {
    let renderer = TypeRenderer::new(true, "generated", Some("blog".into()));
    let ty = StructRef::new("Tag", "blog");

    assert_eq!(renderer.struct_path_string(&ty), "crate::Tag");
}

#[test]
fn struct_path___unknown_module___bare_name() {
    let renderer = TypeRenderer::new(true, "generated", None);
    let ty = StructRef::new("Tag", "");

    assert_eq!(renderer.struct_path_string(&ty), "Tag");
}

#[test]
fn path_tokens___unlexable_text___string_literal() {
    assert_eq!(path_tokens("\"oops").to_string(), quote!("\"oops").to_string());
}
