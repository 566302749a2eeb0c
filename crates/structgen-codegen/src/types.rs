//! Type expressions for reflected shapes

use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, quote};
use structgen_core::{
    FloatKind, MapKind, PointerKind, ResolvedConfig, SeqKind, StructRef, TypeShape,
};

/// Renders [`TypeShape`]s as Rust type tokens
///
/// Struct types are written as bare names unless qualification is enabled and the
/// type lives outside the generated module.
#[derive(Debug, Clone)]
pub struct TypeRenderer {
    qualify: bool,
    module_name: String,
    crate_name: Option<String>,
}

impl TypeRenderer {
    pub fn new(qualify: bool, module_name: impl Into<String>, crate_name: Option<String>) -> Self {
        Self {
            qualify,
            module_name: module_name.into(),
            crate_name,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            config.qualify_types,
            config.module_name.clone(),
            config.crate_name.clone(),
        )
    }

    /// Render a type expression
    pub fn emit_type(&self, shape: &TypeShape) -> TokenStream {
        match shape {
            TypeShape::Bool => quote!(bool),
            TypeShape::Char => quote!(char),
            TypeShape::Int(kind) => path_tokens(kind.name()),
            TypeShape::Float(kind) => path_tokens(kind.name()),
            TypeShape::Complex(kind) => {
                let float = float_type(*kind);
                quote!(::num_complex::Complex<#float>)
            }
            TypeShape::Str => quote!(&'static str),
            TypeShape::String => quote!(String),
            TypeShape::Sequence { kind, elem } => {
                let elem = self.emit_type(elem);
                match kind {
                    SeqKind::Array(len) => {
                        let len = Literal::usize_unsuffixed(*len);
                        quote!([#elem; #len])
                    }
                    SeqKind::Slice => quote!(&'static [#elem]),
                    SeqKind::Vec => quote!(Vec<#elem>),
                }
            }
            TypeShape::Map { kind, key, value } => {
                let map = map_path(*kind);
                let key = self.emit_type(key);
                let value = self.emit_type(value);
                quote!(#map<#key, #value>)
            }
            TypeShape::Struct(ty) => self.struct_path(ty),
            TypeShape::Timestamp => quote!(::chrono::DateTime<::chrono::Utc>),
            TypeShape::Pointer { kind, pointee } => {
                let pointee = self.emit_type(pointee);
                match kind {
                    PointerKind::Ref => quote!(&'static #pointee),
                    PointerKind::Box => quote!(Box<#pointee>),
                }
            }
            TypeShape::Optional(inner) => {
                let inner = self.emit_type(inner);
                quote!(Option<#inner>)
            }
            TypeShape::Dynamic => {
                quote!(Option<Box<dyn ::std::any::Any + Send + Sync>>)
            }
            TypeShape::Opaque(path) => path_tokens(path),
        }
    }

    /// Path to a struct type, qualified when it lives in another module
    pub fn struct_path(&self, ty: &StructRef) -> TokenStream {
        path_tokens(&self.struct_path_string(ty))
    }

    pub(crate) fn struct_path_string(&self, ty: &StructRef) -> String {
        if !self.needs_qualification(ty) {
            return ty.name.clone();
        }

        let mut segments = ty.module_path.split("::");
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        let root = match &self.crate_name {
            Some(name) if name == first => "crate".to_string(),
            _ => format!("::{first}"),
        };

        let mut path = root;
        for segment in rest {
            path.push_str("::");
            path.push_str(segment);
        }
        path.push_str("::");
        path.push_str(&ty.name);
        path
    }

    fn needs_qualification(&self, ty: &StructRef) -> bool {
        if !self.qualify || ty.module_path.is_empty() {
            return false;
        }
        let last = ty.module_path.rsplit("::").next().unwrap_or_default();
        last != self.module_name
    }
}

fn float_type(kind: FloatKind) -> TokenStream {
    path_tokens(kind.name())
}

pub(crate) fn map_path(kind: MapKind) -> TokenStream {
    match kind {
        MapKind::BTree => quote!(::std::collections::BTreeMap),
        MapKind::Hash => quote!(::std::collections::HashMap),
    }
}

/// Tokens for a path or identifier written as text
///
/// Text that does not lex is kept as a string literal, which fails the final parse
/// with a render error instead of panicking here.
pub(crate) fn path_tokens(path: &str) -> TokenStream {
    match path.parse::<TokenStream>() {
        Ok(tokens) if !tokens.is_empty() => tokens,
        _ => Literal::string(path).into_token_stream(),
    }
}

#[cfg(test)]
#[path = "types/types_tests.rs"]
mod types_tests;
