//! structgen-macros - Derive macro for structgen
//!
//! This crate provides `#[derive(Reflect)]`, which implements `structgen::Reflect` for a
//! struct with named fields.
//!
//! Field attributes:
//! - `#[structgen(source = "field")]` - populate this field from the records whose
//!   identifiers are held in the sibling field `field`
//! - `#[structgen(skip)]` - hide the field from the generator; generated literals fill it
//!   with `Default::default()`
//!
//! Container attributes:
//! - `#[structgen(crate = "path")]` - path to the crate exporting `Reflect` (default `::structgen`)

use darling::ast::Data;
use darling::{FromDeriveInput, FromField};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, parse_quote, DeriveInput};

/// Options for the Reflect derive macro
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(structgen), supports(struct_named))]
struct ReflectOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: Data<(), ReflectField>,

    /// Path to the crate exporting the value model
    #[darling(rename = "crate", default)]
    krate: Option<syn::Path>,
}

#[derive(Debug, FromField)]
#[darling(attributes(structgen))]
struct ReflectField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    vis: syn::Visibility,

    /// Sibling field holding the identifier(s) this field is resolved from
    #[darling(default)]
    source: Option<String>,

    #[darling(default)]
    skip: bool,
}

impl ReflectField {
    /// Whether generated code in another module of the same crate can name the field
    fn is_nameable(&self) -> bool {
        match &self.vis {
            syn::Visibility::Public(_) => true,
            syn::Visibility::Restricted(restricted) => restricted.path.is_ident("crate"),
            syn::Visibility::Inherited => false,
        }
    }
}

/// Derive macro for record types
///
/// # Example
///
/// ```ignore
/// use structgen::Reflect;
///
/// #[derive(Reflect)]
/// pub struct Post {
///     pub id: String,
///     pub tag_slugs: Vec<String>,
///     #[structgen(source = "tag_slugs")]
///     pub tags: Vec<&'static Tag>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(structgen))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_reflect(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(e) => TokenStream::from(e.write_errors()),
    }
}

fn expand_reflect(input: &DeriveInput) -> darling::Result<TokenStream2> {
    let opts = ReflectOpts::from_derive_input(input)?;

    let krate = opts
        .krate
        .clone()
        .unwrap_or_else(|| parse_quote!(::structgen));
    let name = &opts.ident;
    let name_str = name.to_string();

    let fields = match &opts.data {
        Data::Struct(fields) => &fields.fields,
        Data::Enum(_) => {
            return Err(darling::Error::unsupported_shape("enum").with_span(name));
        }
    };

    let mut errors = darling::Error::accumulator();
    let mut field_exprs = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = ident.to_string();

        if field.skip {
            if field.source.is_some() {
                errors.push(
                    darling::Error::custom("`skip` and `source` cannot be combined").with_span(ident),
                );
            }
            let ty = &field.ty;
            field_exprs.push(quote! {
                #krate::FieldValue::new(
                    #field_name,
                    #krate::TypeShape::Opaque(::core::stringify!(#ty).to_string()),
                    #krate::Value::Opaque {
                        type_path: ::core::stringify!(#ty).to_string(),
                        repr: ::std::string::String::new(),
                    },
                )
                .private()
            });
            continue;
        }

        let mut expr = quote! { #krate::FieldValue::of(#field_name, &self.#ident) };

        if !field.is_nameable() {
            expr = quote! { #expr.private() };
        }

        if let Some(source) = &field.source {
            let known = fields
                .iter()
                .any(|f| f.ident.as_ref().is_some_and(|i| i == source.as_str()));
            if source == &field_name {
                errors.push(
                    darling::Error::custom("a field cannot be its own source").with_span(ident),
                );
            } else if !known {
                errors.push(
                    darling::Error::custom(format!("unknown source field `{source}`"))
                        .with_span(ident),
                );
            }
            expr = quote! { #expr.with_relation(#source) };
        }

        field_exprs.push(expr);
    }

    errors.finish()?;

    let mut generics = opts.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#krate::Reflect));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Reflect for #name #ty_generics #where_clause {
            fn type_shape() -> #krate::TypeShape {
                #krate::TypeShape::Struct(#krate::StructRef::new(#name_str, ::core::module_path!()))
            }

            fn reflect(&self) -> #krate::Value {
                #krate::Value::Struct(
                    #krate::StructValue::new(#krate::StructRef::new(#name_str, ::core::module_path!()))
                        #(.with_field(#field_exprs))*
                )
            }
        }
    })
}
