//! Rust expressions for reflected values
//!
//! The emitter walks a [`Value`] tree and produces an expression that rebuilds it. While
//! emitting it tracks whether everything written so far could appear in a `static`
//! initializer, which the generator uses to pick a declaration style.

use crate::types::{TypeRenderer, map_path, path_tokens};
use chrono::{Datelike, Timelike};
use proc_macro2::{Literal, Span, TokenStream};
use quote::{ToTokens, quote};
use std::cell::Cell;
use structgen_core::{
    FieldValue, FloatKind, IntKind, MapKind, PointerKind, SeqKind, StructValue, TypeShape, Value,
};

/// Hook for fields populated from another dataset
///
/// Returning `None` lets the emitter render the field's own value.
pub trait RelationResolver {
    fn resolve(
        &self,
        owner: &StructValue,
        field: &FieldValue,
        emitter: &LiteralEmitter<'_>,
    ) -> Option<TokenStream>;
}

/// Renders [`Value`]s as Rust expressions
pub struct LiteralEmitter<'a> {
    types: &'a TypeRenderer,
    relations: Option<&'a dyn RelationResolver>,
    const_context: bool,
    non_const: Cell<bool>,
}

impl<'a> LiteralEmitter<'a> {
    /// Create an emitter
    ///
    /// With `const_context` set, borrowed values are written as plain `&expr` so they are
    /// promoted to `'static` inside a `static` initializer. Otherwise they are leaked.
    pub fn new(types: &'a TypeRenderer, const_context: bool) -> Self {
        Self {
            types,
            relations: None,
            const_context,
            non_const: Cell::new(false),
        }
    }

    pub fn with_relations(mut self, relations: &'a dyn RelationResolver) -> Self {
        self.relations = Some(relations);
        self
    }

    pub fn types(&self) -> &TypeRenderer {
        self.types
    }

    pub fn is_const_context(&self) -> bool {
        self.const_context
    }

    /// Whether every expression emitted since the last [`reset`](Self::reset) is const
    pub fn is_const(&self) -> bool {
        !self.non_const.get()
    }

    pub fn reset(&self) {
        self.non_const.set(false);
    }

    /// Record that the current expression cannot be evaluated in a const context
    pub fn mark_non_const(&self) {
        self.non_const.set(true);
    }

    /// Emit `value` and report whether that expression alone is const
    pub fn emit_tracked(&self, value: &Value) -> (TokenStream, bool) {
        let outer = self.non_const.replace(false);
        let tokens = self.emit_value(value);
        let inner_non_const = self.non_const.get();
        self.non_const.set(outer || inner_non_const);
        (tokens, !inner_non_const)
    }

    /// Render a value as an expression
    pub fn emit_value(&self, value: &Value) -> TokenStream {
        match value {
            Value::Bool(b) => b.into_token_stream(),
            Value::Char(c) => Literal::character(*c).into_token_stream(),
            Value::Int { kind, value } => signed_literal(*kind, *value),
            Value::Uint { kind, value } => int_literal(false, *value, kind.name()),
            Value::Float { kind, value } => float_literal(*kind, *value),
            Value::Complex { kind, re, im } => {
                let float = path_tokens(kind.name());
                let re = float_literal(*kind, *re);
                let im = float_literal(*kind, *im);
                quote!(::num_complex::Complex::<#float>::new(#re, #im))
            }
            Value::Str(s) => Literal::string(s).into_token_stream(),
            Value::String(s) => self.emit_string(s),
            Value::Sequence { kind, elem, items } => self.emit_sequence(*kind, elem, items),
            Value::Map {
                kind,
                key,
                value,
                entries,
            } => self.emit_map(*kind, key, value, entries),
            Value::Struct(s) => self.emit_struct(s),
            Value::Timestamp(ts) => self.emit_timestamp(ts),
            Value::Pointer { kind, pointee } => self.emit_pointer(*kind, pointee),
            Value::Optional { value, .. } => match value {
                None => quote!(None),
                Some(inner) => {
                    let inner = self.emit_value(inner);
                    quote!(Some(#inner))
                }
            },
            Value::Dynamic(value) => match value {
                None => quote!(None),
                Some(inner) => {
                    self.mark_non_const();
                    let inner = self.emit_value(inner);
                    quote!(Some(Box::new(#inner) as Box<dyn ::std::any::Any + Send + Sync>))
                }
            },
            Value::Opaque { repr, .. } => Literal::string(repr).into_token_stream(),
        }
    }

    fn emit_string(&self, s: &str) -> TokenStream {
        if s.is_empty() {
            return quote!(String::new());
        }
        self.mark_non_const();
        let lit = Literal::string(s);
        quote!(String::from(#lit))
    }

    fn emit_sequence(&self, kind: SeqKind, elem: &TypeShape, items: &[Value]) -> TokenStream {
        let elem_ty = self.types.emit_type(elem);

        match kind {
            SeqKind::Array(_) => {
                let items = items.iter().map(|item| self.emit_value(item));
                quote!([#(#items),*])
            }
            SeqKind::Vec => {
                if items.is_empty() {
                    return quote!(Vec::<#elem_ty>::new());
                }
                self.mark_non_const();
                let items = items.iter().map(|item| self.emit_value(item));
                quote!(Vec::<#elem_ty>::from([#(#items),*]))
            }
            SeqKind::Slice => {
                if items.is_empty() {
                    return quote!(&[] as &[#elem_ty]);
                }
                let mut all_const = true;
                let rendered: Vec<TokenStream> = items
                    .iter()
                    .map(|item| {
                        let (tokens, is_const) = self.emit_tracked(item);
                        all_const &= is_const;
                        tokens
                    })
                    .collect();
                if self.const_context && all_const {
                    quote!(&[#(#rendered),*] as &[#elem_ty])
                } else {
                    self.mark_non_const();
                    quote!(Vec::<#elem_ty>::from([#(#rendered),*]).leak())
                }
            }
        }
    }

    fn emit_map(
        &self,
        kind: MapKind,
        key: &TypeShape,
        value: &TypeShape,
        entries: &[(Value, Value)],
    ) -> TokenStream {
        let map = map_path(kind);
        let key_ty = self.types.emit_type(key);
        let value_ty = self.types.emit_type(value);

        if entries.is_empty() {
            if kind == MapKind::Hash {
                self.mark_non_const();
            }
            return quote!(#map::<#key_ty, #value_ty>::new());
        }

        self.mark_non_const();
        let mut rendered: Vec<(String, TokenStream)> = entries
            .iter()
            .map(|(k, v)| {
                let k = self.emit_value(k);
                let v = self.emit_value(v);
                let sort_key = k.to_string();
                (sort_key, quote!((#k, #v)))
            })
            .collect();
        rendered.sort_by(|a, b| a.0.cmp(&b.0));
        let pairs = rendered.into_iter().map(|(_, pair)| pair);

        quote!(#map::<#key_ty, #value_ty>::from([#(#pairs),*]))
    }

    /// Render a struct literal, resolving relationship fields through the hook
    pub fn emit_struct(&self, value: &StructValue) -> TokenStream {
        let path = self.types.struct_path(&value.ty);
        let mut rendered: Vec<Option<TokenStream>> = vec![None; value.fields.len()];
        let mut has_hidden = false;

        // Plain fields first so relationship fields see a fully named record
        for (i, field) in value.fields.iter().enumerate() {
            if !field.public {
                has_hidden = true;
                continue;
            }
            if field.relation.is_none() {
                rendered[i] = Some(self.emit_field(field));
            }
        }

        for (i, field) in value.fields.iter().enumerate() {
            if !field.public || field.relation.is_none() {
                continue;
            }
            let tokens = self
                .relations
                .and_then(|r| r.resolve(value, field, self))
                .unwrap_or_else(|| self.emit_value(&field.value));
            rendered[i] = Some(self.emit_named(&field.name, tokens));
        }

        let fields = rendered.into_iter().flatten();
        if has_hidden {
            self.mark_non_const();
            quote!(#path { #(#fields,)* ..Default::default() })
        } else {
            quote!(#path { #(#fields),* })
        }
    }

    fn emit_field(&self, field: &FieldValue) -> TokenStream {
        let tokens = self.emit_value(&field.value);
        self.emit_named(&field.name, tokens)
    }

    fn emit_named(&self, name: &str, tokens: TokenStream) -> TokenStream {
        let name = path_tokens(name);
        quote!(#name: #tokens)
    }

    fn emit_timestamp(&self, ts: &chrono::DateTime<chrono::Utc>) -> TokenStream {
        self.mark_non_const();
        let year = signed_unsuffixed(i64::from(ts.year()));
        let month = Literal::u32_unsuffixed(ts.month());
        let day = Literal::u32_unsuffixed(ts.day());
        let hour = Literal::u32_unsuffixed(ts.hour());
        let minute = Literal::u32_unsuffixed(ts.minute());
        let second = Literal::u32_unsuffixed(ts.second());
        let nano = Literal::u32_unsuffixed(ts.nanosecond());

        quote! {
            ::chrono::NaiveDate::from_ymd_opt(#year, #month, #day)
                .and_then(|d| d.and_hms_nano_opt(#hour, #minute, #second, #nano))
                .map(|t| t.and_utc())
                .unwrap_or_default()
        }
    }

    fn emit_pointer(&self, kind: PointerKind, pointee: &Value) -> TokenStream {
        match kind {
            PointerKind::Ref => {
                let (inner, is_const) = self.emit_tracked(pointee);
                if self.const_context && is_const {
                    quote!(&#inner)
                } else {
                    self.mark_non_const();
                    quote!(Box::leak(Box::new(#inner)))
                }
            }
            PointerKind::Box => {
                self.mark_non_const();
                let inner = self.emit_value(pointee);
                quote!(Box::new(#inner))
            }
        }
    }
}

fn signed_literal(kind: IntKind, value: i128) -> TokenStream {
    int_literal(value < 0, value.unsigned_abs(), kind.name())
}

fn int_literal(negative: bool, magnitude: u128, suffix: &str) -> TokenStream {
    let lit = syn::LitInt::new(&format!("{magnitude}{suffix}"), Span::call_site());
    if negative { quote!(-#lit) } else { quote!(#lit) }
}

fn signed_unsuffixed(value: i64) -> TokenStream {
    let lit = Literal::u64_unsuffixed(value.unsigned_abs());
    if value < 0 { quote!(-#lit) } else { quote!(#lit) }
}

fn float_literal(kind: FloatKind, value: f64) -> TokenStream {
    let ty = path_tokens(kind.name());
    if value.is_nan() {
        return quote!(#ty::NAN);
    }
    if value.is_infinite() {
        return if value > 0.0 {
            quote!(#ty::INFINITY)
        } else {
            quote!(#ty::NEG_INFINITY)
        };
    }

    let magnitude = match kind {
        FloatKind::F32 => format!("{:?}", value.abs() as f32),
        FloatKind::F64 => format!("{:?}", value.abs()),
    };
    let lit = syn::LitFloat::new(&format!("{magnitude}{}", kind.name()), Span::call_site());
    if value.is_sign_negative() {
        quote!(-#lit)
    } else {
        quote!(#lit)
    }
}
