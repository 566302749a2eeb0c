//! Relationship fields
//!
//! A field tagged with `#[structgen(source = "...")]` is populated from another dataset:
//! its sibling source field holds one identifier (or a list of them), and each identifier is
//! replaced by the item of the first record it names.
//!
//! Two field shapes are supported:
//!
//! | Source field | Tagged field |
//! |--------------|--------------|
//! | `String` / `&str` | `T`, `&'static T`, `Box<T>`, or an `Option` of those |
//! | `Vec` / slice of strings | `Vec` / `&'static [_]` of `T`, `&'static T`, or `Box<T>` |
//!
//! Anything else is skipped and the field keeps its own value. Identifiers without a match
//! degrade to an empty or default placeholder; neither case fails the run.

use crate::dataset::Dataset;
use crate::literal::{LiteralEmitter, RelationResolver};
use crate::naming_table::NamingTable;
use proc_macro2::TokenStream;
use quote::quote;
use std::cell::{Cell, RefCell};
use std::fmt;
use structgen_core::{
    DeclarationStyle, FieldValue, PointerKind, SeqKind, StructRef, StructValue, TypeShape,
};
use tracing::debug;

/// Position of a top-level record: (dataset index, record index)
pub type RecordId = (usize, usize);

/// How a matched record is stored in the tagged field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A copy of the record
    Value,
    /// `&'static T`
    Ref,
    /// `Box<T>`
    Box,
}

/// One or many matched records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single { optional: bool },
    Many(SeqKind),
}

/// A validated relationship between a tagged field and a target dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceBinding {
    pub field: String,
    pub source: String,
    pub target: StructRef,
    pub cardinality: Cardinality,
    pub link: LinkKind,
}

/// Identifiers held by the source field of a binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIds<'v> {
    One(&'v str),
    Many(Vec<&'v str>),
}

impl ReferenceBinding {
    /// Validate the shapes of a tagged field and its source field
    ///
    /// Returns `Ok(None)` when the field carries no relationship tag.
    pub fn analyze(owner: &StructValue, field: &FieldValue) -> Result<Option<Self>, SkipKind> {
        let Some(relation) = &field.relation else {
            return Ok(None);
        };

        let source = owner
            .field(&relation.source)
            .ok_or_else(|| SkipKind::MissingSource(relation.source.clone()))?;

        let (target, cardinality, link) = if source.shape.is_string() {
            let (target, link, optional) =
                single_target(&field.shape).ok_or(SkipKind::UnsupportedShape)?;
            (target, Cardinality::Single { optional }, link)
        } else if source.shape.is_string_sequence() {
            let (kind, target, link) = many_target(&field.shape).ok_or(SkipKind::UnsupportedShape)?;
            (target, Cardinality::Many(kind), link)
        } else {
            return Err(SkipKind::UnsupportedShape);
        };

        Ok(Some(Self {
            field: field.name.clone(),
            source: relation.source.clone(),
            target: target.clone(),
            cardinality,
            link,
        }))
    }

    /// Identifiers held by the source field
    pub fn source_ids<'v>(&self, owner: &'v StructValue) -> Option<SourceIds<'v>> {
        let source = owner.field(&self.source)?;
        match self.cardinality {
            Cardinality::Single { .. } => source.value.as_str().map(SourceIds::One),
            Cardinality::Many(_) => source.value.as_string_list().map(SourceIds::Many),
        }
    }
}

fn record_target(shape: &TypeShape) -> Option<(&StructRef, LinkKind)> {
    match shape {
        TypeShape::Struct(target) => Some((target, LinkKind::Value)),
        TypeShape::Pointer { kind, pointee } => match pointee.as_ref() {
            TypeShape::Struct(target) => Some((
                target,
                match kind {
                    PointerKind::Ref => LinkKind::Ref,
                    PointerKind::Box => LinkKind::Box,
                },
            )),
            _ => None,
        },
        _ => None,
    }
}

fn single_target(shape: &TypeShape) -> Option<(&StructRef, LinkKind, bool)> {
    match shape {
        TypeShape::Optional(inner) => record_target(inner).map(|(t, l)| (t, l, true)),
        other => record_target(other).map(|(t, l)| (t, l, false)),
    }
}

fn many_target(shape: &TypeShape) -> Option<(SeqKind, &StructRef, LinkKind)> {
    match shape {
        TypeShape::Sequence {
            kind: kind @ (SeqKind::Vec | SeqKind::Slice),
            elem,
        } => record_target(elem).map(|(t, l)| (*kind, t, l)),
        _ => None,
    }
}

/// Why a relationship field was not resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipKind {
    /// The source field named by the tag does not exist
    MissingSource(String),
    /// The tagged field or its source field has an unsupported shape
    UnsupportedShape,
    /// No dataset of the target kind was supplied
    UnknownTarget(String),
    /// No record of the target dataset has this identifier
    NoMatch(String),
    /// The target record is part of a reference cycle the declaration style cannot express
    Cycle(String),
}

/// An unresolved relationship, reported on the generated output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason {
    /// Item name of the top-level record being emitted
    pub record: String,
    /// `Kind.field` of the tagged field
    pub field: String,
    pub kind: SkipKind,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): ", self.field, self.record)?;
        match &self.kind {
            SkipKind::MissingSource(source) => write!(f, "source field `{source}` not found"),
            SkipKind::UnsupportedShape => write!(f, "unsupported field shape"),
            SkipKind::UnknownTarget(target) => write!(f, "no dataset of kind {target}"),
            SkipKind::NoMatch(id) => write!(f, "no record matches \"{id}\""),
            SkipKind::Cycle(item) => write!(f, "reference to {item} would form a cycle"),
        }
    }
}

/// Locate the dataset of a target kind, falling back to a match on the bare name
pub fn target_dataset(datasets: &[Dataset], target: &StructRef) -> Option<usize> {
    datasets
        .iter()
        .position(|d| d.kind == *target)
        .or_else(|| datasets.iter().position(|d| d.kind.name == target.name))
}

/// First record of `datasets[target]` with an identifier field equal to `id`
///
/// Each candidate's identifier fields are tried in priority order. The record `exclude`
/// never matches.
pub fn find_match(
    datasets: &[Dataset],
    target: usize,
    id: &str,
    exclude: Option<RecordId>,
) -> Option<usize> {
    let dataset = datasets.get(target)?;
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(i, _)| exclude != Some((target, *i)))
        .find(|(_, candidate)| {
            dataset
                .identifier_fields
                .iter()
                .any(|name| candidate.string_field(name) == Some(id))
        })
        .map(|(i, _)| i)
}

/// Decides whether an edge between two records may be emitted
pub trait EdgeFilter {
    fn is_blocked(&self, from: RecordId, to: RecordId, link: LinkKind) -> bool;
}

/// Outcome of resolving one tagged field
#[derive(Debug)]
pub enum Resolution {
    Resolved(TokenStream),
    /// The field was not resolved; `placeholder` replaces its value when present
    Skipped {
        placeholder: Option<TokenStream>,
        reason: SkipKind,
    },
}

/// Resolves relationship fields while record items are emitted
pub struct ReferenceEngine<'a> {
    datasets: &'a [Dataset],
    table: &'a NamingTable,
    lazy: bool,
    filter: Option<&'a dyn EdgeFilter>,
    current: Cell<Option<RecordId>>,
    unresolved: RefCell<Vec<SkipReason>>,
}

impl<'a> ReferenceEngine<'a> {
    /// `style` must be `Lazy` or `Static`; `Auto` is treated as `Lazy`
    pub fn new(datasets: &'a [Dataset], table: &'a NamingTable, style: DeclarationStyle) -> Self {
        Self {
            datasets,
            table,
            lazy: style != DeclarationStyle::Static,
            filter: None,
            current: Cell::new(None),
            unresolved: RefCell::new(Vec::new()),
        }
    }

    pub fn with_filter(mut self, filter: &'a dyn EdgeFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the top-level record whose item is being emitted
    pub fn begin_record(&self, id: RecordId) {
        self.current.set(Some(id));
    }

    /// Relationships left unresolved so far, in emission order
    pub fn take_unresolved(&self) -> Vec<SkipReason> {
        std::mem::take(&mut *self.unresolved.borrow_mut())
    }

    pub fn resolve_binding(
        &self,
        owner: &StructValue,
        field: &FieldValue,
        emitter: &LiteralEmitter<'_>,
    ) -> Resolution {
        let binding = match ReferenceBinding::analyze(owner, field) {
            Ok(Some(binding)) => binding,
            Ok(None) => {
                return Resolution::Skipped {
                    placeholder: None,
                    reason: SkipKind::UnsupportedShape,
                };
            }
            Err(reason) => {
                return Resolution::Skipped {
                    placeholder: None,
                    reason,
                };
            }
        };

        let Some(target) = target_dataset(self.datasets, &binding.target) else {
            return Resolution::Skipped {
                placeholder: Some(self.placeholder(&binding, field, emitter)),
                reason: SkipKind::UnknownTarget(binding.target.to_string()),
            };
        };

        let ids = match binding.source_ids(owner) {
            Some(ids) => ids,
            None => {
                return Resolution::Skipped {
                    placeholder: None,
                    reason: SkipKind::UnsupportedShape,
                };
            }
        };

        match ids {
            SourceIds::One(id) => match self.lookup(target, id, binding.link) {
                Ok(item) => Resolution::Resolved(self.single(&binding, &item, emitter)),
                Err(reason) => Resolution::Skipped {
                    placeholder: Some(self.placeholder(&binding, field, emitter)),
                    reason,
                },
            },
            SourceIds::Many(ids) => {
                let mut items = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.lookup(target, id, binding.link) {
                        Ok(item) => items.push(item),
                        Err(reason) => self.record_skip(owner, field, reason),
                    }
                }
                Resolution::Resolved(self.many(&binding, field, &items, emitter))
            }
        }
    }

    fn lookup(&self, target: usize, id: &str, link: LinkKind) -> Result<String, SkipKind> {
        if id.is_empty() {
            return Err(SkipKind::NoMatch(String::new()));
        }
        let current = self.current.get();
        let index = find_match(self.datasets, target, id, current)
            .ok_or_else(|| SkipKind::NoMatch(id.to_string()))?;
        let item = self
            .table
            .item_name(target, index)
            .ok_or_else(|| SkipKind::NoMatch(id.to_string()))?;

        if let (Some(filter), Some(from)) = (self.filter, current) {
            if filter.is_blocked(from, (target, index), link) {
                return Err(SkipKind::Cycle(item.to_string()));
            }
        }

        Ok(item.to_string())
    }

    /// Expression for one matched record, and whether it is const
    fn reference(&self, link: LinkKind, item: &str) -> (TokenStream, bool) {
        let name = crate::types::path_tokens(item);
        if self.lazy {
            let tokens = match link {
                LinkKind::Ref => quote!(&*#name),
                LinkKind::Value => quote!((*#name).clone()),
                LinkKind::Box => quote!(Box::new((*#name).clone())),
            };
            return (tokens, false);
        }
        match link {
            LinkKind::Ref => (quote!(&#name), true),
            LinkKind::Value => (quote!(#name), false),
            LinkKind::Box => (quote!(Box::new(#name)), false),
        }
    }

    fn single(
        &self,
        binding: &ReferenceBinding,
        item: &str,
        emitter: &LiteralEmitter<'_>,
    ) -> TokenStream {
        let (reference, is_const) = self.reference(binding.link, item);
        if !is_const {
            emitter.mark_non_const();
        }
        match binding.cardinality {
            Cardinality::Single { optional: true } => quote!(Some(#reference)),
            _ => reference,
        }
    }

    fn many(
        &self,
        binding: &ReferenceBinding,
        field: &FieldValue,
        items: &[String],
        emitter: &LiteralEmitter<'_>,
    ) -> TokenStream {
        let elem = element_type(&field.shape, emitter);
        let kind = match binding.cardinality {
            Cardinality::Many(kind) => kind,
            Cardinality::Single { .. } => SeqKind::Vec,
        };

        if items.is_empty() {
            return empty_sequence(kind, &elem);
        }

        let mut all_const = true;
        let refs: Vec<TokenStream> = items
            .iter()
            .map(|item| {
                let (tokens, is_const) = self.reference(binding.link, item);
                all_const &= is_const;
                tokens
            })
            .collect();

        if kind == SeqKind::Slice && emitter.is_const_context() && all_const {
            return quote!(&[#(#refs),*] as &[#elem]);
        }

        emitter.mark_non_const();
        if kind == SeqKind::Slice {
            quote!(Vec::<#elem>::from([#(#refs),*]).leak())
        } else {
            quote!(Vec::<#elem>::from([#(#refs),*]))
        }
    }

    /// Zero value for a field whose relationship could not be resolved
    fn placeholder(
        &self,
        binding: &ReferenceBinding,
        field: &FieldValue,
        emitter: &LiteralEmitter<'_>,
    ) -> TokenStream {
        match binding.cardinality {
            Cardinality::Many(kind) => {
                let elem = element_type(&field.shape, emitter);
                empty_sequence(kind, &elem)
            }
            Cardinality::Single { optional: true } => quote!(None),
            Cardinality::Single { optional: false } => {
                emitter.mark_non_const();
                match &field.shape {
                    TypeShape::Pointer { kind, pointee } => {
                        let ty = emitter.types().emit_type(pointee);
                        match kind {
                            PointerKind::Ref => quote!(Box::leak(Box::<#ty>::default())),
                            PointerKind::Box => quote!(Box::<#ty>::default()),
                        }
                    }
                    _ => quote!(Default::default()),
                }
            }
        }
    }

    fn record_skip(&self, owner: &StructValue, field: &FieldValue, reason: SkipKind) {
        let record = self
            .current
            .get()
            .and_then(|(d, r)| self.table.item_name(d, r))
            .unwrap_or_default()
            .to_string();
        let skip = SkipReason {
            record,
            field: format!("{}.{}", owner.ty.name, field.name),
            kind: reason,
        };
        debug!(reason = %skip, "unresolved relationship");
        self.unresolved.borrow_mut().push(skip);
    }
}

fn element_type(shape: &TypeShape, emitter: &LiteralEmitter<'_>) -> TokenStream {
    match shape {
        TypeShape::Sequence { elem, .. } => emitter.types().emit_type(elem),
        other => emitter.types().emit_type(other),
    }
}

fn empty_sequence(kind: SeqKind, elem: &TokenStream) -> TokenStream {
    match kind {
        SeqKind::Slice => quote!(&[] as &[#elem]),
        _ => quote!(Vec::<#elem>::new()),
    }
}

impl RelationResolver for ReferenceEngine<'_> {
    fn resolve(
        &self,
        owner: &StructValue,
        field: &FieldValue,
        emitter: &LiteralEmitter<'_>,
    ) -> Option<TokenStream> {
        match self.resolve_binding(owner, field, emitter) {
            Resolution::Resolved(tokens) => Some(tokens),
            Resolution::Skipped {
                placeholder,
                reason,
            } => {
                self.record_skip(owner, field, reason);
                placeholder
            }
        }
    }
}
