//! Generation runs
//!
//! A [`Generator`] takes one primary dataset and any number of reference datasets, and
//! renders them as a single Rust source file:
//!
//! ```text
//! pub const TAG_GO_ID: &str = "t1";
//! pub static TAG_GO: LazyLock<Tag> = LazyLock::new(|| Tag { .. });
//! pub static ALL_TAGS: LazyLock<Vec<&'static Tag>> = LazyLock::new(|| Vec::from([&*TAG_GO]));
//! ```
//!
//! Every record of every dataset is named before any item is emitted, so relationship
//! fields can reference records declared anywhere in the file.

use crate::dataset::Dataset;
use crate::identifier::IdentifierResolver;
use crate::link::LinkGraph;
use crate::literal::LiteralEmitter;
use crate::naming_table::{DatasetNaming, NamingTable};
use crate::reference::{ReferenceEngine, SkipReason};
use crate::render::render_file;
use crate::types::{TypeRenderer, path_tokens};
use proc_macro2::TokenStream;
use quote::quote;
use std::fs;
use std::path::PathBuf;
use structgen_core::{
    DeclarationStyle, GenerateError, GenerateResult, GenerationPhase, GeneratorConfig, Reflect,
    ResolvedConfig, Value,
};
use tracing::{debug, info, trace, warn};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GeneratedSource {
    /// Complete file contents, header included
    pub source: String,

    /// Declaration style the records were emitted with (never `Auto`)
    pub style: DeclarationStyle,

    /// Relationships that fell back to a placeholder
    pub unresolved: Vec<SkipReason>,

    /// Where [`Generator::generate`] writes the source
    pub output_file: PathBuf,
}

struct ReferenceInput {
    value: Value,
    identifier_fields: Option<Vec<String>>,
}

/// Renders datasets as Rust source
///
/// # Example
///
/// ```
/// use structgen_codegen::Generator;
/// use structgen_core::GeneratorConfig;
///
/// let mut generator = Generator::new(GeneratorConfig::default(), &vec![1u8, 2]);
///
/// // Records must be structs
/// assert!(generator.render().is_err());
/// ```
pub struct Generator {
    config: GeneratorConfig,
    primary: Value,
    references: Vec<ReferenceInput>,
    phase: GenerationPhase,
}

impl Generator {
    /// Create a generator for the primary dataset
    pub fn new<T: Reflect + ?Sized>(config: GeneratorConfig, data: &T) -> Self {
        Self::from_value(config, data.reflect())
    }

    /// Create a generator for a hand-built primary dataset
    pub fn from_value(config: GeneratorConfig, primary: Value) -> Self {
        Self {
            config,
            primary,
            references: Vec::new(),
            phase: GenerationPhase::Start,
        }
    }

    /// Add a reference dataset
    pub fn reference<T: Reflect + ?Sized>(self, data: &T) -> Self {
        self.reference_value(data.reflect())
    }

    /// Add a hand-built reference dataset
    pub fn reference_value(mut self, value: Value) -> Self {
        self.references.push(ReferenceInput {
            value,
            identifier_fields: None,
        });
        self
    }

    /// Add a reference dataset matched and named by its own identifier fields
    pub fn reference_with<T, I, S>(mut self, data: &T, identifier_fields: I) -> Self
    where
        T: Reflect + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references.push(ReferenceInput {
            value: data.reflect(),
            identifier_fields: Some(identifier_fields.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Phase reached by the last run
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Render the output without writing it
    pub fn render(&mut self) -> GenerateResult<GeneratedSource> {
        self.phase = GenerationPhase::Start;
        info!(references = self.references.len(), "starting generation");

        self.advance(GenerationPhase::ValidateInput);
        let datasets = match self.validate() {
            Ok(datasets) => datasets,
            Err(e) => {
                self.advance(GenerationPhase::Failed);
                return Err(e);
            }
        };
        let config = self.config.resolve(&datasets[0].kind);
        debug!(?config, "resolved configuration");

        let mut table = NamingTable::new();
        let mut identifiers = IdentifierResolver::new(config.custom_identifier.clone());

        self.advance(GenerationPhase::EmitPrimary);
        let primary = &datasets[0];
        table.assign(primary, DatasetNaming::primary(&config), &mut identifiers);
        debug!(dataset = %primary.label, kind = %primary.kind, records = primary.len(), "named dataset");

        self.advance(GenerationPhase::EmitReferences);
        for dataset in &datasets[1..] {
            table.assign(dataset, DatasetNaming::reference(&dataset.kind), &mut identifiers);
            debug!(dataset = %dataset.label, kind = %dataset.kind, records = dataset.len(), "named dataset");
        }

        self.advance(GenerationPhase::Link);
        let graph = LinkGraph::build(&datasets);
        debug!(
            edges = graph.edges().len(),
            cyclic = graph.has_cycle(),
            "linked records"
        );
        let types = TypeRenderer::from_config(&config);
        let items = Items {
            datasets: &datasets,
            table: &table,
            graph: &graph,
            types: &types,
        };
        let (style, emitted) = choose_style(&config, &items);
        info!(%style, "declaration style");

        self.advance(GenerationPhase::Render);
        let source = match render_file(emitted.tokens, &config.module_name, &config.type_name) {
            Ok(source) => source,
            Err(e) => {
                self.advance(GenerationPhase::Failed);
                return Err(e);
            }
        };

        self.advance(GenerationPhase::Done);
        info!(
            datasets = datasets.len(),
            unresolved = emitted.unresolved.len(),
            "generation finished"
        );

        Ok(GeneratedSource {
            source,
            style,
            unresolved: emitted.unresolved,
            output_file: config.output_file,
        })
    }

    /// Render the output and write it to the configured file
    pub fn generate(&mut self) -> GenerateResult<GeneratedSource> {
        let generated = self.render()?;
        let path = &generated.output_file;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, &generated.source).map_err(|source| GenerateError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = generated.source.len(), "wrote generated source");
        Ok(generated)
    }

    fn advance(&mut self, next: GenerationPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid phase transition {} -> {}",
            self.phase,
            next
        );
        trace!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }

    fn validate(&self) -> GenerateResult<Vec<Dataset>> {
        let primary = Dataset::from_value(
            "primary",
            self.primary.clone(),
            self.config.identifier_fields.clone(),
        )?;
        let mut datasets = vec![primary];

        for (i, input) in self.references.iter().enumerate() {
            let fields = input
                .identifier_fields
                .clone()
                .unwrap_or_else(|| self.config.identifier_fields.clone());
            let dataset = Dataset::from_value(format!("reference #{}", i + 1), input.value.clone(), fields)?;

            if datasets.iter().any(|d| d.kind == dataset.kind) {
                warn!(
                    dataset = %dataset.label,
                    kind = %dataset.kind,
                    "dataset kind already supplied, ignoring"
                );
                continue;
            }
            datasets.push(dataset);
        }

        Ok(datasets)
    }
}

/// Inputs shared by every emission attempt
struct Items<'a> {
    datasets: &'a [Dataset],
    table: &'a NamingTable,
    graph: &'a LinkGraph,
    types: &'a TypeRenderer,
}

struct Emitted {
    tokens: TokenStream,
    all_const: bool,
    /// Item name of the first record that is not const-evaluable
    first_runtime: Option<String>,
    unresolved: Vec<SkipReason>,
}

fn choose_style(config: &ResolvedConfig, items: &Items<'_>) -> (DeclarationStyle, Emitted) {
    match config.declaration_style {
        DeclarationStyle::Lazy => (DeclarationStyle::Lazy, items.emit(DeclarationStyle::Lazy)),
        DeclarationStyle::Static => {
            let emitted = items.emit(DeclarationStyle::Static);
            if emitted.all_const {
                return (DeclarationStyle::Static, emitted);
            }
            warn!(
                record = emitted.first_runtime.as_deref().unwrap_or_default(),
                "static declarations requested but records need runtime initialization, using lazy items"
            );
            (DeclarationStyle::Lazy, items.emit(DeclarationStyle::Lazy))
        }
        DeclarationStyle::Auto if items.graph.has_cycle() => {
            let emitted = items.emit(DeclarationStyle::Static);
            if emitted.all_const {
                return (DeclarationStyle::Static, emitted);
            }
            info!("records reference each other but are not const-evaluable, using lazy items");
            (DeclarationStyle::Lazy, items.emit(DeclarationStyle::Lazy))
        }
        DeclarationStyle::Auto => (DeclarationStyle::Lazy, items.emit(DeclarationStyle::Lazy)),
    }
}

impl Items<'_> {
    fn emit(&self, style: DeclarationStyle) -> Emitted {
        let lazy = style == DeclarationStyle::Lazy;
        let filter = self.graph.filter(style);
        let engine = ReferenceEngine::new(self.datasets, self.table, style).with_filter(&filter);
        let emitter = LiteralEmitter::new(self.types, !lazy).with_relations(&engine);

        let mut tokens = TokenStream::new();
        let mut all_const = true;
        let mut first_runtime = None;

        for (d, dataset) in self.datasets.iter().enumerate() {
            let Some(names) = self.table.dataset(d) else {
                continue;
            };
            let kind = self.types.struct_path(&dataset.kind);

            for constant in names.records.iter().filter_map(|r| r.id_constant.as_ref()) {
                let name = path_tokens(&constant.name);
                let value = &constant.value;
                tokens.extend(quote! {
                    pub const #name: &str = #value;
                });
            }

            for (r, (record, name)) in dataset.records.iter().zip(&names.records).enumerate() {
                engine.begin_record((d, r));
                emitter.reset();
                let expr = emitter.emit_struct(record);
                if all_const && !emitter.is_const() {
                    all_const = false;
                    first_runtime = Some(name.item.clone());
                }
                trace!(item = %name.item, const_eval = emitter.is_const(), "emitted record");

                let item = path_tokens(&name.item);
                tokens.extend(if lazy {
                    quote! {
                        pub static #item: ::std::sync::LazyLock<#kind> =
                            ::std::sync::LazyLock::new(|| #expr);
                    }
                } else {
                    quote! {
                        pub static #item: #kind = #expr;
                    }
                });
            }

            let collection = path_tokens(&names.collection);
            let doc = format!(" All `{}` records", dataset.kind.name);
            let members = names.records.iter().map(|r| path_tokens(&r.item));
            tokens.extend(if lazy {
                quote! {
                    #[doc = #doc]
                    pub static #collection: ::std::sync::LazyLock<Vec<&'static #kind>> =
                        ::std::sync::LazyLock::new(|| Vec::from([#(&*#members),*]));
                }
            } else {
                quote! {
                    #[doc = #doc]
                    pub static #collection: &[&#kind] = &[#(&#members),*];
                }
            });
        }

        Emitted {
            tokens,
            all_const,
            first_runtime,
            unresolved: engine.take_unresolved(),
        }
    }
}
