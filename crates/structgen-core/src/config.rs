//! Generator configuration
//!
//! Every field is optional. Missing values are inferred from the primary dataset when a run
//! starts, producing a [`ResolvedConfig`].

use crate::error::GenerateResult;
use crate::value::{StructRef, StructValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Custom naming function: returns the identifier string for a record
pub type IdentifierFn = Arc<dyn Fn(&StructValue) -> String + Send + Sync>;

/// How record items are declared in the generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationStyle {
    /// `Static` when relationships between datasets form a cycle and every record can be
    /// built in a const context, `Lazy` otherwise
    #[default]
    Auto,
    /// `pub static NAME: LazyLock<Kind>`
    Lazy,
    /// `pub static NAME: Kind`, const-evaluated
    Static,
}

impl fmt::Display for DeclarationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationStyle::Auto => write!(f, "auto"),
            DeclarationStyle::Lazy => write!(f, "lazy"),
            DeclarationStyle::Static => write!(f, "static"),
        }
    }
}

/// Configuration for one generator
#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Name of the generated module (default: `generated`)
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Record type name; inferred from the primary dataset's element kind
    #[serde(default)]
    pub type_name: Option<String>,

    /// Prefix for identifier constants (e.g. `Post` for `POST_HELLO_ID`); defaults to the type name
    #[serde(default)]
    pub constant_prefix: Option<String>,

    /// Prefix for record items (e.g. `Post` for `POST_HELLO`); defaults to the type name
    #[serde(default)]
    pub var_prefix: Option<String>,

    /// Output path; defaults to `{type_lowercase}_generated.rs`
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Fields tried, in priority order, when naming a record or matching a relationship
    #[serde(default = "default_identifier_fields")]
    pub identifier_fields: Vec<String>,

    /// Refer to record types by module path. When unset, qualification is enabled
    /// if the output path has a directory component.
    #[serde(default)]
    pub qualify_types: Option<bool>,

    /// Name of the crate the generated file is compiled into. Types defined in that
    /// crate are rendered as `crate::…` paths.
    #[serde(default)]
    pub crate_name: Option<String>,

    #[serde(default)]
    pub declaration_style: DeclarationStyle,

    /// Takes precedence over `identifier_fields` when naming records
    #[serde(skip)]
    pub custom_identifier: Option<IdentifierFn>,
}

fn default_module_name() -> String {
    "generated".to_string()
}

fn default_identifier_fields() -> Vec<String> {
    ["id", "name", "slug", "title", "key", "code"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module_name: default_module_name(),
            type_name: None,
            constant_prefix: None,
            var_prefix: None,
            output_file: None,
            identifier_fields: default_identifier_fields(),
            qualify_types: None,
            crate_name: None,
            declaration_style: DeclarationStyle::default(),
            custom_identifier: None,
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("module_name", &self.module_name)
            .field("type_name", &self.type_name)
            .field("constant_prefix", &self.constant_prefix)
            .field("var_prefix", &self.var_prefix)
            .field("output_file", &self.output_file)
            .field("identifier_fields", &self.identifier_fields)
            .field("qualify_types", &self.qualify_types)
            .field("crate_name", &self.crate_name)
            .field("declaration_style", &self.declaration_style)
            .field("custom_identifier", &self.custom_identifier.is_some())
            .finish()
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from JSON; empty input yields the defaults
    pub fn from_json(bytes: &[u8]) -> GenerateResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse configuration from TOML
    pub fn from_toml(text: &str) -> GenerateResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    pub fn with_constant_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.constant_prefix = Some(prefix.into());
        self
    }

    pub fn with_var_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.var_prefix = Some(prefix.into());
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    pub fn with_identifier_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_qualify_types(mut self, qualify: bool) -> Self {
        self.qualify_types = Some(qualify);
        self
    }

    pub fn with_crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = Some(name.into());
        self
    }

    pub fn with_declaration_style(mut self, style: DeclarationStyle) -> Self {
        self.declaration_style = style;
        self
    }

    pub fn with_custom_identifier<F>(mut self, f: F) -> Self
    where
        F: Fn(&StructValue) -> String + Send + Sync + 'static,
    {
        self.custom_identifier = Some(Arc::new(f));
        self
    }

    /// Fill in every missing value from the primary dataset's element kind
    pub fn resolve(&self, element: &StructRef) -> ResolvedConfig {
        let type_name = self
            .type_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| element.name.clone());
        let constant_prefix = self
            .constant_prefix
            .clone()
            .unwrap_or_else(|| type_name.clone());
        let var_prefix = self
            .var_prefix
            .clone()
            .unwrap_or_else(|| type_name.clone());
        let output_file = self
            .output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_generated.rs", type_name.to_lowercase())));
        let qualify_types = self
            .qualify_types
            .unwrap_or_else(|| has_directory(&output_file));
        let module_name = if self.module_name.is_empty() {
            default_module_name()
        } else {
            self.module_name.clone()
        };

        ResolvedConfig {
            module_name,
            type_name,
            constant_prefix,
            var_prefix,
            output_file,
            identifier_fields: self.identifier_fields.clone(),
            qualify_types,
            crate_name: self.crate_name.clone(),
            declaration_style: self.declaration_style,
            custom_identifier: self.custom_identifier.clone(),
        }
    }
}

fn has_directory(path: &Path) -> bool {
    path.parent().is_some_and(|p| !p.as_os_str().is_empty())
}

/// Configuration with every inferred value filled in, valid for one run
#[derive(Clone)]
pub struct ResolvedConfig {
    pub module_name: String,
    pub type_name: String,
    pub constant_prefix: String,
    pub var_prefix: String,
    pub output_file: PathBuf,
    pub identifier_fields: Vec<String>,
    pub qualify_types: bool,
    pub crate_name: Option<String>,
    pub declaration_style: DeclarationStyle,
    pub custom_identifier: Option<IdentifierFn>,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("module_name", &self.module_name)
            .field("type_name", &self.type_name)
            .field("constant_prefix", &self.constant_prefix)
            .field("var_prefix", &self.var_prefix)
            .field("output_file", &self.output_file)
            .field("identifier_fields", &self.identifier_fields)
            .field("qualify_types", &self.qualify_types)
            .field("crate_name", &self.crate_name)
            .field("declaration_style", &self.declaration_style)
            .field("custom_identifier", &self.custom_identifier.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
