//! Record identifiers
//!
//! An identifier is the human-readable string a record is named after, e.g. the `slug`
//! `"go-programming"` of a tag. [`crate::naming::fragment`] turns it into a name fragment.

use structgen_core::{IdentifierFn, StructValue};

/// Derives identifier strings for records
///
/// Lookup order:
/// 1. the custom identifier function, when configured and non-empty
/// 2. the first policy field holding a non-empty string
/// 3. the first non-empty string field in declaration order
/// 4. a synthetic `{Kind}-{n}` identifier, numbered per run starting at 1
pub struct IdentifierResolver {
    custom: Option<IdentifierFn>,
    synthetic: usize,
}

impl IdentifierResolver {
    pub fn new(custom: Option<IdentifierFn>) -> Self {
        Self {
            custom,
            synthetic: 0,
        }
    }

    pub fn resolve(&mut self, record: &StructValue, policy: &[String]) -> String {
        if let Some(custom) = &self.custom {
            let id = custom(record);
            if !id.is_empty() {
                return id;
            }
        }

        if let Some(id) = policy_identifier(record, policy) {
            return id.to_string();
        }

        if let Some(id) = record
            .fields
            .iter()
            .filter_map(|f| f.value.as_str())
            .find(|s| !s.is_empty())
        {
            return id.to_string();
        }

        self.synthetic += 1;
        format!("{}-{}", record.ty.name, self.synthetic)
    }

    /// Number of synthetic identifiers handed out so far
    pub fn synthetic_count(&self) -> usize {
        self.synthetic
    }
}

/// First policy field holding a non-empty string
pub fn policy_identifier<'r>(record: &'r StructValue, policy: &[String]) -> Option<&'r str> {
    policy
        .iter()
        .filter_map(|name| record.string_field(name))
        .find(|s| !s.is_empty())
}
