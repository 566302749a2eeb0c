//! Run-wide declaration names
//!
//! Every record of every dataset is named before any relationship is resolved, so a
//! reference can point at a record declared later in the file, or at a record that points
//! back.

use crate::dataset::Dataset;
use crate::identifier::IdentifierResolver;
use crate::naming::{collection_name, declaration_name, fragment};
use std::collections::HashSet;
use structgen_core::{ResolvedConfig, StructRef};
use tracing::trace;

/// Naming inputs for one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetNaming {
    /// Record type name used for the collection and for synthetic id values
    pub type_name: String,
    pub constant_prefix: String,
    pub var_prefix: String,
}

impl DatasetNaming {
    pub fn new(
        type_name: impl Into<String>,
        constant_prefix: impl Into<String>,
        var_prefix: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            constant_prefix: constant_prefix.into(),
            var_prefix: var_prefix.into(),
        }
    }

    /// Naming for the primary dataset, taken from the resolved configuration
    pub fn primary(config: &ResolvedConfig) -> Self {
        Self::new(
            config.type_name.clone(),
            config.constant_prefix.clone(),
            config.var_prefix.clone(),
        )
    }

    /// Naming for a reference dataset: everything follows the kind name
    pub fn reference(kind: &StructRef) -> Self {
        Self::new(kind.name.clone(), kind.name.clone(), kind.name.clone())
    }
}

/// Identifier constant for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdConstant {
    pub name: String,
    pub value: String,
}

/// Names assigned to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordName {
    /// Identifier string the name was derived from
    pub identifier: String,

    /// Name of the record's item
    pub item: String,

    pub id_constant: Option<IdConstant>,
}

/// Names assigned to one dataset
#[derive(Debug, Clone)]
pub struct DatasetNames {
    pub naming: DatasetNaming,
    pub records: Vec<RecordName>,

    /// Name of the "all records" collection
    pub collection: String,
}

/// Declaration names for every dataset of a run, unique across the whole file
#[derive(Debug, Default)]
pub struct NamingTable {
    datasets: Vec<DatasetNames>,
    used: HashSet<String>,
}

impl NamingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name every record of `dataset`, returning its index in the table
    pub fn assign(
        &mut self,
        dataset: &Dataset,
        naming: DatasetNaming,
        resolver: &mut IdentifierResolver,
    ) -> usize {
        let identifiers: Vec<String> = dataset
            .records
            .iter()
            .map(|record| resolver.resolve(record, &dataset.identifier_fields))
            .collect();

        let mut records: Vec<RecordName> = identifiers
            .into_iter()
            .map(|identifier| {
                let item = self.unique(declaration_name(&[
                    &naming.var_prefix,
                    &fragment(&identifier),
                ]));
                trace!(dataset = %dataset.label, %identifier, %item, "named record");
                RecordName {
                    identifier,
                    item,
                    id_constant: None,
                }
            })
            .collect();

        // The id field is looked up on the first record only
        let id_field = dataset.records.first().and_then(|first| {
            first
                .fields
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case("id"))
                .map(|f| f.name.clone())
        });

        if let Some(id_field) = id_field {
            let type_lower = naming.type_name.to_lowercase();
            for (i, (record, name)) in dataset.records.iter().zip(records.iter_mut()).enumerate() {
                let Some(id) = record.field(&id_field).and_then(|f| f.value.as_str()) else {
                    continue;
                };
                let value = if id.is_empty() {
                    format!("{type_lower}-{}", i + 1)
                } else {
                    id.to_string()
                };
                let constant = self.unique(declaration_name(&[
                    &naming.constant_prefix,
                    &fragment(&name.identifier),
                    "Id",
                ]));
                name.id_constant = Some(IdConstant {
                    name: constant,
                    value,
                });
            }
        }

        let collection = self.unique(collection_name(&naming.type_name));

        self.datasets.push(DatasetNames {
            naming,
            records,
            collection,
        });
        self.datasets.len() - 1
    }

    pub fn dataset(&self, index: usize) -> Option<&DatasetNames> {
        self.datasets.get(index)
    }

    /// Item name of one record
    pub fn item_name(&self, dataset: usize, record: usize) -> Option<&str> {
        self.datasets
            .get(dataset)
            .and_then(|d| d.records.get(record))
            .map(|r| r.item.as_str())
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    fn unique(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                trace!(%base, %candidate, "declaration name taken, suffixed");
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[path = "naming_table/naming_table_tests.rs"]
mod naming_table_tests;
