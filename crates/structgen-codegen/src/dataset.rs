//! Validated record datasets

use structgen_core::{GenerateError, GenerateResult, StructRef, StructValue, Value};

/// An ordered sequence of records sharing one struct kind
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Label used in errors and logs (`primary`, `reference #1`, ...)
    pub label: String,

    pub kind: StructRef,

    pub records: Vec<StructValue>,

    /// Fields tried when naming and matching records of this dataset
    pub identifier_fields: Vec<String>,
}

impl Dataset {
    /// Validate a reflected value as a dataset
    ///
    /// The value must be a non-empty sequence whose elements are structs, or pointers to
    /// structs, of a single kind. Pointers around the sequence itself are looked through.
    pub fn from_value(
        label: impl Into<String>,
        value: Value,
        identifier_fields: Vec<String>,
    ) -> GenerateResult<Self> {
        let label = label.into();

        let mut value = value;
        let items = loop {
            match value {
                Value::Pointer { pointee, .. } => value = *pointee,
                Value::Sequence { items, .. } => break items,
                other => {
                    return Err(GenerateError::NotASequence {
                        dataset: label,
                        kind: other.kind(),
                    });
                }
            }
        };

        if items.is_empty() {
            return Err(GenerateError::EmptySequence { dataset: label });
        }

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let record = into_struct(item).map_err(|kind| GenerateError::UnsupportedElementKind {
                dataset: label.clone(),
                kind,
            })?;
            records.push(record);
        }

        let kind = records[0].ty.clone();
        if let Some(other) = records.iter().find(|r| r.ty != kind) {
            return Err(GenerateError::UnsupportedElementKind {
                dataset: label,
                kind: format!("mixed {} and {}", kind, other.ty),
            });
        }

        Ok(Self {
            label,
            kind,
            records,
            identifier_fields,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn into_struct(item: Value) -> Result<StructValue, String> {
    match item {
        Value::Struct(s) => Ok(s),
        Value::Pointer { pointee, .. } => match *pointee {
            Value::Struct(s) => Ok(s),
            other => Err(format!("pointer to {}", other.kind())),
        },
        other => Err(other.kind().to_string()),
    }
}
