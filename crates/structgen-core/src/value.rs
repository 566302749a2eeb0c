//! Reflected value model
//!
//! Records handed to the generator are first reflected into a [`Value`] tree. Each node knows
//! its own shape, so the emitters can dispatch with a single exhaustive `match` instead of
//! probing types at runtime.
//!
//! ```text
//! Post { id: "p1", tag_slugs: ["go"], tags: [] }
//!     ↓ Reflect::reflect
//! Value::Struct(StructValue {
//!     ty: StructRef { name: "Post", .. },
//!     fields: [id: Str, tag_slugs: Sequence<String>, tags: Sequence<&Tag> (relation: tag_slugs)],
//! })
//! ```

use chrono::{DateTime, Utc};
use std::fmt;

/// Integer primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

impl IntKind {
    /// Rust spelling of the primitive
    pub fn name(self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::I128 => "i128",
            IntKind::Isize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::U128 => "u128",
            IntKind::Usize => "usize",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntKind::I8
                | IntKind::I16
                | IntKind::I32
                | IntKind::I64
                | IntKind::I128
                | IntKind::Isize
        )
    }
}

/// Floating point primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub fn name(self) -> &'static str {
        match self {
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
        }
    }
}

/// Container flavor of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    /// `[T; N]`
    Array(usize),
    /// `&'static [T]`
    Slice,
    /// `Vec<T>`
    Vec,
}

/// Map flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    BTree,
    Hash,
}

/// Pointer flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// `&'static T`
    Ref,
    /// `Box<T>`
    Box,
}

/// Name and defining module of a struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructRef {
    /// Bare type name (e.g. `Post`)
    pub name: String,

    /// Module that defines the type, as reported by `module_path!()`
    /// (e.g. `blog::model`). Empty when unknown.
    pub module_path: String,
}

impl StructRef {
    pub fn new(name: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_path: module_path.into(),
        }
    }
}

impl fmt::Display for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module_path.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.module_path, self.name)
        }
    }
}

/// Shape discriminator shared by [`TypeShape`] and [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Bool,
    Char,
    Int,
    Float,
    Complex,
    Str,
    String,
    Array,
    Slice,
    Vec,
    Map,
    Struct,
    Timestamp,
    Pointer,
    Optional,
    Dynamic,
    Opaque,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Bool => "bool",
            ShapeKind::Char => "char",
            ShapeKind::Int => "int",
            ShapeKind::Float => "float",
            ShapeKind::Complex => "complex",
            ShapeKind::Str => "str",
            ShapeKind::String => "string",
            ShapeKind::Array => "array",
            ShapeKind::Slice => "slice",
            ShapeKind::Vec => "vec",
            ShapeKind::Map => "map",
            ShapeKind::Struct => "struct",
            ShapeKind::Timestamp => "timestamp",
            ShapeKind::Pointer => "pointer",
            ShapeKind::Optional => "optional",
            ShapeKind::Dynamic => "dynamic",
            ShapeKind::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// Reflected type of a field or container element
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Bool,
    Char,
    Int(IntKind),
    Float(FloatKind),
    /// `num_complex::Complex<f32 | f64>`; no `Reflect` impl produces it, only hand-built values
    Complex(FloatKind),
    /// `&'static str`
    Str,
    String,
    Sequence {
        kind: SeqKind,
        elem: Box<TypeShape>,
    },
    Map {
        kind: MapKind,
        key: Box<TypeShape>,
        value: Box<TypeShape>,
    },
    Struct(StructRef),
    /// `chrono::DateTime<Utc>`
    Timestamp,
    Pointer {
        kind: PointerKind,
        pointee: Box<TypeShape>,
    },
    /// `Option<T>`
    Optional(Box<TypeShape>),
    /// `Option<Box<dyn Any + Send + Sync>>`; only hand-built values carry it
    Dynamic,
    /// Any other type, kept as its written path
    Opaque(String),
}

impl TypeShape {
    pub fn sequence(kind: SeqKind, elem: TypeShape) -> Self {
        TypeShape::Sequence {
            kind,
            elem: Box::new(elem),
        }
    }

    pub fn pointer(kind: PointerKind, pointee: TypeShape) -> Self {
        TypeShape::Pointer {
            kind,
            pointee: Box::new(pointee),
        }
    }

    pub fn map(kind: MapKind, key: TypeShape, value: TypeShape) -> Self {
        TypeShape::Map {
            kind,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn optional(inner: TypeShape) -> Self {
        TypeShape::Optional(Box::new(inner))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            TypeShape::Bool => ShapeKind::Bool,
            TypeShape::Char => ShapeKind::Char,
            TypeShape::Int(_) => ShapeKind::Int,
            TypeShape::Float(_) => ShapeKind::Float,
            TypeShape::Complex(_) => ShapeKind::Complex,
            TypeShape::Str => ShapeKind::Str,
            TypeShape::String => ShapeKind::String,
            TypeShape::Sequence { kind, .. } => match kind {
                SeqKind::Array(_) => ShapeKind::Array,
                SeqKind::Slice => ShapeKind::Slice,
                SeqKind::Vec => ShapeKind::Vec,
            },
            TypeShape::Map { .. } => ShapeKind::Map,
            TypeShape::Struct(_) => ShapeKind::Struct,
            TypeShape::Timestamp => ShapeKind::Timestamp,
            TypeShape::Pointer { .. } => ShapeKind::Pointer,
            TypeShape::Optional(_) => ShapeKind::Optional,
            TypeShape::Dynamic => ShapeKind::Dynamic,
            TypeShape::Opaque(_) => ShapeKind::Opaque,
        }
    }

    /// `&'static str` or `String`
    pub fn is_string(&self) -> bool {
        matches!(self, TypeShape::Str | TypeShape::String)
    }

    /// Vec or slice whose elements are strings
    pub fn is_string_sequence(&self) -> bool {
        match self {
            TypeShape::Sequence { kind, elem } => {
                !matches!(kind, SeqKind::Array(_)) && elem.is_string()
            }
            _ => false,
        }
    }
}

/// One field of a reflected struct
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub name: String,

    /// Declared type of the field
    pub shape: TypeShape,

    pub value: Value,

    /// Whether generated code may name the field (`pub` in the source struct)
    pub public: bool,

    /// Relationship tag, if the field is populated from another dataset
    pub relation: Option<Relation>,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, shape: TypeShape, value: Value) -> Self {
        Self {
            name: name.into(),
            shape,
            value,
            public: true,
            relation: None,
        }
    }

    /// Reflect a field from a live value
    pub fn of<T: crate::Reflect + ?Sized>(name: impl Into<String>, value: &T) -> Self {
        Self::new(name, T::type_shape(), value.reflect())
    }

    /// Mark the field as not nameable from generated code
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Tag the field as populated from the identifiers held in `source`
    pub fn with_relation(mut self, source: impl Into<String>) -> Self {
        self.relation = Some(Relation {
            source: source.into(),
        });
        self
    }
}

/// Relationship tag on a field: names the sibling field holding identifier(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub source: String,
}

/// A reflected struct instance
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub ty: StructRef,
    pub fields: Vec<FieldValue>,
}

impl StructValue {
    pub fn new(ty: StructRef) -> Self {
        Self {
            ty,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldValue) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Value of a string-typed field, if present
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(|f| f.value.as_str())
    }
}

/// A reflected value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Char(char),
    /// Signed integer
    Int {
        kind: IntKind,
        value: i128,
    },
    /// Unsigned integer
    Uint {
        kind: IntKind,
        value: u128,
    },
    Float {
        kind: FloatKind,
        value: f64,
    },
    Complex {
        kind: FloatKind,
        re: f64,
        im: f64,
    },
    /// `&'static str`
    Str(String),
    String(String),
    Sequence {
        kind: SeqKind,
        elem: TypeShape,
        items: Vec<Value>,
    },
    Map {
        kind: MapKind,
        key: TypeShape,
        value: TypeShape,
        entries: Vec<(Value, Value)>,
    },
    Struct(StructValue),
    Timestamp(DateTime<Utc>),
    Pointer {
        kind: PointerKind,
        pointee: Box<Value>,
    },
    Optional {
        inner: TypeShape,
        value: Option<Box<Value>>,
    },
    /// Type-erased value; `None` is the empty interface
    Dynamic(Option<Box<Value>>),
    /// Value the model cannot describe; kept as its display form
    Opaque {
        type_path: String,
        repr: String,
    },
}

impl Value {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Value::Bool(_) => ShapeKind::Bool,
            Value::Char(_) => ShapeKind::Char,
            Value::Int { .. } | Value::Uint { .. } => ShapeKind::Int,
            Value::Float { .. } => ShapeKind::Float,
            Value::Complex { .. } => ShapeKind::Complex,
            Value::Str(_) => ShapeKind::Str,
            Value::String(_) => ShapeKind::String,
            Value::Sequence { kind, .. } => match kind {
                SeqKind::Array(_) => ShapeKind::Array,
                SeqKind::Slice => ShapeKind::Slice,
                SeqKind::Vec => ShapeKind::Vec,
            },
            Value::Map { .. } => ShapeKind::Map,
            Value::Struct(_) => ShapeKind::Struct,
            Value::Timestamp(_) => ShapeKind::Timestamp,
            Value::Pointer { .. } => ShapeKind::Pointer,
            Value::Optional { .. } => ShapeKind::Optional,
            Value::Dynamic(_) => ShapeKind::Dynamic,
            Value::Opaque { .. } => ShapeKind::Opaque,
        }
    }

    /// Type of this value as it would be declared
    pub fn type_shape(&self) -> TypeShape {
        match self {
            Value::Bool(_) => TypeShape::Bool,
            Value::Char(_) => TypeShape::Char,
            Value::Int { kind, .. } | Value::Uint { kind, .. } => TypeShape::Int(*kind),
            Value::Float { kind, .. } => TypeShape::Float(*kind),
            Value::Complex { kind, .. } => TypeShape::Complex(*kind),
            Value::Str(_) => TypeShape::Str,
            Value::String(_) => TypeShape::String,
            Value::Sequence { kind, elem, .. } => TypeShape::sequence(*kind, elem.clone()),
            Value::Map {
                kind, key, value, ..
            } => TypeShape::map(*kind, key.clone(), value.clone()),
            Value::Struct(s) => TypeShape::Struct(s.ty.clone()),
            Value::Timestamp(_) => TypeShape::Timestamp,
            Value::Pointer { kind, pointee } => TypeShape::pointer(*kind, pointee.type_shape()),
            Value::Optional { inner, .. } => TypeShape::optional(inner.clone()),
            Value::Dynamic(_) => TypeShape::Dynamic,
            Value::Opaque { type_path, .. } => TypeShape::Opaque(type_path.clone()),
        }
    }

    /// String content of a `Str` or `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The struct behind this value, looking through one level of pointer
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            Value::Pointer { pointee, .. } => match pointee.as_ref() {
                Value::Struct(s) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    /// Items of a sequence of strings; `None` if this is not one
    pub fn as_string_list(&self) -> Option<Vec<&str>> {
        match self {
            Value::Sequence { items, .. } => items.iter().map(Value::as_str).collect(),
            _ => None,
        }
    }

    /// Items of any sequence
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }
}
