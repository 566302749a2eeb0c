//! The [`Reflect`] trait and its implementations for std and chrono types

use crate::value::{FloatKind, IntKind, MapKind, PointerKind, SeqKind, TypeShape, Value};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// Introspection entry point used by the generator
///
/// Usually derived with `#[derive(Reflect)]`. Hand-written implementations only need
/// [`type_shape`](Reflect::type_shape) and [`reflect`](Reflect::reflect).
///
/// # Example
///
/// ```
/// use structgen_core::{FieldValue, Reflect, StructRef, StructValue, TypeShape, Value};
///
/// struct Tag {
///     slug: String,
/// }
///
/// impl Reflect for Tag {
///     fn type_shape() -> TypeShape {
///         TypeShape::Struct(StructRef::new("Tag", module_path!()))
///     }
///
///     fn reflect(&self) -> Value {
///         Value::Struct(
///             StructValue::new(StructRef::new("Tag", module_path!()))
///                 .with_field(FieldValue::of("slug", &self.slug)),
///         )
///     }
/// }
///
/// let tag = Tag { slug: "go".into() };
/// assert!(tag.reflect().as_struct().is_some());
/// ```
pub trait Reflect {
    /// Declared type of `Self`
    fn type_shape() -> TypeShape;

    /// Reflect this instance
    fn reflect(&self) -> Value;

    /// Declared type of `&'static Self`
    ///
    /// Overridden by `str` and `[T]`, whose borrowed forms are first-class shapes
    fn ref_type_shape() -> TypeShape {
        TypeShape::pointer(PointerKind::Ref, Self::type_shape())
    }

    /// Reflect a `&Self` borrow of this instance
    fn reflect_ref(&self) -> Value {
        Value::Pointer {
            kind: PointerKind::Ref,
            pointee: Box::new(self.reflect()),
        }
    }
}

impl Reflect for bool {
    fn type_shape() -> TypeShape {
        TypeShape::Bool
    }

    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for char {
    fn type_shape() -> TypeShape {
        TypeShape::Char
    }

    fn reflect(&self) -> Value {
        Value::Char(*self)
    }
}

macro_rules! reflect_signed {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_shape() -> TypeShape {
                    TypeShape::Int(IntKind::$kind)
                }

                fn reflect(&self) -> Value {
                    Value::Int {
                        kind: IntKind::$kind,
                        value: *self as i128,
                    }
                }
            }
        )*
    };
}

macro_rules! reflect_unsigned {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_shape() -> TypeShape {
                    TypeShape::Int(IntKind::$kind)
                }

                fn reflect(&self) -> Value {
                    Value::Uint {
                        kind: IntKind::$kind,
                        value: *self as u128,
                    }
                }
            }
        )*
    };
}

reflect_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128, isize => Isize);
reflect_unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128, usize => Usize);

impl Reflect for f32 {
    fn type_shape() -> TypeShape {
        TypeShape::Float(FloatKind::F32)
    }

    fn reflect(&self) -> Value {
        Value::Float {
            kind: FloatKind::F32,
            value: f64::from(*self),
        }
    }
}

impl Reflect for f64 {
    fn type_shape() -> TypeShape {
        TypeShape::Float(FloatKind::F64)
    }

    fn reflect(&self) -> Value {
        Value::Float {
            kind: FloatKind::F64,
            value: *self,
        }
    }
}

impl Reflect for String {
    fn type_shape() -> TypeShape {
        TypeShape::String
    }

    fn reflect(&self) -> Value {
        Value::String(self.clone())
    }
}

// `str` and `[T]` only exist behind a reference, so they reflect as their borrowed form.
impl Reflect for str {
    fn type_shape() -> TypeShape {
        TypeShape::Str
    }

    fn reflect(&self) -> Value {
        Value::Str(self.to_string())
    }

    fn ref_type_shape() -> TypeShape {
        Self::type_shape()
    }

    fn reflect_ref(&self) -> Value {
        self.reflect()
    }
}

impl<T: Reflect> Reflect for [T] {
    fn type_shape() -> TypeShape {
        TypeShape::sequence(SeqKind::Slice, T::type_shape())
    }

    fn reflect(&self) -> Value {
        Value::Sequence {
            kind: SeqKind::Slice,
            elem: T::type_shape(),
            items: self.iter().map(Reflect::reflect).collect(),
        }
    }

    fn ref_type_shape() -> TypeShape {
        Self::type_shape()
    }

    fn reflect_ref(&self) -> Value {
        self.reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn type_shape() -> TypeShape {
        T::ref_type_shape()
    }

    fn reflect(&self) -> Value {
        (**self).reflect_ref()
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn type_shape() -> TypeShape {
        TypeShape::pointer(PointerKind::Box, T::type_shape())
    }

    fn reflect(&self) -> Value {
        Value::Pointer {
            kind: PointerKind::Box,
            pointee: Box::new((**self).reflect()),
        }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_shape() -> TypeShape {
        TypeShape::optional(T::type_shape())
    }

    fn reflect(&self) -> Value {
        Value::Optional {
            inner: T::type_shape(),
            value: self.as_ref().map(|v| Box::new(v.reflect())),
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_shape() -> TypeShape {
        TypeShape::sequence(SeqKind::Vec, T::type_shape())
    }

    fn reflect(&self) -> Value {
        Value::Sequence {
            kind: SeqKind::Vec,
            elem: T::type_shape(),
            items: self.iter().map(Reflect::reflect).collect(),
        }
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_shape() -> TypeShape {
        TypeShape::sequence(SeqKind::Array(N), T::type_shape())
    }

    fn reflect(&self) -> Value {
        Value::Sequence {
            kind: SeqKind::Array(N),
            elem: T::type_shape(),
            items: self.iter().map(Reflect::reflect).collect(),
        }
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_shape() -> TypeShape {
        TypeShape::map(MapKind::BTree, K::type_shape(), V::type_shape())
    }

    fn reflect(&self) -> Value {
        Value::Map {
            kind: MapKind::BTree,
            key: K::type_shape(),
            value: V::type_shape(),
            entries: self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect(),
        }
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn type_shape() -> TypeShape {
        TypeShape::map(MapKind::Hash, K::type_shape(), V::type_shape())
    }

    fn reflect(&self) -> Value {
        Value::Map {
            kind: MapKind::Hash,
            key: K::type_shape(),
            value: V::type_shape(),
            entries: self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect(),
        }
    }
}

impl Reflect for DateTime<Utc> {
    fn type_shape() -> TypeShape {
        TypeShape::Timestamp
    }

    fn reflect(&self) -> Value {
        Value::Timestamp(*self)
    }
}
