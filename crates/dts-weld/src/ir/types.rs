//! Type references for dts-weld
//!
//! This module provides the closed set of native type shapes that can cross
//! the binding boundary, and the references other declarations use to point
//! at them.
//!
//! # Type Mapping Overview
//!
//! | Native Type | [`TypeRef`] | TypeScript |
//! |-------------|-------------|------------|
//! | `u8` .. `u32`, `i8` .. `i32`, `f32`, `f64` | `Primitive` | `number` |
//! | `u64`, `i64`, `usize`, `isize` | `Primitive` | `number` or `bigint` |
//! | `u128`, `i128` | `Primitive` | `bigint` |
//! | `bool` | `Primitive` | `boolean` |
//! | `String`, `&str`, `char` | `Primitive` | `string` |
//! | `Vec<T>` | `Vector(T)` | `T[]` |
//! | `Option<T>` | `Option(T)` | `T \| null` |
//! | `(A, B)` | `Tuple([A, B])` | `[A, B]` |
//! | `HashMap<K, V>` | `Map { K, V }` | `Record<K, V>` |
//! | `struct Foo` / `enum Foo` | `Named("Foo")` | `Foo` |
//!
//! A `Named` reference holds the native identifier, never the declaration
//! itself. Declarations live in a [`TypeUniverse`](crate::ir::TypeUniverse)
//! arena, which lets a struct refer to itself through a collection without
//! an ownership cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Native scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    // Unsigned integers
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    // Signed integers
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    // Floats
    F32,
    F64,
    // Other primitives
    Bool,
    Char,
    String,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order
    pub const ALL: [PrimitiveKind; 17] = [
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::U128,
        PrimitiveKind::Usize,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::I128,
        PrimitiveKind::Isize,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::String,
    ];

    /// Parse from a Rust type name
    pub fn from_rust_name(s: &str) -> Option<Self> {
        match s {
            "u8" => Some(PrimitiveKind::U8),
            "u16" => Some(PrimitiveKind::U16),
            "u32" => Some(PrimitiveKind::U32),
            "u64" => Some(PrimitiveKind::U64),
            "u128" => Some(PrimitiveKind::U128),
            "usize" => Some(PrimitiveKind::Usize),
            "i8" => Some(PrimitiveKind::I8),
            "i16" => Some(PrimitiveKind::I16),
            "i32" => Some(PrimitiveKind::I32),
            "i64" => Some(PrimitiveKind::I64),
            "i128" => Some(PrimitiveKind::I128),
            "isize" => Some(PrimitiveKind::Isize),
            "f32" => Some(PrimitiveKind::F32),
            "f64" => Some(PrimitiveKind::F64),
            "bool" => Some(PrimitiveKind::Bool),
            "char" => Some(PrimitiveKind::Char),
            "String" | "str" | "Path" | "PathBuf" => Some(PrimitiveKind::String),
            _ => None,
        }
    }

    /// Rust spelling of this kind
    pub fn rust_name(&self) -> &'static str {
        match self {
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::U128 => "u128",
            PrimitiveKind::Usize => "usize",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::I128 => "i128",
            PrimitiveKind::Isize => "isize",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::String => "String",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_name())
    }
}

/// Reference to a native type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Scalar type
    Primitive(PrimitiveKind),

    /// Struct, enum or alias, by native identifier
    Named(String),

    /// Vec<T> -> T[]
    Vector(Box<TypeRef>),

    /// Option<T> -> T | null
    Option(Box<TypeRef>),

    /// (A, B, C) -> [A, B, C]
    Tuple(Vec<TypeRef>),

    /// HashMap<K, V> -> Record<K, V>
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
}

impl TypeRef {
    /// Create a primitive type
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }

    /// Create a string type
    pub fn string() -> Self {
        TypeRef::Primitive(PrimitiveKind::String)
    }

    /// Create a boolean type
    pub fn bool() -> Self {
        TypeRef::Primitive(PrimitiveKind::Bool)
    }

    /// Create an f64 type
    pub fn f64() -> Self {
        TypeRef::Primitive(PrimitiveKind::F64)
    }

    /// Create a reference to a named declaration
    pub fn named(id: impl Into<String>) -> Self {
        TypeRef::Named(id.into())
    }

    /// Create a Vec<T> type
    pub fn vector(inner: TypeRef) -> Self {
        TypeRef::Vector(Box::new(inner))
    }

    /// Create an Option<T> type
    pub fn option(inner: TypeRef) -> Self {
        TypeRef::Option(Box::new(inner))
    }

    /// Create a tuple type
    pub fn tuple(elements: Vec<TypeRef>) -> Self {
        TypeRef::Tuple(elements)
    }

    /// Create a map type
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Check if this is an Option<T>
    pub fn is_option(&self) -> bool {
        matches!(self, TypeRef::Option(_))
    }

    /// Visit every `Named` identifier in this reference, outermost first
    pub fn for_each_named<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            TypeRef::Primitive(_) => {}
            TypeRef::Named(id) => f(id),
            TypeRef::Vector(inner) | TypeRef::Option(inner) => inner.for_each_named(f),
            TypeRef::Tuple(elements) => {
                for element in elements {
                    element.for_each_named(f);
                }
            }
            TypeRef::Map { key, value } => {
                key.for_each_named(f);
                value.for_each_named(f);
            }
        }
    }
}

/// Native spelling, used in diagnostics
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{}", kind),
            TypeRef::Named(id) => write!(f, "{}", id),
            TypeRef::Vector(inner) => write!(f, "Vec<{}>", inner),
            TypeRef::Option(inner) => write!(f, "Option<{}>", inner),
            TypeRef::Tuple(elements) => {
                let elements: Vec<String> = elements.iter().map(|t| t.to_string()).collect();
                if elements.len() == 1 {
                    write!(f, "({},)", elements[0])
                } else {
                    write!(f, "({})", elements.join(", "))
                }
            }
            TypeRef::Map { key, value } => write!(f, "HashMap<{}, {}>", key, value),
        }
    }
}
