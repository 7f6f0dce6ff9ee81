//! Native descriptions and the type universe
//!
//! A [`NativeDescription`] is the input boundary: the structs, enums,
//! aliases and functions of one compilation unit, as supplied by a
//! collaborator (the [`source`](crate::source) front-end, a JSON document,
//! or hand-built with the builder methods).
//!
//! A [`TypeUniverse`] is the arena the resolver works against. Declarations
//! are stored once in a table and looked up by native identifier, so every
//! `TypeRef::Named` is an index, never an owning pointer.

use crate::error::{DuplicateIdentifierError, GenerateResult};
use crate::ir::{AliasDecl, EnumDecl, FunctionDecl, StructDecl, TypeDecl};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Structural description of one compilation unit's native API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NativeDescription {
    /// Type declarations in input order
    #[serde(default)]
    pub types: Vec<TypeDecl>,

    /// Root functions in input order
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

impl NativeDescription {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a description from JSON
    pub fn from_json(json: &str) -> GenerateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> GenerateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a struct
    pub fn struct_def(mut self, s: StructDecl) -> Self {
        self.types.push(TypeDecl::Struct(s));
        self
    }

    /// Add an enum
    pub fn enum_def(mut self, e: EnumDecl) -> Self {
        self.types.push(TypeDecl::Enum(e));
        self
    }

    /// Add a type alias
    pub fn alias_def(mut self, a: AliasDecl) -> Self {
        self.types.push(TypeDecl::Alias(a));
        self
    }

    /// Add a function
    pub fn function(mut self, f: FunctionDecl) -> Self {
        self.functions.push(f);
        self
    }

    /// Check the local shape of every declaration
    pub fn validate(&self) -> GenerateResult<()> {
        for (position, decl) in self.types.iter().enumerate() {
            decl.validate(position)?;
        }
        for (position, function) in self.functions.iter().enumerate() {
            function.validate(position)?;
        }
        Ok(())
    }
}

/// Index of a declaration in a [`TypeUniverse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena of every available type declaration, keyed by native identifier
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    decls: Vec<TypeDecl>,
    by_id: HashMap<String, TypeId>,
}

impl TypeUniverse {
    /// Build the arena, rejecting two declarations with the same native id
    pub fn new(types: Vec<TypeDecl>) -> GenerateResult<Self> {
        let mut universe = Self {
            decls: Vec::with_capacity(types.len()),
            by_id: HashMap::with_capacity(types.len()),
        };

        for decl in types {
            let position = universe.decls.len();
            if let Some(existing) = universe.by_id.get(decl.id()) {
                let first = universe.decls[existing.index()].site(existing.index());
                return Err(DuplicateIdentifierError {
                    identifier: decl.id().to_string(),
                    first,
                    second: decl.site(position),
                }
                .into());
            }
            universe
                .by_id
                .insert(decl.id().to_string(), TypeId(position as u32));
            universe.decls.push(decl);
        }

        debug!("type universe holds {} declarations", universe.decls.len());
        Ok(universe)
    }

    /// Look up a declaration by native identifier
    pub fn lookup(&self, id: &str) -> Option<TypeId> {
        self.by_id.get(id).copied()
    }

    /// Get a declaration by index
    pub fn get(&self, id: TypeId) -> &TypeDecl {
        &self.decls[id.index()]
    }

    /// Get a declaration by native identifier
    pub fn get_by_name(&self, id: &str) -> Option<&TypeDecl> {
        self.lookup(id).map(|tid| self.get(tid))
    }

    /// All declarations in input order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDecl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (TypeId(i as u32), decl))
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
