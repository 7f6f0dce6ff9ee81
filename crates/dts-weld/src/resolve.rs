//! Type resolution
//!
//! Walks every type reachable from the root functions (and from exported
//! types) and produces a closed, de-duplicated [`DeclarationSet`].
//!
//! The walk is depth-first and dependency-first: a named type is marked on
//! first sight, the types it references are resolved, then it is appended to
//! the output order. Marking before descending is what lets a struct contain
//! a vector of itself.

use crate::error::{GenerateResult, Site, UnresolvedTypeError};
use crate::ir::{FunctionDecl, TypeDecl, TypeId, TypeRef, TypeUniverse};
use tracing::{debug, trace};

/// Closed set of declarations for one generation pass
#[derive(Debug, Clone)]
pub struct DeclarationSet<'a> {
    universe: &'a TypeUniverse,
    types: Vec<TypeId>,
    functions: &'a [FunctionDecl],
}

impl<'a> DeclarationSet<'a> {
    /// The arena the set's type ids point into
    pub fn universe(&self) -> &'a TypeUniverse {
        self.universe
    }

    /// Type declarations in output order
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &'a TypeDecl)> + '_ {
        self.types.iter().map(|&id| (id, self.universe.get(id)))
    }

    /// Type ids in output order
    pub fn type_ids(&self) -> &[TypeId] {
        &self.types
    }

    /// Root functions in input order
    pub fn functions(&self) -> &'a [FunctionDecl] {
        self.functions
    }

    /// Check whether a type with this native id is part of the set
    pub fn contains_type(&self, id: &str) -> bool {
        self.universe
            .lookup(id)
            .is_some_and(|tid| self.types.contains(&tid))
    }
}

/// Resolve `functions` against `universe`
///
/// Fails with the first [`UnresolvedTypeError`] met along the walk; no
/// partial set is returned.
pub fn resolve<'a>(
    universe: &'a TypeUniverse,
    functions: &'a [FunctionDecl],
) -> GenerateResult<DeclarationSet<'a>> {
    let mut resolver = Resolver::new(universe);

    for function in functions {
        for (ty, site) in function.references() {
            resolver.visit_ref(ty, &site)?;
        }
    }

    for (id, decl) in universe.iter() {
        if decl.is_exported() {
            resolver.visit_decl(id)?;
        }
    }

    debug!(
        "resolved {} of {} types for {} functions",
        resolver.order.len(),
        universe.len(),
        functions.len()
    );

    Ok(DeclarationSet {
        universe,
        types: resolver.order,
        functions,
    })
}

struct Resolver<'a> {
    universe: &'a TypeUniverse,
    visited: Vec<bool>,
    order: Vec<TypeId>,
}

impl<'a> Resolver<'a> {
    fn new(universe: &'a TypeUniverse) -> Self {
        Self {
            universe,
            visited: vec![false; universe.len()],
            order: Vec::new(),
        }
    }

    fn visit_ref(&mut self, ty: &TypeRef, site: &Site) -> GenerateResult<()> {
        match ty {
            TypeRef::Primitive(_) => Ok(()),
            TypeRef::Named(id) => {
                let tid = self.universe.lookup(id).ok_or_else(|| UnresolvedTypeError {
                    identifier: id.clone(),
                    site: site.clone(),
                })?;
                self.visit_decl(tid)
            }
            TypeRef::Vector(inner) | TypeRef::Option(inner) => self.visit_ref(inner, site),
            TypeRef::Tuple(elements) => {
                for element in elements {
                    self.visit_ref(element, site)?;
                }
                Ok(())
            }
            TypeRef::Map { key, value } => {
                self.visit_ref(key, site)?;
                self.visit_ref(value, site)
            }
        }
    }

    fn visit_decl(&mut self, id: TypeId) -> GenerateResult<()> {
        if self.visited[id.index()] {
            return Ok(());
        }
        self.visited[id.index()] = true;

        let decl = self.universe.get(id);
        trace!("visiting {}", decl.id());
        for (ty, site) in decl.references(id.index()) {
            self.visit_ref(ty, &site)?;
        }

        self.order.push(id);
        Ok(())
    }
}
