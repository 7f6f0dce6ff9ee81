//! Collision and ordering checks
//!
//! Run on a [`DeclarationSet`] before any text is emitted. The emitter
//! writes every type block before the first function, so a set passes when
//! identifiers are unique and every `Named` reference points at a type
//! inside the set.

use crate::error::{DuplicateIdentifierError, GenerateResult, Site, UnresolvedTypeError};
use crate::ir::TypeRef;
use crate::resolve::DeclarationSet;
use std::collections::HashMap;

/// Verify `set` can be emitted without collisions or dangling references
pub fn check(set: &DeclarationSet<'_>) -> GenerateResult<()> {
    check_unique_identifiers(set)?;
    check_references(set)
}

fn check_unique_identifiers(set: &DeclarationSet<'_>) -> GenerateResult<()> {
    let mut seen: HashMap<&str, Site> = HashMap::new();

    let types = set
        .types()
        .map(|(id, decl)| (decl.declared_name(), decl.site(id.index())));
    let functions = set
        .functions()
        .iter()
        .enumerate()
        .map(|(position, f)| (f.name.as_str(), f.site(position)));

    for (name, site) in types.chain(functions) {
        if let Some(first) = seen.get(name) {
            return Err(DuplicateIdentifierError {
                identifier: name.to_string(),
                first: first.clone(),
                second: site,
            }
            .into());
        }
        seen.insert(name, site);
    }
    Ok(())
}

fn check_references(set: &DeclarationSet<'_>) -> GenerateResult<()> {
    for (id, decl) in set.types() {
        for (ty, site) in decl.references(id.index()) {
            check_reference(set, ty, site)?;
        }
    }
    for function in set.functions() {
        for (ty, site) in function.references() {
            check_reference(set, ty, site)?;
        }
    }
    Ok(())
}

fn check_reference(set: &DeclarationSet<'_>, ty: &TypeRef, site: Site) -> GenerateResult<()> {
    let mut missing = None;
    ty.for_each_named(&mut |name| {
        if missing.is_none() && !set.contains_type(name) {
            missing = Some(name.to_string());
        }
    });

    match missing {
        Some(identifier) => Err(UnresolvedTypeError { identifier, site }.into()),
        None => Ok(()),
    }
}
