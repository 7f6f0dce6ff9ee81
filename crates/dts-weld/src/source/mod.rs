//! Rust source front-end
//!
//! Builds a [`NativeDescription`] from a Rust source file: public functions
//! become roots, structs, enums and `type` items become type declarations.
//! Inline `mod` blocks are walked; other items are skipped.

pub mod attrs;
pub mod type_parser;

pub use type_parser::parse_type;

use crate::error::{DeclKind, GenerateResult, MalformedInputError, Site};
use crate::ir::{
    AliasDecl, EnumDecl, FieldDecl, FunctionDecl, NativeDescription, ParamDecl, StructDecl,
    TypeDecl, TypeRef, VariantDecl, VariantShape,
};
use attrs::{doc_comment, RenameRule, SerdeAttrs};
use syn::ext::IdentExt;
use syn::{FnArg, Fields, GenericParam, Generics, Item, Pat, Type, Visibility};
use tracing::{debug, trace};

/// Parse Rust source into a native description
pub fn parse_source(source: &str) -> GenerateResult<NativeDescription> {
    let file = syn::parse_file(source)?;

    let mut collector = Collector::default();
    collector.items(&file.items)?;

    debug!(
        "parsed {} types and {} functions from source ({} items skipped)",
        collector.description.types.len(),
        collector.description.functions.len(),
        collector.skipped
    );
    Ok(collector.description)
}

#[derive(Default)]
struct Collector {
    description: NativeDescription,
    skipped: usize,
}

impl Collector {
    fn items(&mut self, items: &[Item]) -> GenerateResult<()> {
        for item in items {
            match item {
                Item::Fn(f) => self.function(f)?,
                Item::Struct(s) => self.structure(s)?,
                Item::Enum(e) => self.enumeration(e)?,
                Item::Type(t) => self.alias(t)?,
                Item::Mod(m) => {
                    if let Some((_, items)) = &m.content {
                        self.items(items)?;
                    }
                }
                _ => self.skipped += 1,
            }
        }
        Ok(())
    }

    fn function(&mut self, f: &syn::ItemFn) -> GenerateResult<()> {
        let name = f.sig.ident.unraw().to_string();
        if !is_public(&f.vis) {
            trace!("skipping private function `{}`", name);
            self.skipped += 1;
            return Ok(());
        }

        let position = self.description.functions.len();
        check_generics(
            &f.sig.generics,
            Site::declaration(DeclKind::Function, &name, position),
        )?;

        let mut function = FunctionDecl::new(&name);
        if f.sig.asyncness.is_some() {
            function = function.async_fn();
        }
        if let Some(doc) = doc_comment(&f.attrs) {
            function = function.with_doc(doc);
        }

        for (index, input) in f.sig.inputs.iter().enumerate() {
            let pat_type = match input {
                FnArg::Typed(pat_type) => pat_type,
                FnArg::Receiver(_) => {
                    return Err(MalformedInputError::new(
                        Site::declaration(DeclKind::Function, &name, position),
                        "methods cannot be declared as free functions",
                    )
                    .into())
                }
            };

            let param_name = match pat_type.pat.as_ref() {
                Pat::Ident(pat) => pat.ident.unraw().to_string(),
                _ => {
                    return Err(MalformedInputError::new(
                        Site::declaration(DeclKind::Function, &name, position),
                        "parameters must be plain identifiers",
                    )
                    .into())
                }
            };

            let site = Site::param(&name, &param_name, index);
            function = function.param(match pat_type.ty.as_ref() {
                Type::Reference(reference) => {
                    ParamDecl::borrowed(&param_name, map_type(&reference.elem, site)?)
                }
                ty => ParamDecl::new(&param_name, map_type(ty, site)?),
            });
        }

        if let syn::ReturnType::Type(_, ty) = &f.sig.output {
            match map_type(ty, Site::return_of(&name))? {
                TypeRef::Tuple(elements) if elements.is_empty() => {}
                ty => function = function.returns(ty),
            }
        }

        self.description.functions.push(function);
        Ok(())
    }

    fn structure(&mut self, s: &syn::ItemStruct) -> GenerateResult<()> {
        let id = s.ident.unraw().to_string();
        let position = self.description.types.len();
        let serde = SerdeAttrs::from_attrs(&s.attrs)?;
        let doc = doc_comment(&s.attrs);

        let decl: TypeDecl = match &s.fields {
            Fields::Unnamed(unnamed) => {
                check_generics(
                    &s.generics,
                    Site::declaration(DeclKind::Alias, &id, position),
                )?;
                let site = Site::declaration(DeclKind::Alias, &id, position);
                let mut elements = unnamed
                    .unnamed
                    .iter()
                    .map(|field| map_type(&field.ty, site.clone()))
                    .collect::<GenerateResult<Vec<_>>>()?;
                let target = if elements.len() == 1 {
                    elements.swap_remove(0)
                } else {
                    TypeRef::tuple(elements)
                };

                AliasDecl {
                    id,
                    rename: serde.rename,
                    target,
                    doc,
                    exported: is_public(&s.vis),
                }
                .into()
            }
            fields => {
                check_generics(
                    &s.generics,
                    Site::declaration(DeclKind::Struct, &id, position),
                )?;
                let fields = match fields {
                    Fields::Named(named) => {
                        map_fields(&id, named.named.iter(), serde.rename_all)?
                    }
                    _ => Vec::new(),
                };

                StructDecl {
                    id,
                    rename: serde.rename,
                    fields,
                    doc,
                    exported: is_public(&s.vis),
                }
                .into()
            }
        };

        self.description.types.push(decl);
        Ok(())
    }

    fn enumeration(&mut self, e: &syn::ItemEnum) -> GenerateResult<()> {
        let id = e.ident.unraw().to_string();
        let position = self.description.types.len();
        check_generics(
            &e.generics,
            Site::declaration(DeclKind::Enum, &id, position),
        )?;
        let serde = SerdeAttrs::from_attrs(&e.attrs)?;
        let repr = serde.enum_repr().ok_or_else(|| {
            MalformedInputError::new(
                Site::declaration(DeclKind::Enum, &id, position),
                "`content` requires `tag`",
            )
        })?;

        let mut variants = Vec::new();
        for (index, variant) in e.variants.iter().enumerate() {
            let variant_serde = SerdeAttrs::from_attrs(&variant.attrs)?;
            if variant_serde.skip {
                continue;
            }

            let native = variant.ident.unraw().to_string();
            let name = match (variant_serde.rename, serde.rename_all) {
                (Some(rename), _) => rename,
                (None, Some(rule)) => rule.apply_to_variant(&native),
                (None, None) => native.clone(),
            };

            let site = Site::variant(&id, &native, index);
            let shape = match &variant.fields {
                Fields::Unit => VariantShape::Unit,
                Fields::Unnamed(unnamed) => {
                    let mut elements = unnamed
                        .unnamed
                        .iter()
                        .map(|field| map_type(&field.ty, site.clone()))
                        .collect::<GenerateResult<Vec<_>>>()?;
                    if elements.len() == 1 {
                        VariantShape::Newtype(elements.swap_remove(0))
                    } else {
                        VariantShape::Tuple(elements)
                    }
                }
                Fields::Named(named) => VariantShape::Struct(map_fields(
                    &format!("{}::{}", id, native),
                    named.named.iter(),
                    variant_serde.rename_all,
                )?),
            };

            let mut decl = VariantDecl::new(name, shape);
            if let Some(doc) = doc_comment(&variant.attrs) {
                decl = decl.with_doc(doc);
            }
            variants.push(decl);
        }

        self.description.types.push(
            EnumDecl {
                id,
                rename: serde.rename,
                variants,
                repr,
                doc: doc_comment(&e.attrs),
                exported: is_public(&e.vis),
            }
            .into(),
        );
        Ok(())
    }

    fn alias(&mut self, t: &syn::ItemType) -> GenerateResult<()> {
        let id = t.ident.unraw().to_string();
        let site = Site::declaration(DeclKind::Alias, &id, self.description.types.len());
        check_generics(&t.generics, site.clone())?;

        self.description.types.push(
            AliasDecl {
                target: map_type(&t.ty, site)?,
                id,
                rename: None,
                doc: doc_comment(&t.attrs),
                exported: is_public(&t.vis),
            }
            .into(),
        );
        Ok(())
    }
}

fn map_fields<'a>(
    owner: &str,
    fields: impl Iterator<Item = &'a syn::Field>,
    rename_all: Option<RenameRule>,
) -> GenerateResult<Vec<FieldDecl>> {
    let mut out = Vec::new();
    for (index, field) in fields.enumerate() {
        let serde = SerdeAttrs::from_attrs(&field.attrs)?;
        if serde.skip {
            continue;
        }

        let native = field
            .ident
            .as_ref()
            .map(|ident| ident.unraw().to_string())
            .unwrap_or_default();
        let name = match (serde.rename, rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply_to_field(&native),
            (None, None) => native.clone(),
        };

        let site = Site::field(owner, &native, index);
        let mut decl = FieldDecl::new(name, map_type(&field.ty, site)?);
        if let Some(doc) = doc_comment(&field.attrs) {
            decl = decl.with_doc(doc);
        }
        if serde.flatten {
            decl = decl.flattened();
        }
        out.push(decl);
    }
    Ok(out)
}

fn map_type(ty: &Type, site: Site) -> GenerateResult<TypeRef> {
    parse_type(ty).map_err(|err| MalformedInputError::new(site, err.to_string()).into())
}

/// Lifetimes are erased; type and const parameters have no declaration form
fn check_generics(generics: &Generics, site: Site) -> GenerateResult<()> {
    for param in &generics.params {
        match param {
            GenericParam::Lifetime(_) => {}
            GenericParam::Type(tp) => {
                return Err(MalformedInputError::new(
                    site,
                    format!("generic type parameter `{}` is not supported", tp.ident),
                )
                .into())
            }
            GenericParam::Const(cp) => {
                return Err(MalformedInputError::new(
                    site,
                    format!("const generic parameter `{}` is not supported", cp.ident),
                )
                .into())
            }
        }
    }
    Ok(())
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}
