//! Declaration metadata for structs, enums, aliases and functions
//!
//! This module provides the declarations a native description is made of.
//! They are created once, validated locally, and never mutated afterwards.

use crate::error::{DeclKind, DuplicateIdentifierError, GenerateResult, MalformedInputError, Site};
use crate::ir::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field of a struct or of a struct-like enum variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Property name as it appears in the target
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Documentation comments
    #[serde(default)]
    pub doc: Option<String>,
    /// Inline the field's own properties into the owner (serde `flatten`)
    #[serde(default)]
    pub flatten: bool,
}

impl FieldDecl {
    /// Create a new field
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: None,
            flatten: false,
        }
    }

    /// Mark as flattened into the owner
    pub fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Native aggregate with named fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDecl {
    /// Native identifier
    pub id: String,
    /// Declared name in the target, when it differs from `id`
    #[serde(default)]
    pub rename: Option<String>,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Documentation comments
    #[serde(default)]
    pub doc: Option<String>,
    /// Whether the struct is emitted even when no function reaches it
    #[serde(default)]
    pub exported: bool,
}

impl StructDecl {
    /// Create a new struct
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rename: None,
            fields: Vec::new(),
            doc: None,
            exported: false,
        }
    }

    /// Add a field
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the declared name
    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Mark as exported
    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }
}

/// Payload carried by an enum variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantShape {
    /// `Unit` -> "Unit"
    Unit,
    /// `Newtype(T)` -> { Newtype: T }
    Newtype(TypeRef),
    /// `Tuple(A, B)` -> { Tuple: [A, B] }
    Tuple(Vec<TypeRef>),
    /// `Struct { a: A }` -> { Struct: { a: A } }
    Struct(Vec<FieldDecl>),
}

/// Enum variant metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDecl {
    /// Tag as it appears in the target
    pub name: String,
    /// Variant payload
    pub shape: VariantShape,
    /// Documentation
    #[serde(default)]
    pub doc: Option<String>,
}

impl VariantDecl {
    /// Create a unit variant
    pub fn unit(name: impl Into<String>) -> Self {
        Self::new(name, VariantShape::Unit)
    }

    /// Create a variant with an explicit shape
    pub fn new(name: impl Into<String>, shape: VariantShape) -> Self {
        Self {
            name: name.into(),
            shape,
            doc: None,
        }
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Types referenced by the payload
    pub fn types(&self) -> Vec<&TypeRef> {
        match &self.shape {
            VariantShape::Unit => Vec::new(),
            VariantShape::Newtype(ty) => vec![ty],
            VariantShape::Tuple(elements) => elements.iter().collect(),
            VariantShape::Struct(fields) => fields.iter().map(|f| &f.ty).collect(),
        }
    }
}

/// How an enum's variants are told apart on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EnumRepr {
    /// `{ Variant: payload }`, unit variants as `"Variant"`
    #[default]
    External,
    /// `{ <tag>: "Variant", ...fields }`
    Internal { tag: String },
    /// `{ <tag>: "Variant", <content>: payload }`
    Adjacent { tag: String, content: String },
    /// The payload alone
    Untagged,
}

/// Native enum exposed as a tagged union
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    /// Native identifier
    pub id: String,
    /// Declared name in the target, when it differs from `id`
    #[serde(default)]
    pub rename: Option<String>,
    /// Variants in declaration order
    #[serde(default)]
    pub variants: Vec<VariantDecl>,
    /// Tagging representation
    #[serde(default)]
    pub repr: EnumRepr,
    /// Documentation comments
    #[serde(default)]
    pub doc: Option<String>,
    /// Whether the enum is emitted even when no function reaches it
    #[serde(default)]
    pub exported: bool,
}

impl EnumDecl {
    /// Create a new externally tagged enum
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rename: None,
            variants: Vec::new(),
            repr: EnumRepr::External,
            doc: None,
            exported: false,
        }
    }

    /// Set the tagging representation
    pub fn with_repr(mut self, repr: EnumRepr) -> Self {
        self.repr = repr;
        self
    }

    /// Add a variant
    pub fn variant(mut self, variant: VariantDecl) -> Self {
        self.variants.push(variant);
        self
    }

    /// Set the declared name
    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Mark as exported
    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }
}

/// Named alias for another type (`type Meters = f64;`, tuple structs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDecl {
    /// Native identifier
    pub id: String,
    /// Declared name in the target, when it differs from `id`
    #[serde(default)]
    pub rename: Option<String>,
    /// Aliased type
    pub target: TypeRef,
    /// Documentation comments
    #[serde(default)]
    pub doc: Option<String>,
    /// Whether the alias is emitted even when no function reaches it
    #[serde(default)]
    pub exported: bool,
}

impl AliasDecl {
    /// Create a new alias
    pub fn new(id: impl Into<String>, target: TypeRef) -> Self {
        Self {
            id: id.into(),
            rename: None,
            target,
            doc: None,
            exported: false,
        }
    }

    /// Set the declared name
    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Mark as exported
    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }
}

/// Any named type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDecl {
    Struct(StructDecl),
    Enum(EnumDecl),
    Alias(AliasDecl),
}

impl TypeDecl {
    /// Native identifier
    pub fn id(&self) -> &str {
        match self {
            TypeDecl::Struct(s) => &s.id,
            TypeDecl::Enum(e) => &e.id,
            TypeDecl::Alias(a) => &a.id,
        }
    }

    /// Canonical name in the emitted artifact
    pub fn declared_name(&self) -> &str {
        let rename = match self {
            TypeDecl::Struct(s) => s.rename.as_deref(),
            TypeDecl::Enum(e) => e.rename.as_deref(),
            TypeDecl::Alias(a) => a.rename.as_deref(),
        };
        rename.unwrap_or_else(|| self.id())
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            TypeDecl::Struct(_) => DeclKind::Struct,
            TypeDecl::Enum(_) => DeclKind::Enum,
            TypeDecl::Alias(_) => DeclKind::Alias,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            TypeDecl::Struct(s) => s.doc.as_deref(),
            TypeDecl::Enum(e) => e.doc.as_deref(),
            TypeDecl::Alias(a) => a.doc.as_deref(),
        }
    }

    pub fn is_exported(&self) -> bool {
        match self {
            TypeDecl::Struct(s) => s.exported,
            TypeDecl::Enum(e) => e.exported,
            TypeDecl::Alias(a) => a.exported,
        }
    }

    /// Site of this declaration at `position` in the input
    pub fn site(&self, position: usize) -> Site {
        Site::declaration(self.kind(), self.id(), position)
    }

    /// Every type reference made by this declaration, in declaration order,
    /// paired with the site that makes it
    pub fn references(&self, position: usize) -> Vec<(&TypeRef, Site)> {
        match self {
            TypeDecl::Struct(s) => s
                .fields
                .iter()
                .enumerate()
                .map(|(i, f)| (&f.ty, Site::field(&s.id, &f.name, i)))
                .collect(),
            TypeDecl::Enum(e) => e
                .variants
                .iter()
                .enumerate()
                .flat_map(|(i, v)| {
                    v.types()
                        .into_iter()
                        .map(move |ty| (ty, Site::variant(&e.id, &v.name, i)))
                })
                .collect(),
            TypeDecl::Alias(a) => vec![(&a.target, self.site(position))],
        }
    }

    /// Check local shape rules
    pub fn validate(&self, position: usize) -> GenerateResult<()> {
        let site = self.site(position);
        check_identifier(self.id(), &site)?;
        if self.declared_name() != self.id() {
            check_identifier(self.declared_name(), &site)?;
        }

        match self {
            TypeDecl::Struct(s) => check_fields(&s.id, &s.fields)?,
            TypeDecl::Enum(e) => {
                check_repr(&e.repr, &site)?;
                let mut seen: HashMap<&str, usize> = HashMap::new();
                for (index, variant) in e.variants.iter().enumerate() {
                    let variant_site = Site::variant(&e.id, &variant.name, index);
                    if variant.name.is_empty() {
                        return Err(
                            MalformedInputError::new(variant_site, "empty variant name").into()
                        );
                    }
                    if let Some(&first) = seen.get(variant.name.as_str()) {
                        return Err(DuplicateIdentifierError {
                            identifier: variant.name.clone(),
                            first: Site::variant(&e.id, &variant.name, first),
                            second: variant_site,
                        }
                        .into());
                    }
                    seen.insert(&variant.name, index);

                    match (&e.repr, &variant.shape) {
                        (EnumRepr::Internal { .. }, VariantShape::Tuple(_)) => {
                            return Err(MalformedInputError::new(
                                variant_site,
                                "tuple variants cannot be internally tagged",
                            )
                            .into())
                        }
                        (EnumRepr::Internal { tag }, VariantShape::Struct(fields))
                            if fields.iter().any(|f| !f.flatten && &f.name == tag) =>
                        {
                            return Err(MalformedInputError::new(
                                variant_site,
                                format!("a field collides with the tag `{}`", tag),
                            )
                            .into())
                        }
                        _ => {}
                    }
                    if let VariantShape::Struct(fields) = &variant.shape {
                        check_fields(&format!("{}::{}", e.id, variant.name), fields)?;
                    }
                }
            }
            TypeDecl::Alias(_) => {}
        }
        Ok(())
    }
}

impl From<StructDecl> for TypeDecl {
    fn from(s: StructDecl) -> Self {
        TypeDecl::Struct(s)
    }
}

impl From<EnumDecl> for TypeDecl {
    fn from(e: EnumDecl) -> Self {
        TypeDecl::Enum(e)
    }
}

impl From<AliasDecl> for TypeDecl {
    fn from(a: AliasDecl) -> Self {
        TypeDecl::Alias(a)
    }
}

/// Calling contract of a parameter
///
/// Ownership is documentation metadata only: a borrowed and an owned
/// parameter of the same type render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Ownership {
    #[default]
    Owned,
    /// The callee does not retain the value beyond the call
    Borrowed,
}

/// Parameter metadata for a function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name
    pub name: String,
    /// Parameter type
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Calling contract
    #[serde(default)]
    pub ownership: Ownership,
}

impl ParamDecl {
    /// Create an owned parameter
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            ownership: Ownership::Owned,
        }
    }

    /// Create a borrowed parameter
    pub fn borrowed(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            ownership: Ownership::Borrowed,
            ..Self::new(name, ty)
        }
    }

    pub fn is_borrowed(&self) -> bool {
        self.ownership == Ownership::Borrowed
    }
}

/// Whether the generated call completes immediately or eventually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Synchrony {
    #[default]
    Sync,
    Async,
}

/// Function return
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReturnType {
    /// No value
    #[default]
    Unit,
    Value(TypeRef),
}

impl ReturnType {
    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            ReturnType::Unit => None,
            ReturnType::Value(ty) => Some(ty),
        }
    }
}

/// Metadata for a top-level function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function name
    pub name: String,
    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Return type
    #[serde(rename = "return", default)]
    pub ret: ReturnType,
    /// Sync or async calling contract
    #[serde(default)]
    pub synchrony: Synchrony,
    /// Documentation comments
    #[serde(default)]
    pub doc: Option<String>,
}

impl FunctionDecl {
    /// Create a new sync function returning nothing
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: ReturnType::Unit,
            synchrony: Synchrony::Sync,
            doc: None,
        }
    }

    /// Mark as async
    pub fn async_fn(mut self) -> Self {
        self.synchrony = Synchrony::Async;
        self
    }

    /// Add a parameter
    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Set return type
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.ret = ReturnType::Value(ty);
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn is_async(&self) -> bool {
        self.synchrony == Synchrony::Async
    }

    pub fn site(&self, position: usize) -> Site {
        Site::declaration(DeclKind::Function, &self.name, position)
    }

    /// Every type reference made by this signature, params first
    pub fn references(&self) -> Vec<(&TypeRef, Site)> {
        let mut refs: Vec<(&TypeRef, Site)> = self
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| (&p.ty, Site::param(&self.name, &p.name, i)))
            .collect();
        if let Some(ty) = self.ret.as_type() {
            refs.push((ty, Site::return_of(&self.name)));
        }
        refs
    }

    /// Check local shape rules
    pub fn validate(&self, position: usize) -> GenerateResult<()> {
        check_identifier(&self.name, &self.site(position))?;

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, param) in self.params.iter().enumerate() {
            let site = Site::param(&self.name, &param.name, index);
            check_identifier(&param.name, &site)?;
            if let Some(&first) = seen.get(param.name.as_str()) {
                return Err(DuplicateIdentifierError {
                    identifier: param.name.clone(),
                    first: Site::param(&self.name, &param.name, first),
                    second: site,
                }
                .into());
            }
            seen.insert(&param.name, index);
        }
        Ok(())
    }
}

// Helper functions

fn check_fields(owner: &str, fields: &[FieldDecl]) -> GenerateResult<()> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, field) in fields.iter().enumerate() {
        let site = Site::field(owner, &field.name, index);
        if field.name.is_empty() {
            return Err(MalformedInputError::new(site, "empty field name").into());
        }
        if field.flatten && !is_flattenable(&field.ty) {
            return Err(MalformedInputError::new(
                site,
                "only structs, enums and maps can be flattened",
            )
            .into());
        }
        // Flattened fields contribute no property of their own
        if field.flatten {
            continue;
        }
        if let Some(&first) = seen.get(field.name.as_str()) {
            return Err(DuplicateIdentifierError {
                identifier: field.name.clone(),
                first: Site::field(owner, &field.name, first),
                second: site,
            }
            .into());
        }
        seen.insert(&field.name, index);
    }
    Ok(())
}

fn is_flattenable(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Named(_) | TypeRef::Map { .. } => true,
        TypeRef::Option(inner) => matches!(**inner, TypeRef::Named(_) | TypeRef::Map { .. }),
        _ => false,
    }
}

fn check_repr(repr: &EnumRepr, site: &Site) -> Result<(), MalformedInputError> {
    match repr {
        EnumRepr::External | EnumRepr::Untagged => Ok(()),
        EnumRepr::Internal { tag } if tag.is_empty() => {
            Err(MalformedInputError::new(site.clone(), "empty tag name"))
        }
        EnumRepr::Internal { .. } => Ok(()),
        EnumRepr::Adjacent { tag, content } if tag.is_empty() || content.is_empty() => Err(
            MalformedInputError::new(site.clone(), "empty tag or content name"),
        ),
        EnumRepr::Adjacent { tag, content } if tag == content => Err(MalformedInputError::new(
            site.clone(),
            format!("tag and content share the name `{}`", tag),
        )),
        EnumRepr::Adjacent { .. } => Ok(()),
    }
}

fn check_identifier(name: &str, site: &Site) -> Result<(), MalformedInputError> {
    if name.is_empty() {
        return Err(MalformedInputError::new(site.clone(), "empty identifier"));
    }
    if !is_identifier(name) {
        return Err(MalformedInputError::new(
            site.clone(),
            format!("`{}` is not a valid identifier", name),
        ));
    }
    if is_reserved_word(name) {
        return Err(MalformedInputError::new(
            site.clone(),
            format!("`{}` is a reserved word", name),
        ));
    }
    Ok(())
}

/// Words that cannot name a declaration or a parameter in strict-mode
/// TypeScript. Property keys may still use them.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Check whether `s` is a reserved word
pub fn is_reserved_word(s: &str) -> bool {
    RESERVED_WORDS.contains(&s)
}

/// Check whether `s` can be used unquoted as a TypeScript identifier
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Convert snake_case to camelCase
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert snake_case to PascalCase
pub fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert PascalCase to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.char_indices() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
