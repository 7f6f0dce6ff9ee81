//! TypeRef rendering.

use crate::codegen::scalars::ScalarTable;
use crate::codegen::{DtsConfig, MapType};
use crate::ir::{is_identifier, FieldDecl, ReturnType, Synchrony, TypeRef, TypeUniverse};

/// Renders type references as TypeScript type expressions
pub struct TypeRenderer<'a> {
    universe: &'a TypeUniverse,
    config: &'a DtsConfig,
    scalars: ScalarTable,
}

impl<'a> TypeRenderer<'a> {
    pub fn new(universe: &'a TypeUniverse, config: &'a DtsConfig) -> Self {
        Self {
            universe,
            config,
            scalars: ScalarTable::new(config.large_integers),
        }
    }

    /// Render a type expression
    pub fn render(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Primitive(kind) => self.scalars.name(*kind).to_string(),

            // Named types render by declared name, never by body
            TypeRef::Named(id) => match self.universe.get_by_name(id) {
                Some(decl) => decl.declared_name().to_string(),
                None => id.clone(),
            },

            TypeRef::Vector(inner) => format!("{}[]", self.render_element(inner)),

            TypeRef::Option(inner) => {
                format!("{} | {}", self.render(inner), self.config.null_type.keyword())
            }

            TypeRef::Tuple(elements) => {
                let types: Vec<String> = elements.iter().map(|t| self.render(t)).collect();
                format!("[{}]", types.join(", "))
            }

            TypeRef::Map { key, value } => {
                let name = match self.config.map_type {
                    MapType::Record => "Record",
                    MapType::Map => "Map",
                };
                format!("{}<{}, {}>", name, self.render(key), self.render(value))
            }
        }
    }

    /// Render with parentheses if needed (for array elements)
    fn render_element(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Option(_) => format!("({})", self.render(ty)),
            _ => self.render(ty),
        }
    }

    /// Render a function's return type
    ///
    /// `Async` wraps the result in `Promise<...>`; a unit result is `void`
    /// either way.
    pub fn render_return(&self, ret: &ReturnType, synchrony: Synchrony) -> String {
        let inner = match ret {
            ReturnType::Unit => "void".to_string(),
            ReturnType::Value(ty) => self.render(ty),
        };
        match synchrony {
            Synchrony::Sync => inner,
            Synchrony::Async => format!("Promise<{}>", inner),
        }
    }

    /// Render a flattened field's contribution to an intersection
    ///
    /// An optional flattened struct may be absent entirely, so it widens to
    /// `(T | {})`.
    pub fn render_flattened(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Option(inner) => format!("({} | {{}})", self.render(inner)),
            ty => self.render(ty),
        }
    }

    /// Render fields as an inline object type
    ///
    /// `leading` properties (such as a tag) come first. Flattened fields are
    /// joined on as intersection members.
    pub fn render_object(&self, leading: &[String], fields: &[FieldDecl]) -> String {
        let properties: Vec<String> = leading
            .iter()
            .cloned()
            .chain(
                fields
                    .iter()
                    .filter(|f| !f.flatten)
                    .map(|f| self.render_field(f)),
            )
            .collect();
        let flattened: Vec<String> = fields
            .iter()
            .filter(|f| f.flatten)
            .map(|f| self.render_flattened(&f.ty))
            .collect();

        match (properties.is_empty(), flattened.is_empty()) {
            (true, true) => "{}".to_string(),
            (true, false) => flattened.join(" & "),
            (false, _) => std::iter::once(format!("{{ {} }}", properties.join("; ")))
                .chain(flattened)
                .collect::<Vec<_>>()
                .join(" & "),
        }
    }

    /// Render a property signature without the trailing `;`
    pub fn render_field(&self, field: &FieldDecl) -> String {
        let key = property_key(&field.name);
        match &field.ty {
            TypeRef::Option(inner) if self.config.optional_fields => {
                format!("{}?: {}", key, self.render(inner))
            }
            ty => format!("{}: {}", key, self.render(ty)),
        }
    }
}

/// Quote property names that are not plain identifiers
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("{:?}", name)
    }
}
