//! dts-weld: compiles native signatures into TypeScript declarations
//!
//! Given a structural description of native structs, enums, aliases and
//! functions, this crate resolves every type the functions reach and emits a
//! `.d.ts` artifact declaring them, dependencies first.
//!
//! # Architecture
//!
//! - `ir`: Type model (type references, declarations, the type universe)
//! - `resolve`: Reachability and dependency ordering
//! - `policy`: Collision and ordering checks
//! - `codegen`: Declaration text generation
//! - `source`: Rust source front-end
//!
//! # Usage
//!
//! ```rust
//! use dts_weld::{generate, DtsConfig, FieldDecl, FunctionDecl, NativeDescription, ParamDecl,
//!     StructDecl, TypeRef};
//!
//! let description = NativeDescription::new()
//!     .struct_def(
//!         StructDecl::new("Point")
//!             .field(FieldDecl::new("x", TypeRef::f64()))
//!             .field(FieldDecl::new("y", TypeRef::f64())),
//!     )
//!     .function(
//!         FunctionDecl::new("consume")
//!             .param(ParamDecl::new("point", TypeRef::named("Point"))),
//!     );
//!
//! let dts = generate(description, &DtsConfig::default()).unwrap();
//! assert!(dts.contains("export function consume(point: Point): void;"));
//! ```

pub mod codegen;
pub mod error;
pub mod ir;
pub mod policy;
pub mod resolve;
pub mod source;

// Re-export commonly used types
pub use codegen::{DtsConfig, DtsGenerator, LargeIntegerType, MapType, NullType};
pub use error::{
    DeclKind, DuplicateIdentifierError, GenerateError, GenerateResult, MalformedInputError, Site,
    UnresolvedTypeError,
};
pub use ir::{
    AliasDecl, EnumDecl, EnumRepr, FieldDecl, FunctionDecl, NativeDescription, Ownership,
    ParamDecl, PrimitiveKind, ReturnType, StructDecl, Synchrony, TypeDecl, TypeId, TypeRef,
    TypeUniverse, VariantDecl, VariantShape,
};
pub use resolve::{resolve, DeclarationSet};
pub use source::parse_source;

use tracing::debug;

/// Run one generation pass over a native description
///
/// Validates local shapes, resolves every type the functions reach (plus
/// exported types), checks the result for collisions and dangling
/// references, and renders the artifact. Returns the first error found;
/// no partial text is ever returned.
pub fn generate(description: NativeDescription, config: &DtsConfig) -> GenerateResult<String> {
    description.validate()?;

    let NativeDescription { types, functions } = description;
    let universe = TypeUniverse::new(types)?;
    let set = resolve(&universe, &functions)?;

    let output = DtsGenerator::new(&set, config).generate()?;
    debug!("generated {} bytes of declarations", output.len());
    Ok(output)
}

/// Run a generation pass over a JSON native description
pub fn generate_from_json(json: &str, config: &DtsConfig) -> GenerateResult<String> {
    generate(NativeDescription::from_json(json)?, config)
}

/// Run a generation pass over Rust source
pub fn generate_from_source(source: &str, config: &DtsConfig) -> GenerateResult<String> {
    generate(parse_source(source)?, config)
}
