//! Error types for dts-weld
//!
//! Every failure is detected before any declaration text is produced, so a
//! generation pass either returns a complete artifact or the first error it
//! found. Each error carries a [`Site`] locating the offending native
//! declaration.

use std::fmt;
use thiserror::Error;

/// Result type for dts-weld operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Kind of a top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Struct,
    Enum,
    Alias,
    Function,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Struct => write!(f, "struct"),
            DeclKind::Enum => write!(f, "enum"),
            DeclKind::Alias => write!(f, "type alias"),
            DeclKind::Function => write!(f, "function"),
        }
    }
}

/// Location of a problem within the native description
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Site {
    /// A top-level declaration; `position` is its index in the input
    Declaration {
        kind: DeclKind,
        name: String,
        position: usize,
    },
    /// A field of a struct or of a struct-like enum variant; `index` is its
    /// position among the owner's fields
    Field {
        owner: String,
        field: String,
        index: usize,
    },
    /// An enum variant
    Variant {
        owner: String,
        variant: String,
        index: usize,
    },
    /// A function parameter
    Param {
        function: String,
        param: String,
        index: usize,
    },
    /// The return type of a function
    Return { function: String },
}

impl Site {
    pub fn declaration(kind: DeclKind, name: impl Into<String>, position: usize) -> Self {
        Site::Declaration {
            kind,
            name: name.into(),
            position,
        }
    }

    pub fn field(owner: impl Into<String>, field: impl Into<String>, index: usize) -> Self {
        Site::Field {
            owner: owner.into(),
            field: field.into(),
            index,
        }
    }

    pub fn variant(owner: impl Into<String>, variant: impl Into<String>, index: usize) -> Self {
        Site::Variant {
            owner: owner.into(),
            variant: variant.into(),
            index,
        }
    }

    pub fn param(function: impl Into<String>, param: impl Into<String>, index: usize) -> Self {
        Site::Param {
            function: function.into(),
            param: param.into(),
            index,
        }
    }

    pub fn return_of(function: impl Into<String>) -> Self {
        Site::Return {
            function: function.into(),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Declaration {
                kind,
                name,
                position,
            } => write!(f, "{} `{}` (declaration #{})", kind, name, position),
            Site::Field {
                owner,
                field,
                index,
            } => write!(f, "field `{}` (#{}) of `{}`", field, index, owner),
            Site::Variant {
                owner,
                variant,
                index,
            } => write!(f, "variant `{}` (#{}) of `{}`", variant, index, owner),
            Site::Param {
                function,
                param,
                index,
            } => write!(f, "parameter `{}` (#{}) of `{}`", param, index, function),
            Site::Return { function } => write!(f, "return type of `{}`", function),
        }
    }
}

/// A `Named` type reference has no declaration in the universe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unresolved type `{identifier}` referenced by {site}")]
pub struct UnresolvedTypeError {
    pub identifier: String,
    pub site: Site,
}

/// Two declarations claim the same identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate identifier `{identifier}`: declared by {first} and by {second}")]
pub struct DuplicateIdentifierError {
    pub identifier: String,
    pub first: Site,
    pub second: Site,
}

/// The native description violates a local shape rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed input at {site}: {reason}")]
pub struct MalformedInputError {
    pub site: Site,
    pub reason: String,
}

impl MalformedInputError {
    pub fn new(site: Site, reason: impl Into<String>) -> Self {
        Self {
            site,
            reason: reason.into(),
        }
    }
}

/// Main error type for a generation pass
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    UnresolvedType(#[from] UnresolvedTypeError),

    #[error(transparent)]
    DuplicateIdentifier(#[from] DuplicateIdentifierError),

    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),

    /// JSON description or configuration could not be read
    #[error("invalid description: {0}")]
    Description(#[from] serde_json::Error),

    /// Rust source could not be parsed
    #[error("source parse error at {line}:{column}: {message}")]
    Source {
        message: String,
        line: usize,
        column: usize,
    },
}

impl From<syn::Error> for GenerateError {
    fn from(err: syn::Error) -> Self {
        let start = err.span().start();
        GenerateError::Source {
            message: err.to_string(),
            line: start.line,
            column: start.column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_display() {
        assert_eq!(
            Site::declaration(DeclKind::Struct, "Point", 2).to_string(),
            "struct `Point` (declaration #2)"
        );
        assert_eq!(
            Site::param("consume", "point", 0).to_string(),
            "parameter `point` (#0) of `consume`"
        );
        assert_eq!(
            Site::return_of("into_js").to_string(),
            "return type of `into_js`"
        );
    }

    #[test]
    fn test_error_messages_name_identifier_and_site() {
        let err: GenerateError = UnresolvedTypeError {
            identifier: "Range".to_string(),
            site: Site::field("A", "range", 0),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "unresolved type `Range` referenced by field `range` (#0) of `A`"
        );

        let err: GenerateError = DuplicateIdentifierError {
            identifier: "Point".to_string(),
            first: Site::declaration(DeclKind::Struct, "Point", 0),
            second: Site::declaration(DeclKind::Function, "Point", 1),
        }
        .into();
        assert!(err.to_string().contains("struct `Point` (declaration #0)"));
        assert!(err.to_string().contains("function `Point` (declaration #1)"));
    }

    #[test]
    fn test_local_duplicate_sites_are_distinguishable() {
        let err = DuplicateIdentifierError {
            identifier: "x".to_string(),
            first: Site::field("P", "x", 0),
            second: Site::field("P", "x", 2),
        };
        assert_eq!(
            err.to_string(),
            concat!(
                "duplicate identifier `x`: ",
                "declared by field `x` (#0) of `P` and by field `x` (#2) of `P`"
            )
        );
    }
}
