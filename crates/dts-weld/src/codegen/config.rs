//! Configuration for declaration emission.

use crate::error::GenerateResult;
use serde::{Deserialize, Serialize};

/// Marker for an absent optional value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullType {
    /// `T | null`
    #[default]
    Null,
    /// `T | undefined`
    Undefined,
}

impl NullType {
    pub fn keyword(self) -> &'static str {
        match self {
            NullType::Null => "null",
            NullType::Undefined => "undefined",
        }
    }
}

/// How 64-bit and pointer-sized integers are represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LargeIntegerType {
    #[default]
    Number,
    Bigint,
}

/// How keyed maps are represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapType {
    /// `Record<K, V>`
    #[default]
    Record,
    /// `Map<K, V>`
    Map,
}

/// Configuration for declaration emission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtsConfig {
    /// Lines written before any declaration
    pub header: Vec<String>,
    /// Prefix declarations with `export`
    pub export: bool,
    /// Spaces per nesting level inside interface blocks
    pub indent: usize,
    /// Absence marker for optional values
    pub null_type: NullType,
    /// Representation of u64/i64/usize/isize
    pub large_integers: LargeIntegerType,
    /// Representation of keyed maps
    pub map_type: MapType,
    /// Render `Option` struct fields as optional properties (`name?: T`)
    pub optional_fields: bool,
    /// Emit `@param`/`@returns` tags on function declarations
    pub jsdoc: bool,
}

impl Default for DtsConfig {
    fn default() -> Self {
        Self {
            header: vec![
                "/* tslint:disable */".to_string(),
                "/* eslint-disable */".to_string(),
            ],
            export: true,
            indent: 4,
            null_type: NullType::default(),
            large_integers: LargeIntegerType::default(),
            map_type: MapType::default(),
            optional_fields: false,
            jsdoc: false,
        }
    }
}

impl DtsConfig {
    /// Create a new DtsConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a configuration from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> GenerateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the header lines.
    pub fn header<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether to export declarations.
    pub fn export(mut self, value: bool) -> Self {
        self.export = value;
        self
    }

    /// Set the indentation width.
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }

    /// Set the absence marker.
    pub fn null_type(mut self, value: NullType) -> Self {
        self.null_type = value;
        self
    }

    /// Set the large integer representation.
    pub fn large_integers(mut self, value: LargeIntegerType) -> Self {
        self.large_integers = value;
        self
    }

    /// Set the map representation.
    pub fn map_type(mut self, value: MapType) -> Self {
        self.map_type = value;
        self
    }

    /// Set whether optional fields use `?:`.
    pub fn optional_fields(mut self, value: bool) -> Self {
        self.optional_fields = value;
        self
    }

    /// Set whether functions carry JSDoc tags.
    pub fn jsdoc(mut self, value: bool) -> Self {
        self.jsdoc = value;
        self
    }

    pub(crate) fn export_prefix(&self) -> &'static str {
        if self.export {
            "export "
        } else {
            "declare "
        }
    }
}
