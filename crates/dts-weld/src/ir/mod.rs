//! Intermediate Representation (IR) for dts-weld
//!
//! This module provides the type model: native type references, the
//! declarations built from them, and the arena the resolver walks.

pub mod types;
pub mod symbol;
pub mod module;

pub use types::*;
pub use symbol::*;
pub use module::*;
