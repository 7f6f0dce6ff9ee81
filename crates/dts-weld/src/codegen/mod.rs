//! Code generation for TypeScript declarations
//!
//! This module provides:
//! - Emission options (`DtsConfig`)
//! - The fixed primitive scalar table
//! - Type expression rendering
//! - The declaration file generator

pub mod config;
pub mod dts;
pub mod render;
pub mod scalars;

pub use config::{DtsConfig, LargeIntegerType, MapType, NullType};
pub use dts::DtsGenerator;
pub use render::{property_key, TypeRenderer};
pub use scalars::ScalarTable;
