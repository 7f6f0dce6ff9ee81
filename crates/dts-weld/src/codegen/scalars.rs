//! Native primitive -> TypeScript scalar table

use crate::codegen::LargeIntegerType;
use crate::ir::PrimitiveKind;

/// Scalar names for one target configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarTable {
    large: &'static str,
}

impl ScalarTable {
    pub fn new(large_integers: LargeIntegerType) -> Self {
        let large = match large_integers {
            LargeIntegerType::Number => "number",
            LargeIntegerType::Bigint => "bigint",
        };
        Self { large }
    }

    /// TypeScript name of `kind`
    pub fn name(&self, kind: PrimitiveKind) -> &'static str {
        match kind {
            PrimitiveKind::U8 | PrimitiveKind::U16 | PrimitiveKind::U32 => "number",
            PrimitiveKind::I8 | PrimitiveKind::I16 | PrimitiveKind::I32 => "number",
            PrimitiveKind::F32 | PrimitiveKind::F64 => "number",
            // May exceed Number.MAX_SAFE_INTEGER
            PrimitiveKind::U64 | PrimitiveKind::I64 => self.large,
            PrimitiveKind::Usize | PrimitiveKind::Isize => self.large,
            PrimitiveKind::U128 | PrimitiveKind::I128 => "bigint",
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Char | PrimitiveKind::String => "string",
        }
    }
}

impl Default for ScalarTable {
    fn default() -> Self {
        Self::new(LargeIntegerType::default())
    }
}
