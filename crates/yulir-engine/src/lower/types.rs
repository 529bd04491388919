//! Semantic type mapping
//!
//! Yul type names resolve to fixed-width integer types. The catalog is fixed
//! when the mapper is built, so every lookup of one name yields an equal
//! type.

use crate::error::{LowerError, LowerResult};
use crate::ir::IrType;
use rustc_hash::FxHashMap;

/// Name of the default type for untyped declarations
pub const DEFAULT_TYPE: &str = "u256";

const CATALOG: &[(&str, IrType)] = &[
    ("bool", IrType::I1),
    ("u8", IrType::I8),
    ("s8", IrType::I8),
    ("u32", IrType::I32),
    ("s32", IrType::I32),
    ("u64", IrType::I64),
    ("s64", IrType::I64),
    ("u128", IrType::I128),
    ("s128", IrType::I128),
    ("u256", IrType::I256),
    ("s256", IrType::I256),
    // Target-native names used by host interface signatures
    ("i32", IrType::I32),
    ("i64", IrType::I64),
];

/// Semantic type name to target type
#[derive(Debug, Clone)]
pub struct TypeMapper {
    types: FxHashMap<&'static str, IrType>,
    default_type: IrType,
}

impl TypeMapper {
    pub fn new() -> Self {
        Self {
            types: CATALOG.iter().copied().collect(),
            default_type: IrType::I256,
        }
    }

    /// Mapper whose empty type name resolves to `name`
    pub fn with_default(name: &str) -> LowerResult<Self> {
        let mut mapper = Self::new();
        mapper.default_type = mapper.resolve(name)?;
        Ok(mapper)
    }

    /// Resolve a type name; the empty name is the default type
    pub fn resolve(&self, name: &str) -> LowerResult<IrType> {
        if name.is_empty() {
            return Ok(self.default_type);
        }
        self.types
            .get(name)
            .copied()
            .ok_or_else(|| LowerError::UnknownType {
                name: name.to_string(),
            })
    }

    pub fn bool_type(&self) -> IrType {
        IrType::I1
    }

    pub fn default_type(&self) -> IrType {
        self.default_type
    }

    pub fn contains(&self, name: &str) -> bool {
        name.is_empty() || self.types.contains_key(name)
    }
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}
