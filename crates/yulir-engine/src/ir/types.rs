//! IR Types
//!
//! The target IR only knows fixed-width integers. Signedness is a property of
//! the operations a consumer applies, not of the type, so `u64` and `s64`
//! share `i64`.

use std::fmt;

/// Target machine type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrType {
    /// Integer of the given bit width (i1 is the boolean type)
    Int(u16),
    /// No value (function without return values)
    Void,
}

impl IrType {
    pub const I1: IrType = IrType::Int(1);
    pub const I8: IrType = IrType::Int(8);
    pub const I32: IrType = IrType::Int(32);
    pub const I64: IrType = IrType::Int(64);
    pub const I128: IrType = IrType::Int(128);
    pub const I256: IrType = IrType::Int(256);

    /// Bit width, `None` for void
    pub fn bits(&self) -> Option<u16> {
        match self {
            IrType::Int(bits) => Some(*bits),
            IrType::Void => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        *self == IrType::I1
    }

    pub fn is_void(&self) -> bool {
        matches!(self, IrType::Void)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Int(bits) => write!(f, "i{}", bits),
            IrType::Void => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(IrType::I1.to_string(), "i1");
        assert_eq!(IrType::I256.to_string(), "i256");
        assert_eq!(IrType::Void.to_string(), "void");
    }

    #[test]
    fn test_type_bits() {
        assert_eq!(IrType::I64.bits(), Some(64));
        assert_eq!(IrType::Void.bits(), None);
        assert!(IrType::Int(1).is_bool());
        assert!(!IrType::I8.is_bool());
    }
}
