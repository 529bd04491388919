//! IR Values and Storage Slots
//!
//! Values are the single result of an instruction. Slots are addressable
//! storage: function-local allocas or module-level globals.

use super::types::IrType;

/// Value identifier, unique within one function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub u32);

impl ValueId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ValueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Typed SSA value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value {
    pub id: ValueId,
    pub ty: IrType,
}

impl Value {
    pub fn new(id: ValueId, ty: IrType) -> Self {
        Self { id, ty }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ty, self.id)
    }
}

/// Function-local stack slot identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalId(pub u32);

impl LocalId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Module-level global slot identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId(pub u32);

impl GlobalId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Address of a storage location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Local(LocalId),
    Global(GlobalId),
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Local(id) => write!(f, "%local.{}", id.0),
            Slot::Global(id) => write!(f, "@spill.{}", id.0),
        }
    }
}

/// A declared function-local slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSlot {
    pub id: LocalId,
    /// Source-level variable name (debugging only)
    pub name: String,
    pub ty: IrType,
}

/// A module-level spill slot. Spill slots carry no type; every access states
/// the type it reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSlot {
    pub id: GlobalId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        let v = Value::new(ValueId(3), IrType::I256);
        assert_eq!(v.to_string(), "i256 %3");
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::Local(LocalId(0)).to_string(), "%local.0");
        assert_eq!(Slot::Global(GlobalId(2)).to_string(), "@spill.2");
    }
}
