//! IR Instructions
//!
//! Every instruction produces at most one value.

use super::types::IrType;
use super::value::{LocalId, Slot, Value};
use num_bigint::BigUint;

/// Function identifier in the IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

impl FunctionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn{}", self.0)
    }
}

/// Purity and effect metadata copied from a builtin descriptor onto the call
/// that invokes it. Nothing in lowering reads these; later passes may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CallEffects {
    pub movable: bool,
    pub side_effect_free: bool,
    pub side_effect_free_if_no_msize: bool,
    pub invalidates_storage: bool,
    pub invalidates_memory: bool,
}

/// Call target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// Dialect builtin, imported as an external declaration
    Builtin { name: String, effects: CallEffects },
    /// Function defined in this module
    Function(FunctionId),
}

/// IR instruction
#[derive(Debug, Clone)]
pub enum IrInstr {
    /// Integer constant: dest = value
    Const { dest: Value, value: BigUint },

    /// Reserve a local slot of the given type
    Alloca { slot: LocalId, ty: IrType },

    /// Read a slot: dest = *slot
    Load { dest: Value, slot: Slot },

    /// Write a slot: *slot = value
    Store { slot: Slot, value: Value },

    /// Call: dest = callee(args)
    Call {
        dest: Option<Value>,
        callee: Callee,
        args: Vec<Value>,
    },

    /// Integer to i1 conversion: dest = operand != 0
    IsNonZero { dest: Value, operand: Value },
}

impl IrInstr {
    /// Get the destination value if this instruction produces one
    pub fn dest(&self) -> Option<&Value> {
        match self {
            IrInstr::Const { dest, .. }
            | IrInstr::Load { dest, .. }
            | IrInstr::IsNonZero { dest, .. } => Some(dest),
            IrInstr::Call { dest, .. } => dest.as_ref(),
            IrInstr::Alloca { .. } | IrInstr::Store { .. } => None,
        }
    }

    /// Check if this instruction has side effects
    pub fn has_side_effects(&self) -> bool {
        match self {
            IrInstr::Store { .. } => true,
            IrInstr::Call {
                callee: Callee::Builtin { effects, .. },
                ..
            } => !effects.side_effect_free,
            IrInstr::Call { .. } => true,
            IrInstr::Const { .. }
            | IrInstr::Alloca { .. }
            | IrInstr::Load { .. }
            | IrInstr::IsNonZero { .. } => false,
        }
    }

    /// Check if this instruction writes the given slot
    pub fn writes(&self, slot: Slot) -> bool {
        matches!(self, IrInstr::Store { slot: s, .. } if *s == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::value::ValueId;

    fn make_value(id: u32) -> Value {
        Value::new(ValueId::new(id), IrType::I256)
    }

    #[test]
    fn test_instr_dest() {
        let c = IrInstr::Const {
            dest: make_value(0),
            value: BigUint::from(7u32),
        };
        assert_eq!(c.dest(), Some(&make_value(0)));

        let store = IrInstr::Store {
            slot: Slot::Local(LocalId(0)),
            value: make_value(0),
        };
        assert!(store.dest().is_none());
        assert!(store.writes(Slot::Local(LocalId(0))));
        assert!(!store.writes(Slot::Local(LocalId(1))));
    }

    #[test]
    fn test_call_side_effects_follow_builtin_flags() {
        let pure = IrInstr::Call {
            dest: Some(make_value(1)),
            callee: Callee::Builtin {
                name: "add".to_string(),
                effects: CallEffects {
                    movable: true,
                    side_effect_free: true,
                    side_effect_free_if_no_msize: true,
                    ..CallEffects::default()
                },
            },
            args: vec![make_value(0), make_value(0)],
        };
        assert!(!pure.has_side_effects());

        let user = IrInstr::Call {
            dest: None,
            callee: Callee::Function(FunctionId(0)),
            args: vec![],
        };
        assert!(user.has_side_effects());
    }
}
