//! Basic Blocks and Control Flow
//!
//! Basic blocks are sequences of instructions with a single entry point
//! and a single exit point (the terminator).

use super::instr::IrInstr;
use super::value::Value;
use num_bigint::BigUint;

/// Basic block identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicBlockId(pub u32);

impl BasicBlockId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BasicBlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// A basic block: sequence of instructions with single entry and exit
#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// Unique identifier for this block
    pub id: BasicBlockId,
    /// Optional label for debugging
    pub label: Option<String>,
    /// Instructions in this block (excluding terminator)
    pub instructions: Vec<IrInstr>,
    /// How this block exits
    pub terminator: Terminator,
}

impl BasicBlock {
    /// Create a new empty basic block
    pub fn new(id: BasicBlockId) -> Self {
        Self {
            id,
            label: None,
            instructions: Vec::new(),
            terminator: Terminator::Unreachable,
        }
    }

    /// Create a new basic block with a label
    pub fn with_label(id: BasicBlockId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: Some(label.into()),
            instructions: Vec::new(),
            terminator: Terminator::Unreachable,
        }
    }

    pub fn add_instr(&mut self, instr: IrInstr) {
        self.instructions.push(instr);
    }

    pub fn set_terminator(&mut self, term: Terminator) {
        self.terminator = term;
    }

    pub fn successors(&self) -> Vec<BasicBlockId> {
        self.terminator.successors()
    }

    /// Check if this block is terminated (not unreachable)
    pub fn is_terminated(&self) -> bool {
        !matches!(self.terminator, Terminator::Unreachable)
    }

    /// Number of instructions (excluding terminator)
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Control flow terminator (ends a basic block)
#[derive(Debug, Clone)]
pub enum Terminator {
    /// Unconditional jump to target block
    Jump(BasicBlockId),

    /// Conditional branch on an i1 value
    Branch {
        cond: Value,
        then_block: BasicBlockId,
        else_block: BasicBlockId,
    },

    /// Multi-way branch on an integer value
    Switch {
        value: Value,
        cases: Vec<(BigUint, BasicBlockId)>,
        default: BasicBlockId,
    },

    /// Return from function with optional value
    Return(Option<Value>),

    /// No terminator set yet, or control never reaches the end of the block
    Unreachable,
}

impl Terminator {
    /// Get all successor blocks
    pub fn successors(&self) -> Vec<BasicBlockId> {
        match self {
            Terminator::Jump(target) => vec![*target],
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            Terminator::Switch { cases, default, .. } => {
                let mut succs: Vec<_> = cases.iter().map(|(_, block)| *block).collect();
                succs.push(*default);
                succs
            }
            Terminator::Return(_) | Terminator::Unreachable => vec![],
        }
    }
}

impl std::fmt::Display for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terminator::Jump(target) => write!(f, "br label %{}", target),
            Terminator::Branch {
                cond,
                then_block,
                else_block,
            } => write!(
                f,
                "br {}, label %{}, label %{}",
                cond, then_block, else_block
            ),
            Terminator::Switch {
                value,
                cases,
                default,
            } => {
                write!(f, "switch {}, label %{} [", value, default)?;
                for (i, (val, block)) in cases.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {} {}, label %{}", value.ty, val, block)?;
                }
                write!(f, " ]")
            }
            Terminator::Return(None) => write!(f, "ret void"),
            Terminator::Return(Some(value)) => write!(f, "ret {}", value),
            Terminator::Unreachable => write!(f, "unreachable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::types::IrType;
    use crate::ir::value::ValueId;

    fn make_value(id: u32, ty: IrType) -> Value {
        Value::new(ValueId::new(id), ty)
    }

    #[test]
    fn test_basic_block_new() {
        let block = BasicBlock::new(BasicBlockId(0));
        assert_eq!(block.id, BasicBlockId(0));
        assert!(block.instructions.is_empty());
        assert!(!block.is_terminated());
    }

    #[test]
    fn test_basic_block_with_label() {
        let block = BasicBlock::with_label(BasicBlockId(1), "entry");
        assert_eq!(block.label, Some("entry".to_string()));
    }

    #[test]
    fn test_terminator_successors() {
        let jump = Terminator::Jump(BasicBlockId(1));
        assert_eq!(jump.successors(), vec![BasicBlockId(1)]);

        let branch = Terminator::Branch {
            cond: make_value(0, IrType::I1),
            then_block: BasicBlockId(1),
            else_block: BasicBlockId(2),
        };
        assert_eq!(branch.successors(), vec![BasicBlockId(1), BasicBlockId(2)]);

        let switch = Terminator::Switch {
            value: make_value(0, IrType::I256),
            cases: vec![
                (BigUint::from(0u32), BasicBlockId(3)),
                (BigUint::from(1u32), BasicBlockId(4)),
            ],
            default: BasicBlockId(5),
        };
        assert_eq!(
            switch.successors(),
            vec![BasicBlockId(3), BasicBlockId(4), BasicBlockId(5)]
        );

        assert!(Terminator::Return(None).successors().is_empty());
    }

    #[test]
    fn test_terminator_display() {
        let jump = Terminator::Jump(BasicBlockId(1));
        assert_eq!(jump.to_string(), "br label %bb1");

        assert_eq!(Terminator::Return(None).to_string(), "ret void");

        let ret_val = Terminator::Return(Some(make_value(0, IrType::I256)));
        assert_eq!(ret_val.to_string(), "ret i256 %0");

        let switch = Terminator::Switch {
            value: make_value(2, IrType::I256),
            cases: vec![(BigUint::from(1u32), BasicBlockId(3))],
            default: BasicBlockId(4),
        };
        assert_eq!(
            switch.to_string(),
            "switch i256 %2, label %bb4 [ i256 1, label %bb3 ]"
        );
    }
}
