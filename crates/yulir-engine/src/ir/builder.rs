//! Function builder
//!
//! Cursor-style helper for constructing an `IrFunction`: instructions are
//! appended to the block the cursor points at.

use super::block::{BasicBlockId, Terminator};
use super::function::IrFunction;
use super::instr::{Callee, IrInstr};
use super::types::IrType;
use super::value::{LocalId, Slot, Value};
use num_bigint::BigUint;

/// Builder that owns the function under construction
pub struct FunctionBuilder {
    func: IrFunction,
    current_block: BasicBlockId,
}

impl FunctionBuilder {
    /// Start building `func`; creates the entry block and points the cursor
    /// at it.
    pub fn new(mut func: IrFunction) -> Self {
        let entry = func.add_block(Some("entry"));
        func.entry_block = entry;
        FunctionBuilder {
            func,
            current_block: entry,
        }
    }

    /// Switch to emitting into a different block
    pub fn switch_to_block(&mut self, block: BasicBlockId) {
        self.current_block = block;
    }

    pub fn current_block(&self) -> BasicBlockId {
        self.current_block
    }

    /// Create a new basic block (the cursor does not move)
    pub fn create_block(&mut self, label: &str) -> BasicBlockId {
        self.func.add_block(Some(label))
    }

    /// Check if the block under the cursor already has a terminator
    pub fn is_terminated(&self) -> bool {
        self.func
            .get_block(self.current_block)
            .map(|b| b.is_terminated())
            .unwrap_or(false)
    }

    /// Emit an instruction into the current block
    pub fn emit(&mut self, instr: IrInstr) {
        if let Some(block) = self.func.get_block_mut(self.current_block) {
            block.add_instr(instr);
        }
    }

    /// Set the terminator for the current block
    pub fn terminate(&mut self, term: Terminator) {
        if let Some(block) = self.func.get_block_mut(self.current_block) {
            block.set_terminator(term);
        }
    }

    pub fn alloc_value(&mut self, ty: IrType) -> Value {
        self.func.alloc_value(ty)
    }

    /// Emit an integer constant
    pub fn const_int(&mut self, ty: IrType, value: BigUint) -> Value {
        let dest = self.alloc_value(ty);
        self.emit(IrInstr::Const { dest, value });
        dest
    }

    /// Declare a local slot. Allocas always land in the entry block.
    pub fn alloca(&mut self, name: &str, ty: IrType) -> LocalId {
        let slot = self.func.add_local(name, ty);
        let entry = self.func.entry_block;
        if let Some(block) = self.func.get_block_mut(entry) {
            block.add_instr(IrInstr::Alloca { slot, ty });
        }
        slot
    }

    pub fn load(&mut self, slot: Slot, ty: IrType) -> Value {
        let dest = self.alloc_value(ty);
        self.emit(IrInstr::Load { dest, slot });
        dest
    }

    pub fn store(&mut self, slot: Slot, value: Value) {
        self.emit(IrInstr::Store { slot, value });
    }

    /// Emit a call; returns the result value unless `ret_ty` is void
    pub fn call(&mut self, callee: Callee, args: Vec<Value>, ret_ty: IrType) -> Option<Value> {
        let dest = (!ret_ty.is_void()).then(|| self.alloc_value(ret_ty));
        self.emit(IrInstr::Call { dest, callee, args });
        dest
    }

    /// Convert an integer to i1 (`operand != 0`); i1 values pass through
    pub fn to_bool(&mut self, operand: Value) -> Value {
        if operand.ty.is_bool() {
            return operand;
        }
        let dest = self.alloc_value(IrType::I1);
        self.emit(IrInstr::IsNonZero { dest, operand });
        dest
    }

    pub fn jump(&mut self, target: BasicBlockId) {
        self.terminate(Terminator::Jump(target));
    }

    pub fn branch(&mut self, cond: Value, then_block: BasicBlockId, else_block: BasicBlockId) {
        self.terminate(Terminator::Branch {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn switch(
        &mut self,
        value: Value,
        cases: Vec<(BigUint, BasicBlockId)>,
        default: BasicBlockId,
    ) {
        self.terminate(Terminator::Switch {
            value,
            cases,
            default,
        });
    }

    pub fn ret(&mut self, value: Option<Value>) {
        self.terminate(Terminator::Return(value));
    }

    pub fn func(&self) -> &IrFunction {
        &self.func
    }

    /// Finish building and hand out the function
    pub fn finish(self) -> IrFunction {
        self.func
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_starts_in_entry() {
        let builder = FunctionBuilder::new(IrFunction::new("f", &[], IrType::Void, 0));
        let func = builder.func();
        assert_eq!(func.block_count(), 1);
        assert_eq!(builder.current_block(), func.entry_block);
        assert_eq!(func.entry().and_then(|b| b.label.as_deref()), Some("entry"));
    }

    #[test]
    fn test_alloca_lands_in_entry() {
        let mut builder = FunctionBuilder::new(IrFunction::new("f", &[], IrType::Void, 0));
        let body = builder.create_block("body");
        builder.jump(body);
        builder.switch_to_block(body);
        let slot = builder.alloca("x", IrType::I256);
        let value = builder.const_int(IrType::I256, BigUint::from(1u32));
        builder.store(Slot::Local(slot), value);
        builder.ret(None);

        let func = builder.finish();
        let entry = func.entry().unwrap();
        assert!(matches!(entry.instructions[0], IrInstr::Alloca { .. }));
        assert!(matches!(entry.terminator, Terminator::Jump(b) if b == body));
        assert_eq!(func.get_block(body).unwrap().len(), 2);
    }

    #[test]
    fn test_to_bool_passes_i1_through() {
        let mut builder = FunctionBuilder::new(IrFunction::new("f", &[], IrType::Void, 0));
        let flag = builder.const_int(IrType::I1, BigUint::from(1u32));
        assert_eq!(builder.to_bool(flag), flag);

        let word = builder.const_int(IrType::I256, BigUint::from(5u32));
        let cond = builder.to_bool(word);
        assert_eq!(cond.ty, IrType::I1);
        assert_eq!(builder.func().instruction_count(), 3);
    }

    #[test]
    fn test_void_call_has_no_result() {
        let mut builder = FunctionBuilder::new(IrFunction::new("f", &[], IrType::Void, 0));
        let callee = Callee::Function(crate::ir::FunctionId(0));
        assert!(builder.call(callee.clone(), vec![], IrType::Void).is_none());
        assert!(builder.call(callee, vec![], IrType::I256).is_some());
    }
}
