//! Local slot and spill slot allocation
//!
//! Every declaration gets its own local slot, even when it reuses a name.
//! Names are looked up innermost-first among the declarations of the blocks
//! that are still open.
//!
//! Spill slots carry the second and later results of multi-value calls.
//! They are module globals shared by every function: the callee writes them
//! before returning, the caller reads them right after the call.

use crate::ir::{FunctionBuilder, GlobalId, IrModule, IrType, LocalId};

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    slot: LocalId,
    ty: IrType,
}

/// Per-function variable scopes
#[derive(Debug, Default)]
pub struct ScopeAllocator {
    bindings: Vec<Binding>,
    /// Length of `bindings` when each open block started
    marks: Vec<usize>,
}

impl ScopeAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh slot for `name`
    pub fn declare(&mut self, builder: &mut FunctionBuilder, name: &str, ty: IrType) -> LocalId {
        let slot = builder.alloca(name, ty);
        tracing::trace!(name, %ty, slot = slot.as_u32(), "declare");
        self.bindings.push(Binding {
            name: name.to_string(),
            slot,
            ty,
        });
        slot
    }

    /// Most recent visible declaration of `name`
    pub fn lookup(&self, name: &str) -> Option<(LocalId, IrType)> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| (b.slot, b.ty))
    }

    pub fn enter_scope(&mut self) {
        self.marks.push(self.bindings.len());
    }

    /// Hide the declarations of the innermost block. Their slots stay
    /// allocated.
    pub fn exit_scope(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.bindings.truncate(mark);
        }
    }

    pub fn visible_count(&self) -> usize {
        self.bindings.len()
    }
}

/// Module-wide pool of spill slots. Grows on demand, never shrinks.
#[derive(Debug, Default)]
pub struct SpillPool {
    slots: Vec<GlobalId>,
}

impl SpillPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarantee at least `count` slots, allocating globals in `module`
    pub fn ensure_capacity(&mut self, module: &mut IrModule, count: usize) {
        while self.slots.len() < count {
            let id = module.add_global();
            tracing::debug!(slot = id.as_u32(), "allocated spill slot");
            self.slots.push(id);
        }
    }

    /// Slot `index`, if already allocated
    pub fn slot(&self, index: usize) -> Option<GlobalId> {
        self.slots.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IrFunction;

    fn builder() -> FunctionBuilder {
        FunctionBuilder::new(IrFunction::new("f", &[], IrType::Void, 0))
    }

    #[test]
    fn test_redeclaration_gets_new_slot() {
        let mut b = builder();
        let mut scope = ScopeAllocator::new();
        let first = scope.declare(&mut b, "x", IrType::I256);
        let second = scope.declare(&mut b, "x", IrType::I64);
        assert_ne!(first, second);
        assert_eq!(scope.lookup("x"), Some((second, IrType::I64)));
        assert_eq!(b.func().local_count(), 2);
    }

    #[test]
    fn test_exit_scope_restores_outer_binding() {
        let mut b = builder();
        let mut scope = ScopeAllocator::new();
        let outer = scope.declare(&mut b, "x", IrType::I256);
        scope.enter_scope();
        scope.declare(&mut b, "x", IrType::I256);
        scope.declare(&mut b, "y", IrType::I256);
        scope.exit_scope();

        assert_eq!(scope.lookup("x"), Some((outer, IrType::I256)));
        assert_eq!(scope.lookup("y"), None);
        assert_eq!(scope.visible_count(), 1);
    }

    #[test]
    fn test_spill_pool_never_shrinks() {
        let mut module = IrModule::new("m");
        let mut pool = SpillPool::new();
        pool.ensure_capacity(&mut module, 2);
        assert_eq!(pool.len(), 2);
        pool.ensure_capacity(&mut module, 1);
        assert_eq!(pool.len(), 2);
        pool.ensure_capacity(&mut module, 3);
        assert_eq!(pool.len(), 3);
        assert_eq!(module.global_count(), 3);
        assert_eq!(pool.slot(2), Some(GlobalId(2)));
        assert_eq!(pool.slot(3), None);
    }
}
