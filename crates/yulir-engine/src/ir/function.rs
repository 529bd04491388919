//! IR Functions
//!
//! Functions in the IR contain parameters, local slots, and basic blocks.

use super::block::{BasicBlock, BasicBlockId};
use super::types::IrType;
use super::value::{LocalId, LocalSlot, Value, ValueId};
use rustc_hash::FxHashMap;

/// An IR function
#[derive(Debug, Clone)]
pub struct IrFunction {
    /// Function name
    pub name: String,
    /// Parameter values (with types)
    pub params: Vec<Value>,
    /// Type of the directly returned value
    pub return_ty: IrType,
    /// Number of values the source function returns. Values beyond the
    /// first travel through the module's spill slots.
    pub return_count: usize,
    /// Local slots (allocas)
    pub locals: Vec<LocalSlot>,
    /// Basic blocks (in order)
    pub blocks: Vec<BasicBlock>,
    /// Entry block ID
    pub entry_block: BasicBlockId,
    /// Block lookup map for fast access
    block_map: FxHashMap<BasicBlockId, usize>,
    next_value: u32,
}

impl IrFunction {
    /// Create a new function. Parameter values are allocated here so their
    /// ids come first.
    pub fn new(
        name: impl Into<String>,
        param_types: &[IrType],
        return_ty: IrType,
        return_count: usize,
    ) -> Self {
        let mut func = Self {
            name: name.into(),
            params: Vec::with_capacity(param_types.len()),
            return_ty,
            return_count,
            locals: Vec::new(),
            blocks: Vec::new(),
            entry_block: BasicBlockId(0),
            block_map: FxHashMap::default(),
            next_value: 0,
        };
        for &ty in param_types {
            let value = func.alloc_value(ty);
            func.params.push(value);
        }
        func
    }

    /// Allocate a fresh value id
    pub fn alloc_value(&mut self, ty: IrType) -> Value {
        let id = ValueId::new(self.next_value);
        self.next_value += 1;
        Value::new(id, ty)
    }

    /// Add a local slot and return its ID
    pub fn add_local(&mut self, name: impl Into<String>, ty: IrType) -> LocalId {
        let id = LocalId::new(self.locals.len() as u32);
        self.locals.push(LocalSlot {
            id,
            name: name.into(),
            ty,
        });
        id
    }

    pub fn get_local(&self, id: LocalId) -> Option<&LocalSlot> {
        self.locals.get(id.0 as usize)
    }

    /// Create and add a new empty block
    pub fn add_block(&mut self, label: Option<&str>) -> BasicBlockId {
        let id = BasicBlockId::new(self.blocks.len() as u32);
        let block = match label {
            Some(label) => BasicBlock::with_label(id, label),
            None => BasicBlock::new(id),
        };
        self.block_map.insert(id, self.blocks.len());
        self.blocks.push(block);
        id
    }

    /// Get a block by ID
    pub fn get_block(&self, id: BasicBlockId) -> Option<&BasicBlock> {
        self.block_map.get(&id).map(|&idx| &self.blocks[idx])
    }

    /// Get a mutable block by ID
    pub fn get_block_mut(&mut self, id: BasicBlockId) -> Option<&mut BasicBlock> {
        self.block_map
            .get(&id)
            .copied()
            .map(|idx| &mut self.blocks[idx])
    }

    /// Get the first block carrying the given label
    pub fn block_by_label(&self, label: &str) -> Option<&BasicBlock> {
        self.blocks
            .iter()
            .find(|b| b.label.as_deref() == Some(label))
    }

    pub fn entry(&self) -> Option<&BasicBlock> {
        self.get_block(self.entry_block)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter()
    }

    /// Compute the total number of instructions across all blocks
    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }

    /// Validate the function structure
    pub fn validate(&self) -> Result<(), String> {
        if self.blocks.is_empty() {
            return Err("Function has no blocks".to_string());
        }

        if self.get_block(self.entry_block).is_none() {
            return Err(format!("Entry block {} does not exist", self.entry_block));
        }

        for block in &self.blocks {
            for succ in block.successors() {
                if self.get_block(succ).is_none() {
                    return Err(format!(
                        "Block {} references non-existent successor {}",
                        block.id, succ
                    ));
                }
            }
        }

        // Blocks without predecessors may keep the placeholder.
        let mut seen = vec![false; self.blocks.len()];
        let mut worklist = vec![self.entry_block];
        while let Some(id) = worklist.pop() {
            let Some(&idx) = self.block_map.get(&id) else {
                continue;
            };
            if std::mem::replace(&mut seen[idx], true) {
                continue;
            }
            let block = &self.blocks[idx];
            if !block.is_terminated() {
                return Err(format!("Reachable block {} has no terminator", block.id));
            }
            worklist.extend(block.successors());
        }

        Ok(())
    }
}
