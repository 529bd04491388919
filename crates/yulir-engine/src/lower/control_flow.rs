//! Loop target tracking
//!
//! `break` and `continue` resolve against the innermost enclosing loop.

use crate::error::{LowerError, LowerResult};
use crate::ir::BasicBlockId;

/// Jump targets of one loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTargets {
    /// Block to jump to for `break`
    pub break_block: BasicBlockId,
    /// Block to jump to for `continue`
    pub continue_block: BasicBlockId,
}

/// Stack of enclosing loops
#[derive(Debug, Default)]
pub struct ControlStack {
    stack: Vec<LoopTargets>,
}

impl ControlStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_loop(&mut self, break_block: BasicBlockId, continue_block: BasicBlockId) {
        self.stack.push(LoopTargets {
            break_block,
            continue_block,
        });
    }

    pub fn exit_loop(&mut self) -> Option<LoopTargets> {
        self.stack.pop()
    }

    pub fn current_break_target(&self) -> LowerResult<BasicBlockId> {
        self.stack
            .last()
            .map(|t| t.break_block)
            .ok_or_else(|| LowerError::NotInLoop {
                statement: "break".to_string(),
            })
    }

    pub fn current_continue_target(&self) -> LowerResult<BasicBlockId> {
        self.stack
            .last()
            .map(|t| t.continue_block)
            .ok_or_else(|| LowerError::NotInLoop {
                statement: "continue".to_string(),
            })
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_in_loop(&self) -> bool {
        !self.stack.is_empty()
    }
}
