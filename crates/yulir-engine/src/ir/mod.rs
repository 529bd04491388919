//! Target IR
//!
//! The representation the lowering engine emits: typed integer values,
//! explicit storage slots, and basic blocks joined by explicit control-flow
//! edges.
//!
//! # Structure
//!
//! - `IrModule` - Top-level container: functions, spill globals, imported builtins
//! - `IrFunction` - A function with parameters, local slots, and basic blocks
//! - `BasicBlock` - A sequence of instructions with a single entry and exit
//! - `IrInstr` - Instructions producing at most one value
//! - `FunctionBuilder` - Cursor used to append instructions

pub mod block;
pub mod builder;
pub mod function;
pub mod instr;
pub mod module;
pub mod pretty;
pub mod types;
pub mod value;

pub use block::{BasicBlock, BasicBlockId, Terminator};
pub use builder::FunctionBuilder;
pub use function::IrFunction;
pub use instr::{CallEffects, Callee, FunctionId, IrInstr};
pub use module::{ExternalDecl, IrModule};
pub use pretty::PrettyPrint;
pub use types::IrType;
pub use value::{GlobalId, GlobalSlot, LocalId, LocalSlot, Slot, Value, ValueId};
