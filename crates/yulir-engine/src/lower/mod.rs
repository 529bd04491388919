//! Yul to IR lowering
//!
//! Lowering runs in two passes over the top-level block: the first registers
//! every function signature so calls may refer to functions defined further
//! down, the second lowers the bodies one function at a time, in source
//! order.
//!
//! Variables live in local slots; values are loaded when an identifier is
//! read and stored on every assignment. The second and later results of a
//! multi-value call travel through module-level spill slots.

mod assign;
pub mod control_flow;
mod expr;
pub mod scope;
mod stmt;
pub mod types;

pub use control_flow::{ControlStack, LoopTargets};
pub use scope::{ScopeAllocator, SpillPool};
pub use types::TypeMapper;

use crate::ast::{Block, FunctionDefinition, Statement};
use crate::dialect::Dialect;
use crate::error::{LowerError, LowerResult};
use crate::ir::{
    BasicBlockId, FunctionBuilder, FunctionId, GlobalId, IrFunction, IrModule, IrType, LocalId,
    Slot,
};
use num_bigint::BigUint;
use num_traits::Zero;
use rustc_hash::FxHashMap;

/// Module name used when the caller does not pick one
pub const DEFAULT_MODULE_NAME: &str = "yul";

/// Resolved signature of a user-defined function
#[derive(Debug, Clone)]
struct Signature {
    id: FunctionId,
    params: Vec<IrType>,
    returns: Vec<IrType>,
}

impl Signature {
    fn return_type(&self) -> IrType {
        self.returns.first().copied().unwrap_or(IrType::Void)
    }
}

/// Module-level lowering state
pub struct Lowerer<'d> {
    dialect: &'d Dialect,
    types: TypeMapper,
    module: IrModule,
    /// Function name to signature
    signatures: FxHashMap<String, Signature>,
    spills: SpillPool,
}

impl<'d> Lowerer<'d> {
    pub fn new(dialect: &'d Dialect, types: TypeMapper, module_name: impl Into<String>) -> Self {
        Self {
            dialect,
            types,
            module: IrModule::new(module_name),
            signatures: FxHashMap::default(),
            spills: SpillPool::new(),
        }
    }

    /// Lower a program: a block holding only function definitions.
    ///
    /// Errors carry the name of the function they occurred in. Nothing is
    /// returned on error.
    pub fn run(mut self, ast: &Block) -> LowerResult<IrModule> {
        let mut definitions = Vec::with_capacity(ast.statements.len());
        for statement in &ast.statements {
            match statement {
                Statement::FunctionDefinition(def) => definitions.push(def),
                other => {
                    return Err(LowerError::UnsupportedConstruct {
                        construct: format!("top-level {}", statement_kind(other)),
                    })
                }
            }
        }

        for (index, def) in definitions.iter().enumerate() {
            self.register_signature(FunctionId::new(index as u32), def)
                .map_err(|e| e.in_function(&def.name))?;
        }

        for def in definitions {
            let func = self
                .translate_function(def)
                .map_err(|e| e.in_function(&def.name))?;
            self.module.add_function(func);
        }

        tracing::debug!(
            module = %self.module.name,
            functions = self.module.function_count(),
            spills = self.spills.len(),
            externals = self.module.externals.len(),
            "lowered module"
        );
        Ok(self.module)
    }

    fn register_signature(&mut self, id: FunctionId, def: &FunctionDefinition) -> LowerResult<()> {
        let params = def
            .parameters
            .iter()
            .map(|p| self.types.resolve(&p.ty))
            .collect::<LowerResult<Vec<_>>>()?;
        let returns = def
            .return_variables
            .iter()
            .map(|r| self.types.resolve(&r.ty))
            .collect::<LowerResult<Vec<_>>>()?;
        self.signatures.insert(
            def.name.clone(),
            Signature {
                id,
                params,
                returns,
            },
        );
        Ok(())
    }

    fn translate_function(&mut self, def: &FunctionDefinition) -> LowerResult<IrFunction> {
        let _span = tracing::debug_span!("function", name = %def.name).entered();
        let signature = self
            .signatures
            .get(&def.name)
            .cloned()
            .ok_or_else(|| LowerError::UnresolvedName {
                name: def.name.clone(),
            })?;

        let func = IrFunction::new(
            def.name.as_str(),
            &signature.params,
            signature.return_type(),
            signature.returns.len(),
        );
        let mut fl = FunctionLowerer::new(self, FunctionBuilder::new(func));

        // Parameters are copied into slots so they can be reassigned.
        let params = fl.builder.func().params.clone();
        for (param, value) in def.parameters.iter().zip(params) {
            let slot = fl.scope.declare(&mut fl.builder, &param.name, value.ty);
            fl.builder.store(Slot::Local(slot), value);
        }

        let mut return_slots = Vec::with_capacity(signature.returns.len());
        for (var, &ty) in def.return_variables.iter().zip(&signature.returns) {
            let slot = fl.scope.declare(&mut fl.builder, &var.name, ty);
            let zero = fl.builder.const_int(ty, BigUint::zero());
            fl.builder.store(Slot::Local(slot), zero);
            return_slots.push((slot, ty));
        }

        fl.lower_block(&def.body)?;

        if !fl.builder.is_terminated() {
            fl.emit_epilogue(&return_slots)?;
        }

        let func = fl.finish();
        tracing::debug!(
            blocks = func.block_count(),
            instructions = func.instruction_count(),
            "lowered function"
        );
        Ok(func)
    }

    fn ensure_spill_capacity(&mut self, count: usize) {
        self.spills.ensure_capacity(&mut self.module, count);
    }

    fn spill_slot(&self, index: usize) -> LowerResult<GlobalId> {
        // Capacity is always ensured before a spill slot is touched.
        self.spills
            .slot(index)
            .ok_or(LowerError::ValueCountMismatch {
                expected: index + 1,
                found: self.spills.len(),
            })
    }
}

/// Lower `ast` with the default type mapping and module name
pub fn lower_program(ast: &Block, dialect: &Dialect) -> LowerResult<IrModule> {
    Lowerer::new(dialect, TypeMapper::new(), DEFAULT_MODULE_NAME).run(ast)
}

/// Per-function lowering state
struct FunctionLowerer<'l, 'd> {
    cx: &'l mut Lowerer<'d>,
    builder: FunctionBuilder,
    scope: ScopeAllocator,
    loops: ControlStack,
}

impl<'l, 'd> FunctionLowerer<'l, 'd> {
    fn new(cx: &'l mut Lowerer<'d>, builder: FunctionBuilder) -> Self {
        Self {
            cx,
            builder,
            scope: ScopeAllocator::new(),
            loops: ControlStack::new(),
        }
    }

    /// Run `f` with a loop pushed onto the control stack. The loop is popped
    /// before returning, whether `f` succeeded or not.
    fn with_loop<T>(
        &mut self,
        break_block: BasicBlockId,
        continue_block: BasicBlockId,
        f: impl FnOnce(&mut Self) -> LowerResult<T>,
    ) -> LowerResult<T> {
        self.loops.enter_loop(break_block, continue_block);
        let result = f(self);
        self.loops.exit_loop();
        result
    }

    /// Return from the function: values 2..k go to spill slots, value 1 is
    /// the direct result.
    fn emit_epilogue(&mut self, return_slots: &[(LocalId, IrType)]) -> LowerResult<()> {
        if return_slots.len() > 1 {
            self.cx.ensure_spill_capacity(return_slots.len() - 1);
        }
        let mut first = None;
        for (index, &(slot, ty)) in return_slots.iter().enumerate() {
            let value = self.builder.load(Slot::Local(slot), ty);
            if index == 0 {
                first = Some(value);
            } else {
                let spill = self.cx.spill_slot(index - 1)?;
                self.builder.store(Slot::Global(spill), value);
            }
        }
        self.builder.ret(first);
        Ok(())
    }

    fn finish(self) -> IrFunction {
        self.builder.finish()
    }
}

fn statement_kind(statement: &Statement) -> &'static str {
    match statement {
        Statement::Block(_) => "block",
        Statement::VariableDeclaration(_) => "variable declaration",
        Statement::Assignment(_) => "assignment",
        Statement::ExpressionStatement(_) => "expression statement",
        Statement::If(_) => "if",
        Statement::Switch(_) => "switch",
        Statement::ForLoop(_) => "for loop",
        Statement::Break => "break",
        Statement::Continue => "continue",
        Statement::FunctionDefinition(_) => "function definition",
        Statement::Label(_) => "label",
        Statement::StackAssignment(_) => "stack assignment",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, ForLoop, Label, TypedName};
    use crate::ir::{IrInstr, Terminator};

    fn function(name: &str, returns: &[&str], body: Vec<Statement>) -> Statement {
        Statement::FunctionDefinition(FunctionDefinition {
            name: name.to_string(),
            parameters: vec![],
            return_variables: returns.iter().map(|r| TypedName::new(*r, "u256")).collect(),
            body: Block::new(body),
        })
    }

    fn failing_loop() -> Statement {
        Statement::ForLoop(ForLoop {
            pre: Block::default(),
            condition: Box::new(Expression::number("1", "bool")),
            post: Block::default(),
            body: Block::new(vec![Statement::Label(Label {
                name: "l".to_string(),
            })]),
        })
    }

    #[test]
    fn test_loop_stack_restored_after_failure() {
        let dialect = Dialect::llvm_ir();
        let mut lowerer = Lowerer::new(&dialect, TypeMapper::new(), "m");
        let func = IrFunction::new("f", &[], IrType::Void, 0);
        let mut fl = FunctionLowerer::new(&mut lowerer, FunctionBuilder::new(func));

        let err = fl.lower_statement(&failing_loop()).unwrap_err();
        assert!(matches!(err, LowerError::UnsupportedConstruct { .. }));
        assert_eq!(fl.loops.depth(), 0);
    }

    #[test]
    fn test_loop_stack_restored_after_success() {
        let dialect = Dialect::llvm_ir();
        let mut lowerer = Lowerer::new(&dialect, TypeMapper::new(), "m");
        let func = IrFunction::new("f", &[], IrType::Void, 0);
        let mut fl = FunctionLowerer::new(&mut lowerer, FunctionBuilder::new(func));

        fl.loops.enter_loop(BasicBlockId(0), BasicBlockId(0));
        let body = Statement::ForLoop(ForLoop {
            pre: Block::default(),
            condition: Box::new(Expression::number("0", "bool")),
            post: Block::default(),
            body: Block::new(vec![Statement::Continue]),
        });
        fl.lower_statement(&body).unwrap();
        assert_eq!(fl.loops.depth(), 1);
    }

    #[test]
    fn test_break_outside_loop_emits_nothing() {
        let dialect = Dialect::llvm_ir();
        let mut lowerer = Lowerer::new(&dialect, TypeMapper::new(), "m");
        let func = IrFunction::new("f", &[], IrType::Void, 0);
        let mut fl = FunctionLowerer::new(&mut lowerer, FunctionBuilder::new(func));

        for statement in [Statement::Break, Statement::Continue] {
            assert!(matches!(
                fl.lower_statement(&statement),
                Err(LowerError::NotInLoop { .. })
            ));
        }
        assert!(!fl.builder.is_terminated());
        assert_eq!(fl.builder.func().block_count(), 1);
    }

    #[test]
    fn test_error_names_function() {
        let dialect = Dialect::llvm_ir();
        let ast = Block::new(vec![
            function("ok", &[], vec![]),
            function("bad", &[], vec![Statement::Break]),
        ]);
        let err = lower_program(&ast, &dialect).unwrap_err();
        match &err {
            LowerError::InFunction { function, .. } => assert_eq!(function, "bad"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root(), LowerError::NotInLoop { .. }));
    }

    #[test]
    fn test_top_level_statement_rejected() {
        let dialect = Dialect::llvm_ir();
        let ast = Block::new(vec![Statement::Break]);
        assert!(matches!(
            lower_program(&ast, &dialect),
            Err(LowerError::UnsupportedConstruct { .. })
        ));
    }

    #[test]
    fn test_callee_writes_spill_slots() {
        let dialect = Dialect::llvm_ir();
        let ast = Block::new(vec![function("pair", &["a", "b", "c"], vec![])]);
        let module = lower_program(&ast, &dialect).unwrap();
        assert_eq!(module.global_count(), 2);

        let func = module.get_function_by_name("pair").unwrap();
        assert_eq!(func.return_ty, IrType::I256);
        assert_eq!(func.return_count, 3);
        let entry = func.entry().unwrap();
        let spill_stores = entry
            .instructions
            .iter()
            .filter(|i| matches!(i, IrInstr::Store { slot: Slot::Global(_), .. }))
            .count();
        assert_eq!(spill_stores, 2);
        assert!(matches!(entry.terminator, Terminator::Return(Some(_))));
    }
}
