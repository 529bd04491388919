//! Statement lowering

use super::expr::literal_value_of_type;
use super::{statement_kind, FunctionLowerer};
use crate::ast::{self, Block, Statement};
use crate::error::{LowerError, LowerResult};
use crate::ir::{LocalId, Slot, Value};

impl<'l, 'd> FunctionLowerer<'l, 'd> {
    /// Lower a block in its own variable scope
    pub(super) fn lower_block(&mut self, block: &Block) -> LowerResult<()> {
        self.scope.enter_scope();
        let result = self.lower_statements(&block.statements);
        self.scope.exit_scope();
        result
    }

    /// Lower statements into the current scope
    fn lower_statements(&mut self, statements: &[Statement]) -> LowerResult<()> {
        for statement in statements {
            // Code after break/continue is still lowered, into a block
            // nothing jumps to.
            if self.builder.is_terminated() {
                let dead = self.builder.create_block("unreachable");
                self.builder.switch_to_block(dead);
            }
            self.lower_statement(statement)?;
        }
        Ok(())
    }

    pub(super) fn lower_statement(&mut self, statement: &Statement) -> LowerResult<()> {
        match statement {
            Statement::Block(block) => self.lower_block(block),
            Statement::VariableDeclaration(decl) => self.lower_var_decl(decl),
            Statement::Assignment(assign) => self.lower_assignment(assign),
            Statement::ExpressionStatement(stmt) => {
                self.lower_expression_statement(stmt).map(|_| ())
            }
            Statement::If(if_stmt) => self.lower_if(if_stmt),
            Statement::Switch(switch) => self.lower_switch(switch),
            Statement::ForLoop(for_loop) => self.lower_for(for_loop),
            Statement::Break => {
                let target = self.loops.current_break_target()?;
                self.builder.jump(target);
                Ok(())
            }
            Statement::Continue => {
                let target = self.loops.current_continue_target()?;
                self.builder.jump(target);
                Ok(())
            }
            Statement::FunctionDefinition(def) => Err(LowerError::MisplacedDefinition {
                name: def.name.clone(),
            }),
            Statement::Label(_) | Statement::StackAssignment(_) => {
                Err(LowerError::UnsupportedConstruct {
                    construct: statement_kind(statement).to_string(),
                })
            }
        }
    }

    fn lower_var_decl(&mut self, decl: &ast::VariableDeclaration) -> LowerResult<()> {
        let mut slots = Vec::with_capacity(decl.variables.len());
        for var in &decl.variables {
            let ty = self.cx.types.resolve(&var.ty)?;
            let slot = self.scope.declare(&mut self.builder, &var.name, ty);
            slots.push((slot, ty));
        }
        // Without an initializer the slots stay uninitialized.
        match &decl.value {
            Some(value) => self.assign_values(&slots, value),
            None => Ok(()),
        }
    }

    fn lower_assignment(&mut self, assign: &ast::Assignment) -> LowerResult<()> {
        let slots = assign
            .variable_names
            .iter()
            .map(|ident| {
                self.scope
                    .lookup(&ident.name)
                    .ok_or_else(|| LowerError::UnresolvedName {
                        name: ident.name.clone(),
                    })
            })
            .collect::<LowerResult<Vec<_>>>()?;
        self.assign_values(&slots, &assign.value)
    }

    /// Lower an expression for its side effects. Values beyond the first are
    /// discarded; the first is handed back.
    pub(super) fn lower_expression_statement(
        &mut self,
        stmt: &ast::ExpressionStatement,
    ) -> LowerResult<Option<Value>> {
        match &stmt.expression {
            ast::Expression::FunctionCall(call) => Ok(self.lower_call(call)?.first),
            other => self.lower_expression(other).map(Some),
        }
    }

    fn lower_if(&mut self, if_stmt: &ast::If) -> LowerResult<()> {
        let cond = self.lower_condition(&if_stmt.condition)?;

        let then_block = self.builder.create_block("if.then");
        let end_block = self.builder.create_block("if.end");
        self.builder.branch(cond, then_block, end_block);

        self.builder.switch_to_block(then_block);
        self.lower_block(&if_stmt.body)?;
        if !self.builder.is_terminated() {
            self.builder.jump(end_block);
        }

        self.builder.switch_to_block(end_block);
        Ok(())
    }

    fn lower_switch(&mut self, switch: &ast::Switch) -> LowerResult<()> {
        let scrutinee = self.lower_expression(&switch.expression)?;
        let end_block = self.builder.create_block("switch.end");

        let mut cases = Vec::new();
        let mut default_block = None;
        let mut arms = Vec::with_capacity(switch.cases.len());
        for case in &switch.cases {
            match &case.value {
                Some(literal) => {
                    let block = self.builder.create_block("switch.case");
                    cases.push((literal_value_of_type(literal, scrutinee.ty)?, block));
                    arms.push((block, &case.body));
                }
                None => {
                    let block = self.builder.create_block("switch.default");
                    default_block = Some(block);
                    arms.push((block, &case.body));
                }
            }
        }
        self.builder
            .switch(scrutinee, cases, default_block.unwrap_or(end_block));

        for (block, body) in arms {
            self.builder.switch_to_block(block);
            self.lower_block(body)?;
            if !self.builder.is_terminated() {
                self.builder.jump(end_block);
            }
        }

        self.builder.switch_to_block(end_block);
        Ok(())
    }

    fn lower_for(&mut self, for_loop: &ast::ForLoop) -> LowerResult<()> {
        let init_block = self.builder.create_block("for.init");
        self.builder.jump(init_block);
        self.builder.switch_to_block(init_block);

        // Variables of the init block stay visible in the whole loop.
        self.scope.enter_scope();
        let result = self.lower_for_parts(for_loop);
        self.scope.exit_scope();
        result
    }

    fn lower_for_parts(&mut self, for_loop: &ast::ForLoop) -> LowerResult<()> {
        self.lower_statements(&for_loop.pre.statements)?;

        let cond_block = self.builder.create_block("for.cond");
        let body_block = self.builder.create_block("for.body");
        let post_block = self.builder.create_block("for.post");
        let exit_block = self.builder.create_block("for.exit");
        if !self.builder.is_terminated() {
            self.builder.jump(cond_block);
        }

        self.builder.switch_to_block(cond_block);
        let cond = self.lower_condition(&for_loop.condition)?;
        self.builder.branch(cond, body_block, exit_block);

        self.builder.switch_to_block(body_block);
        self.with_loop(exit_block, post_block, |this| {
            this.lower_block(&for_loop.body)
        })?;
        if !self.builder.is_terminated() {
            self.builder.jump(post_block);
        }

        self.builder.switch_to_block(post_block);
        self.lower_block(&for_loop.post)?;
        if !self.builder.is_terminated() {
            self.builder.jump(cond_block);
        }

        self.builder.switch_to_block(exit_block);
        Ok(())
    }

    /// Lower a branch condition to an i1 value
    fn lower_condition(&mut self, expr: &ast::Expression) -> LowerResult<Value> {
        let value = self.lower_expression(expr)?;
        Ok(self.builder.to_bool(value))
    }

    pub(super) fn store_local(&mut self, slot: LocalId, value: Value) {
        self.builder.store(Slot::Local(slot), value);
    }
}
