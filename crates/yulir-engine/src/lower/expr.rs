//! Expression lowering

use super::{FunctionLowerer, Signature};
use crate::ast::{Expression, FunctionCall, Literal, LiteralKind};
use crate::dialect::BuiltinFunction;
use crate::error::{LowerError, LowerResult};
use crate::ir::{Callee, ExternalDecl, IrType, Slot, Value};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Outcome of lowering a call
#[derive(Debug, Clone, Copy)]
pub(super) struct CallResult {
    /// Direct result, `None` for calls without return values
    pub first: Option<Value>,
    /// Number of values the call produces
    pub count: usize,
}

/// Call target after name resolution
pub(super) enum ResolvedCallee<'d> {
    Builtin(&'d BuiltinFunction),
    Function(Signature),
}

impl ResolvedCallee<'_> {
    pub(super) fn value_count(&self) -> usize {
        match self {
            ResolvedCallee::Builtin(builtin) => builtin.returns.len(),
            ResolvedCallee::Function(signature) => signature.returns.len(),
        }
    }
}

impl<'l, 'd> FunctionLowerer<'l, 'd> {
    /// Lower an expression that must produce exactly one value
    pub(super) fn lower_expression(&mut self, expr: &Expression) -> LowerResult<Value> {
        match expr {
            Expression::Identifier(ident) => {
                let (slot, ty) =
                    self.scope
                        .lookup(&ident.name)
                        .ok_or_else(|| LowerError::UnresolvedName {
                            name: ident.name.clone(),
                        })?;
                Ok(self.builder.load(Slot::Local(slot), ty))
            }
            Expression::Literal(literal) => self.lower_literal(literal),
            Expression::FunctionCall(call) => {
                let result = self.lower_call(call)?;
                match result.first {
                    Some(value) if result.count == 1 => Ok(value),
                    _ => Err(LowerError::ValueCountMismatch {
                        expected: 1,
                        found: result.count,
                    }),
                }
            }
            Expression::FunctionalInstruction(instr) => Err(LowerError::UnsupportedConstruct {
                construct: format!("instruction '{}'", instr.instruction),
            }),
            Expression::Instruction(instr) => Err(LowerError::UnsupportedConstruct {
                construct: format!("instruction '{}'", instr.instruction),
            }),
        }
    }

    fn lower_literal(&mut self, literal: &Literal) -> LowerResult<Value> {
        let ty = if literal.ty.is_empty() && literal.literal_kind == LiteralKind::Boolean {
            self.cx.types.bool_type()
        } else {
            self.cx.types.resolve(&literal.ty)?
        };
        let value = literal_value_of_type(literal, ty)?;
        Ok(self.builder.const_int(ty, value))
    }

    /// Resolve a callee: dialect builtins first, then user functions
    pub(super) fn resolve_callee(&self, name: &str) -> LowerResult<ResolvedCallee<'d>> {
        let dialect = self.cx.dialect;
        if let Some(builtin) = dialect.lookup(name) {
            return Ok(ResolvedCallee::Builtin(builtin));
        }
        self.cx
            .signatures
            .get(name)
            .cloned()
            .map(ResolvedCallee::Function)
            .ok_or_else(|| LowerError::UnresolvedName {
                name: name.to_string(),
            })
    }

    pub(super) fn lower_call(&mut self, call: &FunctionCall) -> LowerResult<CallResult> {
        let callee = self.resolve_callee(&call.function_name.name)?;
        self.emit_call(callee, call)
    }

    /// Lower the arguments of an already resolved call and emit it
    pub(super) fn emit_call(
        &mut self,
        callee: ResolvedCallee<'d>,
        call: &FunctionCall,
    ) -> LowerResult<CallResult> {
        match callee {
            ResolvedCallee::Builtin(builtin) => self.lower_builtin_call(builtin, &call.arguments),
            ResolvedCallee::Function(signature) => {
                let args = self.lower_arguments(&call.arguments)?;
                let first =
                    self.builder
                        .call(Callee::Function(signature.id), args, signature.return_type());
                Ok(CallResult {
                    first,
                    count: signature.returns.len(),
                })
            }
        }
    }

    /// Lower arguments left to right
    fn lower_arguments(&mut self, arguments: &[Expression]) -> LowerResult<Vec<Value>> {
        arguments
            .iter()
            .map(|arg| self.lower_expression(arg))
            .collect()
    }

    fn lower_builtin_call(
        &mut self,
        builtin: &'d BuiltinFunction,
        arguments: &[Expression],
    ) -> LowerResult<CallResult> {
        // Builtins have no epilogue to fill spill slots.
        if builtin.returns.len() > 1 {
            return Err(LowerError::UnsupportedConstruct {
                construct: format!(
                    "builtin '{}' with {} return values",
                    builtin.name,
                    builtin.returns.len()
                ),
            });
        }
        let params = self.resolve_types(&builtin.parameters)?;
        let returns = self.resolve_types(&builtin.returns)?;

        let args = if builtin.literal_arguments {
            let mut args = Vec::with_capacity(arguments.len());
            for (index, arg) in arguments.iter().enumerate() {
                match arg {
                    Expression::Literal(literal) => args.push(self.lower_literal(literal)?),
                    _ => {
                        return Err(LowerError::NonLiteralArgument {
                            builtin: builtin.name.clone(),
                            index,
                        })
                    }
                }
            }
            args
        } else {
            self.lower_arguments(arguments)?
        };

        let effects = builtin.effects();
        let ret_ty = returns.first().copied().unwrap_or(IrType::Void);
        let count = returns.len();
        if self.cx.module.import_external(ExternalDecl {
            name: builtin.name.clone(),
            params,
            returns,
            effects,
        }) {
            tracing::trace!(builtin = %builtin.name, "imported builtin");
        }

        let first = self.builder.call(
            Callee::Builtin {
                name: builtin.name.clone(),
                effects,
            },
            args,
            ret_ty,
        );
        Ok(CallResult { first, count })
    }

    fn resolve_types(&self, names: &[String]) -> LowerResult<Vec<IrType>> {
        names.iter().map(|n| self.cx.types.resolve(n)).collect()
    }
}

/// Compile-time value of a literal. Strings fill a 32-byte word from the
/// left.
pub(super) fn literal_value(literal: &Literal) -> LowerResult<BigUint> {
    let invalid = || LowerError::InvalidLiteral {
        value: literal.value.clone(),
    };
    match literal.literal_kind {
        LiteralKind::Number => {
            let (digits, radix) = match literal.value.strip_prefix("0x") {
                Some(hex) => (hex, 16),
                None => (literal.value.as_str(), 10),
            };
            // `parse_bytes` also takes signs and `_` separators.
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return Err(invalid());
            }
            BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(invalid)
        }
        LiteralKind::Boolean => match literal.value.as_str() {
            "true" => Ok(BigUint::one()),
            "false" => Ok(BigUint::zero()),
            _ => Err(invalid()),
        },
        LiteralKind::String => {
            let bytes = literal.value.as_bytes();
            if bytes.len() > 32 {
                return Err(invalid());
            }
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            Ok(BigUint::from_bytes_be(&word))
        }
    }
}

/// Value of `literal`, rejected if it does not fit in `ty`
pub(super) fn literal_value_of_type(literal: &Literal, ty: IrType) -> LowerResult<BigUint> {
    let value = literal_value(literal)?;
    match ty.bits() {
        Some(bits) if value.bits() > u64::from(bits) => Err(LowerError::InvalidLiteral {
            value: literal.value.clone(),
        }),
        _ => Ok(value),
    }
}
