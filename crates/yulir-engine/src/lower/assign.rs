//! Multi-value assignment
//!
//! A call producing `k` values binds them positionally: the direct call
//! result is stored into the first slot, values `2..k` are read back from
//! spill slots `0..k-2`, which the callee filled before returning.

use super::FunctionLowerer;
use crate::ast::{Expression, FunctionCall};
use crate::error::{LowerError, LowerResult};
use crate::ir::{IrType, LocalId, Slot};

impl<'l, 'd> FunctionLowerer<'l, 'd> {
    /// Evaluate `value` and store its results into `slots`, in order
    pub(super) fn assign_values(
        &mut self,
        slots: &[(LocalId, IrType)],
        value: &Expression,
    ) -> LowerResult<()> {
        match (slots, value) {
            ([], _) => Err(LowerError::ValueCountMismatch {
                expected: 0,
                found: 1,
            }),
            ([(slot, _)], _) => {
                let value = self.lower_expression(value)?;
                self.store_local(*slot, value);
                Ok(())
            }
            (_, Expression::FunctionCall(call)) => self.assign_call_results(slots, call),
            _ => Err(LowerError::ValueCountMismatch {
                expected: slots.len(),
                found: 1,
            }),
        }
    }

    fn assign_call_results(
        &mut self,
        slots: &[(LocalId, IrType)],
        call: &FunctionCall,
    ) -> LowerResult<()> {
        let callee = self.resolve_callee(&call.function_name.name)?;
        let count = callee.value_count();
        if count != slots.len() {
            return Err(LowerError::ValueCountMismatch {
                expected: slots.len(),
                found: count,
            });
        }

        self.cx.ensure_spill_capacity(count - 1);
        let result = self.emit_call(callee, call)?;
        let first = result.first.ok_or(LowerError::ValueCountMismatch {
            expected: count,
            found: 0,
        })?;

        self.store_local(slots[0].0, first);
        for (index, &(slot, ty)) in slots.iter().enumerate().skip(1) {
            let spill = self.cx.spill_slot(index - 1)?;
            let value = self.builder.load(Slot::Global(spill), ty);
            self.store_local(slot, value);
        }
        tracing::trace!(callee = %call.function_name.name, values = count, "multi-value assignment");
        Ok(())
    }
}
