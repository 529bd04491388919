//! Pretty-printing for IR
//!
//! Produces an LLVM-flavoured textual listing. The format is for humans and
//! golden tests; nothing parses it back.

use super::block::BasicBlock;
use super::function::IrFunction;
use super::instr::{CallEffects, Callee, IrInstr};
use super::module::{ExternalDecl, IrModule};
use std::fmt::Write;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for IrModule {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        writeln!(output, "; module {}", self.name).unwrap();

        if !self.globals.is_empty() {
            writeln!(output).unwrap();
            for global in &self.globals {
                writeln!(output, "@spill.{} = global", global.id.as_u32()).unwrap();
            }
        }

        if !self.externals.is_empty() {
            writeln!(output).unwrap();
            for ext in &self.externals {
                writeln!(output, "{}", format_external(ext)).unwrap();
            }
        }

        for func in &self.functions {
            writeln!(output).unwrap();
            output.push_str(&format_function(func, Some(self)));
        }

        output
    }
}

impl PrettyPrint for IrFunction {
    fn pretty_print(&self) -> String {
        format_function(self, None)
    }
}

fn format_function(func: &IrFunction, module: Option<&IrModule>) -> String {
    let mut output = String::new();

    let params: Vec<String> = func.params.iter().map(|p| p.to_string()).collect();
    write!(
        output,
        "define {} @{}({})",
        func.return_ty,
        func.name,
        params.join(", ")
    )
    .unwrap();
    if func.return_count > 1 {
        write!(output, " ; returns {}", func.return_count).unwrap();
    }
    writeln!(output, " {{").unwrap();

    for block in &func.blocks {
        output.push_str(&format_block(block, func, module));
    }

    writeln!(output, "}}").unwrap();
    output
}

fn format_block(block: &BasicBlock, func: &IrFunction, module: Option<&IrModule>) -> String {
    let mut output = String::new();

    if let Some(label) = &block.label {
        writeln!(output, "{}: ; {}", block.id, label).unwrap();
    } else {
        writeln!(output, "{}:", block.id).unwrap();
    }

    for instr in &block.instructions {
        writeln!(output, "  {}", format_instr(instr, func, module)).unwrap();
    }

    writeln!(output, "  {}", block.terminator).unwrap();
    output
}

fn format_instr(instr: &IrInstr, func: &IrFunction, module: Option<&IrModule>) -> String {
    match instr {
        IrInstr::Const { dest, value } => {
            format!("{} = const {} {}", dest.id, dest.ty, value)
        }
        IrInstr::Alloca { slot, ty } => {
            let name = func
                .get_local(*slot)
                .map(|l| l.name.as_str())
                .unwrap_or("?");
            format!("%local.{} = alloca {} ; {}", slot.as_u32(), ty, name)
        }
        IrInstr::Load { dest, slot } => {
            format!("{} = load {}, {}", dest.id, dest.ty, slot)
        }
        IrInstr::Store { slot, value } => {
            format!("store {}, {}", value, slot)
        }
        IrInstr::Call { dest, callee, args } => {
            let args_str: Vec<String> = args.iter().map(|a| a.to_string()).collect();
            let callee_str = match callee {
                Callee::Builtin { name, .. } => name.clone(),
                Callee::Function(id) => module
                    .and_then(|m| m.get_function(*id))
                    .map(|f| f.name.clone())
                    .unwrap_or_else(|| id.to_string()),
            };
            match dest {
                Some(d) => format!(
                    "{} = call {} @{}({})",
                    d.id,
                    d.ty,
                    callee_str,
                    args_str.join(", ")
                ),
                None => format!("call void @{}({})", callee_str, args_str.join(", ")),
            }
        }
        IrInstr::IsNonZero { dest, operand } => {
            format!("{} = icmp ne {}, 0", dest.id, operand)
        }
    }
}

fn format_external(ext: &ExternalDecl) -> String {
    let ret = match ext.returns.as_slice() {
        [] => "void".to_string(),
        [single] => single.to_string(),
        many => {
            let tys: Vec<String> = many.iter().map(|t| t.to_string()).collect();
            format!("{{{}}}", tys.join(", "))
        }
    };
    let params: Vec<String> = ext.params.iter().map(|p| p.to_string()).collect();
    let mut line = format!("declare {} @{}({})", ret, ext.name, params.join(", "));
    let flags = format_effects(&ext.effects);
    if !flags.is_empty() {
        write!(line, " ; {}", flags).unwrap();
    }
    line
}

fn format_effects(effects: &CallEffects) -> String {
    let mut flags = Vec::new();
    if effects.movable {
        flags.push("movable");
    }
    if effects.side_effect_free {
        flags.push("side_effect_free");
    } else if effects.side_effect_free_if_no_msize {
        flags.push("side_effect_free_if_no_msize");
    }
    if effects.invalidates_storage {
        flags.push("invalidates_storage");
    }
    if effects.invalidates_memory {
        flags.push("invalidates_memory");
    }
    flags.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::builder::FunctionBuilder;
    use crate::ir::types::IrType;
    use crate::ir::value::Slot;
    use num_bigint::BigUint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pretty_print_function() {
        let mut builder = FunctionBuilder::new(IrFunction::new("f", &[IrType::I256], IrType::I256, 1));
        let slot = builder.alloca("x", IrType::I256);
        let one = builder.const_int(IrType::I256, BigUint::from(1u32));
        builder.store(Slot::Local(slot), one);
        let loaded = builder.load(Slot::Local(slot), IrType::I256);
        builder.ret(Some(loaded));

        let text = builder.finish().pretty_print();
        let expected = "\
define i256 @f(i256 %0) {
bb0: ; entry
  %local.0 = alloca i256 ; x
  %1 = const i256 1
  store i256 %1, %local.0
  %2 = load i256, %local.0
  ret i256 %2
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_pretty_print_external() {
        let ext = ExternalDecl {
            name: "eth.storageStore".to_string(),
            params: vec![IrType::I32, IrType::I32],
            returns: vec![],
            effects: CallEffects {
                invalidates_storage: true,
                invalidates_memory: true,
                ..CallEffects::default()
            },
        };
        assert_eq!(
            format_external(&ext),
            "declare void @eth.storageStore(i32, i32) ; invalidates_storage invalidates_memory"
        );
    }
}
