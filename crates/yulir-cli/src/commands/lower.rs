//! `yulir lower`: lower a JSON syntax tree to IR.

use anyhow::{bail, Context};
use std::path::Path;
use yulir_engine::{ast, Backend, PrettyPrint};

pub fn execute(
    input: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    no_validate: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let program = ast::from_json(&source)
        .with_context(|| format!("{} is not a valid syntax tree", input.display()))?;

    let mut backend = Backend::new(config)?;
    let module = backend
        .lower(&program)
        .with_context(|| format!("failed to lower {}", input.display()))?;

    if backend.config().validate && !no_validate {
        if let Err(errors) = module.validate() {
            bail!("lowered module is malformed:\n  {}", errors.join("\n  "));
        }
    }

    let text = module.pretty_print();
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", text),
    }

    tracing::info!(
        functions = module.function_count(),
        instructions = module.total_instruction_count(),
        "lowered {}",
        input.display()
    );
    Ok(())
}
