//! `yulir builtins`: list the dialect catalog.

use std::path::Path;
use yulir_engine::{Backend, BuiltinFunction};

pub fn execute(config: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let default_type = config.default_type.clone();
    let mut backend = Backend::new(config)?;
    let dialect = backend.dialect();

    println!("{} builtins ({:?} flavour)", dialect.len(), dialect.flavour());
    for builtin in dialect.iter() {
        println!("  {}", describe(builtin, &default_type));
    }
    Ok(())
}

fn describe(builtin: &BuiltinFunction, default_type: &str) -> String {
    let show = |names: &[String]| {
        names
            .iter()
            .map(|n| if n.is_empty() { default_type } else { n.as_str() })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut flags = Vec::new();
    if builtin.movable {
        flags.push("movable");
    }
    if builtin.side_effect_free {
        flags.push("side-effect-free");
    }
    if builtin.invalidates_storage {
        flags.push("invalidates-storage");
    }
    if builtin.invalidates_memory {
        flags.push("invalidates-memory");
    }
    if builtin.literal_arguments {
        flags.push("literal-arguments");
    }

    format!(
        "{}({}) -> ({}) [{}]",
        builtin.name,
        show(&builtin.parameters),
        show(&builtin.returns),
        flags.join(" ")
    )
}
