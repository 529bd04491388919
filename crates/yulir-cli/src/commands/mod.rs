//! Subcommand implementations

pub mod builtins;
pub mod lower;

use anyhow::Context;
use std::path::Path;
use yulir_engine::config::CONFIG_FILE_NAME;
use yulir_engine::BackendConfig;

/// Load the explicit config, else `./yulir.toml` if it exists, else defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<BackendConfig> {
    if let Some(path) = path {
        return BackendConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    let local = Path::new(CONFIG_FILE_NAME);
    if local.is_file() {
        tracing::debug!("using {}", CONFIG_FILE_NAME);
        return BackendConfig::from_file(local)
            .with_context(|| format!("failed to load config {}", local.display()));
    }
    Ok(BackendConfig::default())
}
