//! Backend configuration (yulir.toml)
//!
//! ```toml
//! module_name = "contract"
//! default_type = "u256"
//! validate = true
//!
//! [[builtins]]
//! name = "datasize"
//! params = [""]
//! returns = [""]
//! movable = true
//! literal_arguments = true
//! ```

use crate::dialect::{BuiltinFunction, Dialect};
use crate::error::ConfigError;
use crate::lower::types::{TypeMapper, DEFAULT_TYPE};
use crate::lower::DEFAULT_MODULE_NAME;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional file name of the configuration
pub const CONFIG_FILE_NAME: &str = "yulir.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Name of the emitted IR module
    pub module_name: String,

    /// Type of untyped variables and literals
    pub default_type: String,

    /// Run structural validation on the lowered module
    pub validate: bool,

    /// Builtins added on top of the target dialect
    pub builtins: Vec<BuiltinSpec>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            default_type: DEFAULT_TYPE.to_string(),
            validate: true,
            builtins: Vec::new(),
        }
    }
}

/// A custom builtin declared in the configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuiltinSpec {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub returns: Vec<String>,
    #[serde(default)]
    pub movable: bool,
    #[serde(default)]
    pub literal_arguments: bool,
}

impl BuiltinSpec {
    fn to_builtin(&self) -> BuiltinFunction {
        let mut builtin = BuiltinFunction::generic(
            self.name.as_str(),
            self.params.len(),
            self.returns.len(),
            self.movable,
            self.literal_arguments,
        );
        builtin.parameters = self.params.clone();
        builtin.returns = self.returns.clone();
        builtin
    }
}

impl BackendConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate a configuration
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: BackendConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let types = TypeMapper::new();
        if self.default_type.is_empty() || !types.contains(&self.default_type) {
            return Err(ConfigError::InvalidDefaultType {
                name: self.default_type.clone(),
            });
        }

        for spec in &self.builtins {
            if spec.name.is_empty() {
                return Err(ConfigError::InvalidBuiltin {
                    name: spec.name.clone(),
                    message: "name cannot be empty".to_string(),
                });
            }
            if spec.returns.len() > 1 {
                return Err(ConfigError::InvalidBuiltin {
                    name: spec.name.clone(),
                    message: "builtins return at most one value".to_string(),
                });
            }
            if let Some(ty) = spec
                .params
                .iter()
                .chain(&spec.returns)
                .find(|ty| !types.contains(ty))
            {
                return Err(ConfigError::InvalidBuiltin {
                    name: spec.name.clone(),
                    message: format!("unknown type '{}'", ty),
                });
            }
        }
        Ok(())
    }

    /// Type mapper with the configured default type
    pub fn type_mapper(&self) -> Result<TypeMapper, ConfigError> {
        TypeMapper::with_default(&self.default_type).map_err(|_| ConfigError::InvalidDefaultType {
            name: self.default_type.clone(),
        })
    }

    /// The LLVM-IR dialect extended with the configured builtins. A custom
    /// builtin replaces a catalog entry of the same name.
    pub fn dialect(&self) -> Dialect {
        let mut builder = Dialect::llvm_ir_builder();
        for spec in &self.builtins {
            builder.add_builtin(spec.to_builtin());
        }
        builder.build()
    }
}
