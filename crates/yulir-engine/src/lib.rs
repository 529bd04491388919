//! Yulir Engine - Yul to basic-block IR lowering
//!
//! Takes a validated Yul syntax tree (a block of function definitions) and
//! lowers it into an [`ir::IrModule`]: typed instructions in basic blocks
//! joined by explicit control-flow edges.
//!
//! # Modules
//!
//! - `ast` - Input syntax tree
//! - `dialect` - Builtin catalog with effect flags
//! - `lower` - The lowering pass
//! - `ir` - Output representation
//! - `config` - `yulir.toml` settings

pub mod ast;
pub mod config;
pub mod dialect;
pub mod error;
pub mod ir;
pub mod lower;

pub use config::{BackendConfig, BuiltinSpec};
pub use dialect::{AsmFlavour, BuiltinFunction, Dialect, DialectBuilder, DialectProvider};
pub use error::{ConfigError, LowerError, LowerResult};
pub use ir::{IrModule, PrettyPrint};
pub use lower::{lower_program, Lowerer, TypeMapper};

use std::sync::Arc;

/// Configured lowering backend
///
/// Owns the dialect for its configuration. The dialect is built on first
/// use and rebuilt after [`Backend::reset_dialect`].
#[derive(Debug)]
pub struct Backend {
    config: BackendConfig,
    types: TypeMapper,
    dialects: DialectProvider,
}

impl Backend {
    pub fn new(config: BackendConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let types = config.type_mapper()?;
        let dialect_config = config.clone();
        Ok(Self {
            config,
            types,
            dialects: DialectProvider::new(move || dialect_config.dialect()),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn dialect(&mut self) -> Arc<Dialect> {
        self.dialects.get()
    }

    /// Drop the cached dialect; the next lowering rebuilds it
    pub fn reset_dialect(&mut self) {
        self.dialects.reset();
    }

    /// Lower one compilation unit
    pub fn lower(&mut self, ast: &ast::Block) -> LowerResult<IrModule> {
        let dialect = self.dialects.get();
        Lowerer::new(&dialect, self.types.clone(), self.config.module_name.as_str()).run(ast)
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            config: BackendConfig::default(),
            types: TypeMapper::new(),
            dialects: DialectProvider::llvm_ir(),
        }
    }
}
