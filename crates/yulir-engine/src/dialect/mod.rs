//! Builtin dialect
//!
//! A dialect is the closed catalog of builtin operations available to one
//! compilation target. Call sites are resolved against it before the module's
//! own functions; a miss means "user-defined function".
//!
//! Dialects are assembled through [`DialectBuilder`] and are immutable once
//! built. [`DialectProvider`] caches one instance and rebuilds it on demand
//! after [`DialectProvider::reset`].

use crate::ast::TypeName;
use crate::ir::CallEffects;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Descriptor of one builtin operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinFunction {
    /// Qualified name, e.g. `eth.storageStore`
    pub name: String,
    /// Parameter type names; empty names take the default type
    pub parameters: Vec<TypeName>,
    pub returns: Vec<TypeName>,
    /// May be reordered or removed when its result is unused
    pub movable: bool,
    pub side_effect_free: bool,
    pub side_effect_free_if_no_msize: bool,
    pub is_msize: bool,
    pub invalidates_storage: bool,
    pub invalidates_memory: bool,
    /// Every argument must be a compile-time literal
    pub literal_arguments: bool,
}

impl BuiltinFunction {
    /// Generic builtin with untyped parameters. Movability implies purity;
    /// anything else is assumed to clobber storage and memory.
    pub fn generic(
        name: impl Into<String>,
        params: usize,
        returns: usize,
        movable: bool,
        literal_arguments: bool,
    ) -> Self {
        Self {
            name: name.into(),
            parameters: vec![TypeName::new(); params],
            returns: vec![TypeName::new(); returns],
            movable,
            side_effect_free: movable,
            side_effect_free_if_no_msize: movable,
            is_msize: false,
            invalidates_storage: !movable,
            invalidates_memory: !movable,
            literal_arguments,
        }
    }

    /// Host-environment import from the `eth` namespace
    fn eth_external(name: &str, parameters: &[&str], returns: &[&str]) -> Self {
        Self {
            name: format!("eth.{}", name),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            returns: returns.iter().map(|r| r.to_string()).collect(),
            movable: false,
            side_effect_free: false,
            side_effect_free_if_no_msize: false,
            is_msize: false,
            invalidates_storage: name == "storageStore",
            invalidates_memory: true,
            literal_arguments: false,
        }
    }

    /// Effect flags as attached to emitted calls
    pub fn effects(&self) -> CallEffects {
        CallEffects {
            movable: self.movable,
            side_effect_free: self.side_effect_free,
            side_effect_free_if_no_msize: self.side_effect_free_if_no_msize,
            invalidates_storage: self.invalidates_storage,
            invalidates_memory: self.invalidates_memory,
        }
    }
}

/// Which flavour of the source language a dialect accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsmFlavour {
    /// Untyped, with raw instructions
    Loose,
    /// Raw instructions only
    Instructional,
    /// Typed, structured subset
    Strict,
}

/// Immutable builtin catalog
#[derive(Debug, Clone)]
pub struct Dialect {
    flavour: AsmFlavour,
    functions: Vec<BuiltinFunction>,
    index: FxHashMap<String, usize>,
}

// i32 is used for pointers as well as lengths.
const I32: &str = "i32";
const I64: &str = "i64";

/// `(name, parameters, returns)` of the ethereum host interface
const ETH_EXTERNALS: &[(&str, &[&str], &[&str])] = &[
    ("getAddress", &[I32], &[]),
    ("getExternalBalance", &[I32, I32], &[]),
    ("getBlockHash", &[I64, I32], &[I32]),
    ("call", &[I64, I32, I32, I32, I32], &[I32]),
    ("callDataCopy", &[I32, I32, I32], &[]),
    ("getCallDataSize", &[], &[I32]),
    ("callCode", &[I64, I32, I32, I32, I32], &[I32]),
    ("callDelegate", &[I64, I32, I32, I32], &[I32]),
    ("callStatic", &[I64, I32, I32, I32], &[I32]),
    ("storageStore", &[I32, I32], &[]),
    ("storageLoad", &[I32, I32], &[]),
    ("getCaller", &[I32], &[]),
    ("getCallValue", &[I32], &[]),
    ("codeCopy", &[I32, I32, I32], &[]),
    ("getCodeSize", &[I32], &[]),
    ("getBlockCoinbase", &[I32], &[]),
    ("create", &[I32, I32, I32, I32], &[I32]),
    ("getBlockDifficulty", &[I32], &[]),
    ("externalCodeCopy", &[I32, I32, I32, I32], &[]),
    ("getExternalCodeSize", &[I32], &[I32]),
    ("getGasLeft", &[], &[I64]),
    ("getBlockGasLimit", &[], &[I64]),
    ("getTxGasPrice", &[I32], &[]),
    ("log", &[I32, I32, I32, I32, I32, I32, I32], &[]),
    ("getBlockNumber", &[], &[I64]),
    ("getTxOrigin", &[I32], &[]),
    ("finish", &[I32, I32], &[]),
    ("revert", &[I32, I32], &[]),
    ("getReturnDataSize", &[], &[I32]),
    ("returnDataCopy", &[I32, I32, I32], &[]),
    ("selfDestruct", &[I32], &[]),
    ("getBlockTimestamp", &[], &[I64]),
];

impl Dialect {
    /// The LLVM-IR target dialect: strict flavour plus the `eth.` host
    /// interface
    pub fn llvm_ir() -> Self {
        Self::llvm_ir_builder().build()
    }

    /// Builder pre-populated with the LLVM-IR catalog, for callers that add
    /// their own builtins on top
    pub fn llvm_ir_builder() -> DialectBuilder {
        let mut builder = DialectBuilder::new(AsmFlavour::Strict);
        for (name, params, returns) in ETH_EXTERNALS {
            builder.add_builtin(BuiltinFunction::eth_external(name, params, returns));
        }
        builder
    }

    /// Look up a builtin by name; `None` means the name is not a builtin
    pub fn lookup(&self, name: &str) -> Option<&BuiltinFunction> {
        self.index.get(name).map(|&idx| &self.functions[idx])
    }

    pub fn flavour(&self) -> AsmFlavour {
        self.flavour
    }

    /// Builtins in registration order
    pub fn iter(&self) -> impl Iterator<Item = &BuiltinFunction> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Mutable staging area for a [`Dialect`]
#[derive(Debug)]
pub struct DialectBuilder {
    flavour: AsmFlavour,
    functions: Vec<BuiltinFunction>,
    index: FxHashMap<String, usize>,
}

impl DialectBuilder {
    pub fn new(flavour: AsmFlavour) -> Self {
        Self {
            flavour,
            functions: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Register a builtin; a later registration under the same name
    /// replaces the earlier one in place.
    pub fn add_builtin(&mut self, builtin: BuiltinFunction) -> &mut Self {
        match self.index.get(&builtin.name) {
            Some(&idx) => self.functions[idx] = builtin,
            None => {
                self.index.insert(builtin.name.clone(), self.functions.len());
                self.functions.push(builtin);
            }
        }
        self
    }

    pub fn add_function(
        &mut self,
        name: impl Into<String>,
        params: usize,
        returns: usize,
        movable: bool,
        literal_arguments: bool,
    ) -> &mut Self {
        self.add_builtin(BuiltinFunction::generic(
            name,
            params,
            returns,
            movable,
            literal_arguments,
        ))
    }

    pub fn build(self) -> Dialect {
        Dialect {
            flavour: self.flavour,
            functions: self.functions,
            index: self.index,
        }
    }
}

/// Lazily built, shareable dialect with an explicit invalidation hook
pub struct DialectProvider {
    constructor: Box<dyn Fn() -> Dialect + Send + Sync>,
    cached: Option<Arc<Dialect>>,
}

impl DialectProvider {
    pub fn new(constructor: impl Fn() -> Dialect + Send + Sync + 'static) -> Self {
        Self {
            constructor: Box::new(constructor),
            cached: None,
        }
    }

    /// Provider for [`Dialect::llvm_ir`]
    pub fn llvm_ir() -> Self {
        Self::new(Dialect::llvm_ir)
    }

    /// Return the cached dialect, building it on first use
    pub fn get(&mut self) -> Arc<Dialect> {
        if let Some(dialect) = &self.cached {
            return Arc::clone(dialect);
        }
        tracing::debug!("building dialect");
        let dialect = Arc::new((self.constructor)());
        self.cached = Some(Arc::clone(&dialect));
        dialect
    }

    /// Drop the cached instance; the next `get` rebuilds it
    pub fn reset(&mut self) {
        self.cached = None;
    }

    pub fn is_built(&self) -> bool {
        self.cached.is_some()
    }
}

impl std::fmt::Debug for DialectProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectProvider")
            .field("built", &self.is_built())
            .finish()
    }
}
