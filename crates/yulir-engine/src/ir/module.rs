//! IR Module
//!
//! Top-level container for a lowered compilation unit.

use super::function::IrFunction;
use super::instr::{CallEffects, FunctionId};
use super::types::IrType;
use super::value::{GlobalId, GlobalSlot};
use rustc_hash::FxHashMap;

/// An IR module (compilation unit)
#[derive(Debug, Clone)]
pub struct IrModule {
    /// Module name
    pub name: String,
    /// Functions in this module
    pub functions: Vec<IrFunction>,
    /// Spill slots shared by all functions
    pub globals: Vec<GlobalSlot>,
    /// Imported builtins, in first-use order
    pub externals: Vec<ExternalDecl>,
    /// Function lookup by name
    function_map: FxHashMap<String, FunctionId>,
    /// External lookup by name
    external_map: FxHashMap<String, usize>,
}

impl IrModule {
    /// Create a new empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            globals: Vec::new(),
            externals: Vec::new(),
            function_map: FxHashMap::default(),
            external_map: FxHashMap::default(),
        }
    }

    /// Add a function to the module
    pub fn add_function(&mut self, func: IrFunction) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.function_map.insert(func.name.clone(), id);
        self.functions.push(func);
        id
    }

    /// Add a global slot and return its ID
    pub fn add_global(&mut self) -> GlobalId {
        let id = GlobalId::new(self.globals.len() as u32);
        self.globals.push(GlobalSlot { id });
        id
    }

    /// Record an external declaration; repeated imports of one name are
    /// ignored.
    pub fn import_external(&mut self, decl: ExternalDecl) -> bool {
        if self.external_map.contains_key(&decl.name) {
            return false;
        }
        self.external_map
            .insert(decl.name.clone(), self.externals.len());
        self.externals.push(decl);
        true
    }

    pub fn get_external(&self, name: &str) -> Option<&ExternalDecl> {
        self.external_map.get(name).map(|&idx| &self.externals[idx])
    }

    pub fn get_function(&self, id: FunctionId) -> Option<&IrFunction> {
        self.functions.get(id.0 as usize)
    }

    pub fn get_function_by_name(&self, name: &str) -> Option<&IrFunction> {
        self.function_map
            .get(name)
            .and_then(|&id| self.get_function(id))
    }

    pub fn get_function_id(&self, name: &str) -> Option<FunctionId> {
        self.function_map.get(name).copied()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    pub fn functions(&self) -> impl Iterator<Item = &IrFunction> {
        self.functions.iter()
    }

    /// Validate the entire module
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (i, func) in self.functions.iter().enumerate() {
            if let Err(e) = func.validate() {
                errors.push(format!("Function '{}' ({}): {}", func.name, i, e));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get total instruction count across all functions
    pub fn total_instruction_count(&self) -> usize {
        self.functions.iter().map(|f| f.instruction_count()).sum()
    }
}

/// An imported builtin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDecl {
    pub name: String,
    pub params: Vec<IrType>,
    pub returns: Vec<IrType>,
    pub effects: CallEffects,
}
