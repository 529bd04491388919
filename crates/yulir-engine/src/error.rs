//! Lowering and configuration errors

use std::path::PathBuf;
use thiserror::Error;

pub type LowerResult<T> = Result<T, LowerError>;

/// Fatal lowering error. Any variant aborts the whole pass; no partial
/// module is handed out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LowerError {
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String },

    #[error("Function definition '{name}' is only allowed at the top level")]
    MisplacedDefinition { name: String },

    #[error("'{statement}' outside of a loop")]
    NotInLoop { statement: String },

    #[error("Argument {index} of builtin '{builtin}' must be a literal")]
    NonLiteralArgument { builtin: String, index: usize },

    #[error("Unresolved name: {name}")]
    UnresolvedName { name: String },

    #[error("Invalid literal: {value}")]
    InvalidLiteral { value: String },

    #[error("Expected {expected} value(s), found {found}")]
    ValueCountMismatch { expected: usize, found: usize },

    #[error("In function '{function}': {source}")]
    InFunction {
        function: String,
        #[source]
        source: Box<LowerError>,
    },
}

impl LowerError {
    /// Strip `InFunction` context wrappers
    pub fn root(&self) -> &LowerError {
        match self {
            LowerError::InFunction { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_function(self, function: &str) -> Self {
        LowerError::InFunction {
            function: function.to_string(),
            source: Box::new(self),
        }
    }
}

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid default type '{name}'")]
    InvalidDefaultType { name: String },

    #[error("Builtin '{name}': {message}")]
    InvalidBuiltin { name: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_strips_context() {
        let err = LowerError::UnresolvedName {
            name: "g".to_string(),
        }
        .in_function("f");
        assert_eq!(err.to_string(), "In function 'f': Unresolved name: g");
        assert_eq!(
            err.root(),
            &LowerError::UnresolvedName {
                name: "g".to_string()
            }
        );
    }
}
