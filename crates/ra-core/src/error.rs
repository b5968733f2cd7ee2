//! Error types for ra-core

use thiserror::Error;

/// Core error type for relplan
///
/// Schema errors use the `S` prefix, type errors `T`, config errors `C`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// S001: Named column not present in the scheme
    #[error("[S001] Unknown column '{name}' in scheme {scheme}")]
    UnknownColumn { name: String, scheme: String },

    /// S002: Named column bound to more than one position
    #[error("[S002] Ambiguous column '{name}': bound at positions {first} and {second}")]
    AmbiguousColumn {
        name: String,
        first: usize,
        second: usize,
    },

    /// S003: Positional reference past the end of the scheme
    #[error("[S003] Column position ${position} out of range for scheme of {len} columns")]
    ColumnOutOfRange { position: usize, len: usize },

    /// S004: Operator given an inconsistent column list
    #[error("[S004] Invalid column list: {message}")]
    InvalidColumnList { message: String },

    /// T001: Column type name could not be parsed
    #[error("[T001] Unknown column type '{name}'")]
    UnknownType { name: String },

    /// T002: Expression applied to operands of the wrong type
    #[error("[T002] Type mismatch in '{expr}': {message}")]
    TypeMismatch { expr: String, message: String },

    /// R001: Relation key is not `relation` or `user:program:relation`
    #[error("[R001] Invalid relation key '{key}': expected 'relation' or 'user:program:relation'")]
    InvalidRelationKey { key: String },

    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: YAML parse error
    #[error("[C002] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: IO error with the offending path attached
    #[error("[C004] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Whether this error belongs to the schema family (S001-S004)
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownColumn { .. }
                | CoreError::AmbiguousColumn { .. }
                | CoreError::ColumnOutOfRange { .. }
                | CoreError::InvalidColumnList { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
