//! Error types for ra-plan

use ra_core::CoreError;
use thiserror::Error;

/// Plan error type
///
/// Codes use the `P` prefix; scheme and type failures from ra-core are
/// wrapped as [`PlanError::Schema`].
#[derive(Error, Debug)]
pub enum PlanError {
    /// P001: Scheme inference failed
    #[error("[P001] Schema error: {0}")]
    Schema(#[from] CoreError),

    /// P002: Recursion state read before its fixpoint has a body
    #[error("[P002] Recursion error: {message}")]
    Recursion { message: String },

    /// P003: Equijoin columns do not reference one column from each input
    #[error(
        "[P003] Equijoin columns ${col0} and ${col1} must reference one column from each input \
         (left has {left_len} of {total} columns)"
    )]
    EquijoinColumns {
        col0: usize,
        col1: usize,
        left_len: usize,
        total: usize,
    },

    /// P004: Operation not defined for this operator variant
    #[error("[P004] {operation} is not supported on {op}")]
    Unsupported { operation: &'static str, op: String },

    /// P005: Loop headers and terminators do not pair up
    #[error("[P005] Unbalanced loop structure: {message}")]
    UnbalancedLoops { message: String },

    /// P006: Reference to a node id not present in the CFG
    #[error("[P006] Unknown CFG node {id}")]
    UnknownCfgNode { id: usize },

    /// P007: Node claims to use a temp its operator never reads
    #[error("[P007] Node {node} lists '{var}' as a use but never scans it")]
    InconsistentUses { node: usize, var: String },

    /// P008: Statement program is malformed
    #[error("[P008] Invalid program: {message}")]
    Program { message: String },

    /// P009: Statement program could not be parsed
    #[error("[P009] Program parse error: {0}")]
    ProgramParse(String),
}

impl PlanError {
    /// Whether this error is a scheme inference failure
    pub fn is_schema_error(&self) -> bool {
        matches!(self, PlanError::Schema(_))
    }
}

impl From<serde_yaml::Error> for PlanError {
    fn from(err: serde_yaml::Error) -> Self {
        PlanError::ProgramParse(err.to_string())
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::ProgramParse(err.to_string())
    }
}

/// Result type alias for PlanError
pub type PlanResult<T> = Result<T, PlanError>;
