//! Column type system for relation schemes

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Type of a single relation column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Boolean (BOOL, BOOLEAN)
    Boolean,
    /// 32-bit integer (INT, INTEGER)
    Int,
    /// 64-bit integer (BIGINT, LONG)
    Long,
    /// 32-bit float (FLOAT, REAL)
    Float,
    /// 64-bit float (DOUBLE)
    Double,
    /// Character data (STRING, VARCHAR, TEXT)
    String,
}

impl ColumnType {
    /// Returns true if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Int | ColumnType::Long | ColumnType::Float | ColumnType::Double
        )
    }

    /// Returns true for the floating-point family
    pub fn is_floating(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Double)
    }

    /// Result type of an arithmetic operation over two numeric operands.
    ///
    /// Floating point wins over integers and the wider type wins within a
    /// family. Non-numeric operands yield `None`.
    pub fn widen(self, other: ColumnType) -> Option<ColumnType> {
        if !self.is_numeric() || !other.is_numeric() {
            return None;
        }
        let rank = |t: ColumnType| match t {
            ColumnType::Int => 0,
            ColumnType::Long => 1,
            ColumnType::Float => 2,
            _ => 3,
        };
        Some(if rank(self) >= rank(other) { self } else { other })
    }

    /// Human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Int => "INT",
            ColumnType::Long => "LONG",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::String => "STRING",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ColumnType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_column_type(s)
    }
}

/// Parse a column type name (case-insensitive, common aliases accepted)
pub fn parse_column_type(s: &str) -> CoreResult<ColumnType> {
    let upper = s.trim().to_uppercase();
    let parsed = match upper.as_str() {
        "BOOL" | "BOOLEAN" => ColumnType::Boolean,
        "INT" | "INTEGER" | "INT4" | "INT_TYPE" => ColumnType::Int,
        "LONG" | "BIGINT" | "INT8" | "LONG_TYPE" => ColumnType::Long,
        "FLOAT" | "REAL" | "FLOAT4" | "FLOAT_TYPE" => ColumnType::Float,
        "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" | "DOUBLE_TYPE" => ColumnType::Double,
        "STRING" | "VARCHAR" | "TEXT" | "CHAR" | "STRING_TYPE" => ColumnType::String,
        _ => {
            return Err(CoreError::UnknownType {
                name: s.to_string(),
            })
        }
    };
    Ok(parsed)
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
