//! ra-core - Core value types for relplan
//!
//! This crate provides the column type system, relation schemes, scalar
//! expressions, relation keys, symbol generation and planner configuration
//! shared by the logical-plan layer and the CLI.

pub mod config;
pub mod error;
pub mod expr;
pub mod relation;
pub mod scheme;
pub mod serde_helpers;
pub mod symbol;
pub mod types;

pub use config::PlannerConfig;
pub use error::{CoreError, CoreResult};
pub use expr::{AggregateFunc, AttributeRef, BinaryOp, Expression, Literal, UnaryOp};
pub use relation::RelationKey;
pub use scheme::{Column, Scheme};
pub use symbol::SymbolGenerator;
pub use types::{parse_column_type, ColumnType};
