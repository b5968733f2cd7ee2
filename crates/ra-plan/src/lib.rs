//! ra-plan: logical plan layer for relplan
//!
//! This crate provides the relational algebra operator IR, a rule protocol
//! for tree rewrites, and a control-flow-graph optimizer that turns a
//! statement program into a single `Sequence`/`DoWhile` plan.

pub mod algebra;
pub mod cfg;
pub(crate) mod error;
pub mod explain;
pub mod program;
pub mod rules;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use algebra::{GroupColumns, Mapping, OpKind, Operator, PlanGraph};
pub use cfg::{Cfg, CfgNode, CfgNodeId, Liveness};
pub use error::{PlanError, PlanResult};
pub use explain::{explain_symbols, explain_tree};
pub use program::{Program, Statement};
pub use rules::{optimize_by_rules, Rule, RuleSet};
