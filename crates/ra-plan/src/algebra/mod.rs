//! Relational algebra IR: operator trees, scheme inference and traversal

pub mod columns;
pub mod graph;
mod infer;
pub mod operator;
pub mod recursion;
mod rewrite;
pub mod traversal;

pub use columns::{GroupColumns, Mapping};
pub use graph::PlanGraph;
pub use operator::{OpKind, Operator};
pub use recursion::{RecursionSlot, StateHandle};
pub use traversal::{Postorder, Preorder};
