//! Control-flow graph optimizer
//!
//! Statements become CFG nodes carrying their operator, the variable they
//! define and the variables they read. Liveness drives dead-code
//! elimination and chaining; structuring then rebuilds the loop nesting as
//! an operator tree.

pub mod graph;
pub mod liveness;
mod optimize;
mod structure;

pub use graph::{Cfg, CfgNode, CfgNodeId};
pub use liveness::Liveness;
