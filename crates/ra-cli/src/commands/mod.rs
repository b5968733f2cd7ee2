//! CLI command implementations

pub(crate) mod cfg;
pub(crate) mod common;
pub(crate) mod plan;
