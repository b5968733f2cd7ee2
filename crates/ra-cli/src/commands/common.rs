//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use ra_core::PlannerConfig;
use ra_plan::Program;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Read and parse a program; `.json` files are JSON, anything else YAML
pub(crate) fn load_program(path: &Path) -> Result<Program> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read program {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let program = if is_json {
        Program::from_json(&content)
    } else {
        Program::from_yaml(&content)
    };
    program.with_context(|| format!("Failed to parse program {}", path.display()))
}

/// Planner config from `--config`, else `ra.yml`/`ra.yaml` beside the program
pub(crate) fn load_config(program_path: &Path, global: &GlobalArgs) -> Result<PlannerConfig> {
    if let Some(path) = &global.config {
        return PlannerConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config {path}"));
    }
    let dir = program_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    PlannerConfig::load_from_dir(dir).context("Failed to load planner config")
}
