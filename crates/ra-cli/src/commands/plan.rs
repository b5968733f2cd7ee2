//! Plan command implementation

use anyhow::{Context, Result};
use ra_core::PlannerConfig;
use ra_plan::{explain_symbols, explain_tree, Operator};
use std::path::Path;

use crate::cli::{GlobalArgs, PlanArgs, PlanOutput};
use crate::commands::common::{load_config, load_program};

/// Execute the plan command
pub(crate) fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let path = Path::new(&args.program);
    let program = load_program(path)?;
    let config = apply_overrides(load_config(path, global)?, args);
    log::debug!("Planner config: {config:?}");

    let mut plan = program
        .compile(&config)
        .with_context(|| format!("Failed to plan {}", path.display()))?;

    println!("{}", render(&mut plan, args.format, &config)?);
    Ok(())
}

fn apply_overrides(mut config: PlannerConfig, args: &PlanArgs) -> PlannerConfig {
    if args.no_dce {
        config.dead_code_elimination = false;
    }
    if args.no_chain {
        config.chaining = false;
    }
    config
}

pub(crate) fn render(
    plan: &mut Operator,
    format: PlanOutput,
    config: &PlannerConfig,
) -> Result<String> {
    Ok(match format {
        PlanOutput::Tree => explain_tree(plan).trim_end().to_string(),
        PlanOutput::Text => plan.to_string(),
        PlanOutput::Symbols => explain_symbols(plan, &mut config.symbol_generator()),
        PlanOutput::Dot => plan.collect_graph().to_dot(),
        PlanOutput::Json => serde_json::to_string_pretty(plan)?,
    })
}
