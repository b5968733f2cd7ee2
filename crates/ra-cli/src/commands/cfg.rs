//! Cfg command implementation

use anyhow::{Context, Result};
use ra_plan::Cfg;
use std::path::Path;

use crate::cli::{CfgArgs, GlobalArgs};
use crate::commands::common::load_program;

/// Execute the cfg command
pub(crate) fn execute(args: &CfgArgs, _global: &GlobalArgs) -> Result<()> {
    let path = Path::new(&args.program);
    let cfg = load_program(path)?
        .to_cfg()
        .with_context(|| format!("Failed to build CFG for {}", path.display()))?;

    println!("{cfg}");
    if args.liveness {
        println!();
        println!("{}", liveness_table(&cfg));
    }
    Ok(())
}

fn liveness_table(cfg: &Cfg) -> String {
    let live = cfg.compute_liveness();
    let mut lines = vec![format!("{:<6} {:<30} {}", "NODE", "LIVE IN", "LIVE OUT")];
    lines.push("-".repeat(70));
    for id in cfg.node_ids() {
        let join = |set: &std::collections::BTreeSet<String>| {
            set.iter().cloned().collect::<Vec<_>>().join(",")
        };
        lines.push(format!(
            "{:<6} {:<30} {}",
            id,
            join(live.live_in(id)),
            join(live.live_out(id))
        ));
    }
    lines.join("\n")
}
