//! relplan CLI - compile statement programs into logical plans

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{cfg, plan};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Plan(args) => plan::execute(args, &cli.global),
        cli::Commands::Cfg(args) => cfg::execute(args, &cli.global),
    }
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, default `warn`
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
