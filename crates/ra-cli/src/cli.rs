//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// relplan - compile statement programs into relational-algebra plans
#[derive(Parser, Debug)]
#[command(name = "ra")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Planner config file (default: ra.yml / ra.yaml next to the program)
    #[arg(short, long, global = true, env = "RA_CONFIG")]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a program into a single logical plan
    Plan(PlanArgs),

    /// Show the control-flow graph of a program
    Cfg(CfgArgs),
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Program file (.yml, .yaml or .json)
    pub program: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tree")]
    pub format: PlanOutput,

    /// Skip dead-code elimination
    #[arg(long)]
    pub no_dce: bool,

    /// Skip chaining of single-use statements
    #[arg(long)]
    pub no_chain: bool,
}

/// Plan output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutput {
    /// Indented operator tree
    Tree,
    /// Single-line nested rendering
    Text,
    /// One symbol assignment per operator
    Symbols,
    /// Graphviz DOT
    Dot,
    /// JSON operator tree
    Json,
}

/// Arguments for the cfg command
#[derive(Args, Debug)]
pub struct CfgArgs {
    /// Program file (.yml, .yaml or .json)
    pub program: String,

    /// Also print live-in / live-out sets per node
    #[arg(short, long)]
    pub liveness: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
