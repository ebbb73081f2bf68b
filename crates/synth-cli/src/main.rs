//! Synthesis pipeline configuration CLI
//!
//! Resolves a configuration directory the way pipeline stages see it and
//! prints the result.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::ConfigContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!("Verbose mode enabled");

    let context = ConfigContext::new(cli.config_dir, cli.config_name);
    execute_command(&context, cli.command)
}

fn execute_command(context: &ConfigContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Show { json, overrides } => commands::run_show(context, &overrides, json),
        Commands::Get {
            key,
            value_type,
            json,
            overrides,
        } => commands::run_get(context, &key, &value_type, &overrides, json),
        Commands::Tasks { json, overrides } => commands::run_tasks(context, &overrides, json),
        Commands::Groups { json } => commands::run_groups(context, json),
    }
}
