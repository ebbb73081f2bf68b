//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Synth - resolve and inspect pipeline configurations
#[derive(Parser, Debug)]
#[command(name = "synth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the root document and its groups
    #[arg(long, global = true, env = "SYNTH_CONFIG_DIR", default_value = "conf")]
    pub config_dir: PathBuf,

    /// Name of the root document, without extension
    #[arg(long, global = true, env = "SYNTH_CONFIG_NAME", default_value = "config")]
    pub config_name: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved configuration
    ///
    /// Examples:
    ///   synth show
    ///   synth show synthesize.resize_factor=0.25 paths=cluster
    ///   synth show --json
    Show {
        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,

        /// Overrides such as `key.path=value`, `~key.path` or `group=variant`
        overrides: Vec<String>,
    },

    /// Print a single value
    Get {
        /// Dotted key path, e.g. `paths.run_dir`
        key: String,

        /// Expected type: str, int, float, bool or any
        #[arg(long = "type", default_value = "any")]
        value_type: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Overrides applied before reading the value
        overrides: Vec<String>,
    },

    /// List the tasks to run, in order
    Tasks {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Overrides applied before validating the task list
        overrides: Vec<String>,
    },

    /// List composition groups and their variants
    Groups {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
