//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Bind env vars against a schema and dispatch commands
#[derive(Parser, Debug)]
#[command(name = "envcmd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bind the environment against a TOML schema and print the result
    Check {
        /// Schema file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema: PathBuf,
        /// Env file layered under the process environment
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        env_file: Option<PathBuf>,
        /// Ignore any env file
        #[arg(long, conflicts_with = "env_file")]
        no_env_file: bool,
        /// Required fields must be set even if they have a default
        #[arg(long)]
        strict: bool,
    },

    /// Parse an env file and print export statements
    Dotenv {
        /// Env file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Run the bundled sample app through the dispatcher
    #[command(disable_help_flag = true, disable_version_flag = true)]
    Demo {
        /// Arguments for the sample app (try --help)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
