//! Library interface for the `vmark` CLI.
//!
//! The argument parser and command implementations live here so that
//! `xtask` can generate man pages and completions from [`command()`]. The
//! entry point is in `main.rs`.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Set the global color mode. Call once at startup.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
CONFIGURATION:
    .vmark.toml / vmark.toml (also .yaml, .yml, .json) in the project,
    user config under the platform config directory.

    file = \"version.json\"
    prohibited = false
    [git]
    enabled = true
    commit_message = \"Bump version to {version}\"
    tag_format = \"v{version}\"

ENVIRONMENT VARIABLES:
    RUST_LOG                Log filter (e.g., debug, vmark_core=trace)
    VMARK_LOG_PATH          Explicit log file path
    VMARK_LOG_DIR           Log directory
";

/// Command-line interface definition for vmark.
#[derive(Parser)]
#[command(name = "vmark")]
#[command(
    about = "Keep a project's semantic version in version.json, with optional git commit and tag",
    long_about = None
)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the current version and its parts
    Show(commands::show::ShowArgs),

    /// Increment the version, then commit and tag
    Bump(commands::bump::BumpArgs),

    /// Replace the version, then commit and tag
    Set(commands::set::SetArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
