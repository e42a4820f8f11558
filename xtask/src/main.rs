//! Maintenance tasks for the vmark workspace.
//!
//! - `completions` writes shell completion scripts
//! - `man` writes man pages for `vmark` and each subcommand
//!
//! Run `cargo xtask --help` to see available commands.

#![deny(unsafe_code)]

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Name of the installed binary.
const BIN_NAME: &str = "vmark";

#[derive(Parser, Debug)]
#[command(name = "xtask")]
#[command(about = "Project maintenance tasks")]
struct Xtask {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Generate shell completions for the vmark CLI.
    Completions(commands::completions::CompletionsArgs),

    /// Generate man pages for the vmark CLI.
    Man(commands::man::ManArgs),
}

fn main() -> Result<(), String> {
    match Xtask::parse().command {
        Task::Completions(args) => commands::completions::cmd_completions(args),
        Task::Man(args) => commands::man::cmd_man(args),
    }
}

/// The workspace root; relative output directories resolve against it.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(&manifest_dir).to_path_buf()
}

/// Create `out_dir` under the workspace root and return its full path.
pub fn prepare_out_dir(out_dir: PathBuf) -> Result<PathBuf, String> {
    let out_dir = workspace_root().join(out_dir);
    std::fs::create_dir_all(&out_dir).map_err(|e| format!("{}: {e}", out_dir.display()))?;
    Ok(out_dir)
}
