//! Show command: print the current version and its parts.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use vmark_core::git::GitRunner;
use vmark_core::{Orchestrator, VersionMutator, VersionSummary};

/// Arguments for the `show` subcommand.
#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Print only the version string
    #[arg(short, long)]
    pub short: bool,
}

/// Print the current version.
#[instrument(name = "cmd_show", skip_all, fields(json_output = global_json))]
pub fn cmd_show<R: GitRunner>(
    args: ShowArgs,
    global_json: bool,
    orchestrator: &Orchestrator<R>,
    mutator: &VersionMutator,
) -> anyhow::Result<()> {
    let summary = orchestrator.show(mutator);
    debug!(version = %summary.version, "executing show command");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if args.short {
        println!("{}", summary.version);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &VersionSummary) {
    println!(
        "{} {}",
        "Current version:".bold(),
        summary.version.green().bold()
    );
    println!();
    println!("  {}: {}", "Major".dimmed(), summary.major);
    println!("  {}: {}", "Minor".dimmed(), summary.minor);
    println!("  {}: {}", "Patch".dimmed(), summary.patch);
    println!(
        "  {}: {}",
        "Pre-release".dimmed(),
        summary.pre_release.as_deref().unwrap_or("-")
    );
    println!(
        "  {}: {}",
        "Build".dimmed(),
        summary.build.as_deref().unwrap_or("-")
    );
    if !summary.stable {
        println!();
        println!("{}", "This is a pre-release version.".yellow());
    }
    println!();
    println!("{}: {}", "File".dimmed(), summary.file.cyan());
}
