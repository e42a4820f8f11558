//! Command implementations

pub mod bump;

pub mod set;

pub mod show;

use owo_colors::OwoColorize;
use serde::Serialize;
use vmark_core::{ChangeOutcome, VcsOutcome};

/// Print what happened in git after a change.
///
/// Warnings go to stderr.
pub fn print_vcs(outcome: &VcsOutcome, version: &str) {
    if matches!(
        outcome,
        VcsOutcome::Committed | VcsOutcome::Tagged { .. } | VcsOutcome::TagFailed { .. }
    ) {
        println!("{} {version}", "Committed:".green());
    }
    if let VcsOutcome::Tagged { tag } = outcome {
        println!("{} {}", "Tagged:".green(), tag.cyan());
    }
    if let Some(warning) = vcs_warning(outcome) {
        eprintln!("{}", warning.yellow());
    }
}

fn vcs_warning(outcome: &VcsOutcome) -> Option<String> {
    match outcome {
        VcsOutcome::Unavailable => Some(
            "Git is not available or not in a git repository. Skipping git integration."
                .to_string(),
        ),
        VcsOutcome::CommitFailed => Some("Failed to create git commit.".to_string()),
        VcsOutcome::TagFailed { tag } => Some(format!("Failed to create git tag {tag}.")),
        VcsOutcome::Disabled | VcsOutcome::Committed | VcsOutcome::Tagged { .. } => None,
    }
}

/// JSON document emitted by `bump` and `set` under `--json`.
#[derive(Serialize)]
pub struct ChangeReport<'a> {
    /// Which command ran.
    pub command: &'static str,
    /// The orchestrator's result.
    #[serde(flatten)]
    pub outcome: &'a ChangeOutcome,
}

/// Emit a change as JSON, or as `"{label}: old → new"` plus git lines.
pub fn report_change(
    command: &'static str,
    label: &str,
    outcome: &ChangeOutcome,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let report = ChangeReport { command, outcome };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} → {}",
        format!("{label}:").green().bold(),
        outcome.previous,
        outcome.current.to_string().green()
    );
    print_vcs(&outcome.vcs, &outcome.current.format());
    Ok(())
}
