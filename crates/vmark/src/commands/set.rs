//! Set command: thin CLI layer over `Orchestrator::set`.

use anyhow::{Context, anyhow};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use vmark_core::git::GitRunner;
use vmark_core::{
    Orchestrator, OrchestratorError, SetRequest, SetSource, VersionError, VersionMutator,
};

const FORMAT_HINT: &str =
    "Please provide a valid semver string (e.g., 1.0.0, 2.1.0-alpha.1, 3.0.0+build.123)";

/// Arguments for the `set` subcommand.
#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// The version to set (e.g., 1.2.3, 2.0.0-alpha.1)
    #[arg(value_name = "VERSION", conflicts_with = "match_git_tags")]
    pub version: Option<String>,

    /// Use the latest git tag as the version (requires a git repository)
    #[arg(long)]
    pub match_git_tags: bool,

    /// Skip git commit and tag even if git integration is enabled
    #[arg(long)]
    pub no_git: bool,
}

impl SetArgs {
    fn source(&self) -> SetSource {
        if self.match_git_tags {
            SetSource::LatestTag
        } else {
            SetSource::Explicit(self.version.clone().unwrap_or_default())
        }
    }
}

/// Execute the set command.
#[instrument(name = "cmd_set", skip_all, fields(json_output = global_json))]
pub fn cmd_set<R: GitRunner>(
    args: SetArgs,
    global_json: bool,
    orchestrator: &Orchestrator<R>,
    mutator: &mut VersionMutator,
) -> anyhow::Result<()> {
    let request = SetRequest {
        source: args.source(),
        skip_git: args.no_git,
    };
    debug!(source = ?request.source, no_git = args.no_git, "executing set command");

    let outcome = orchestrator
        .set(mutator, &request)
        .map_err(explain)
        .context("set failed")?;

    if let (Some(tag), false) = (&outcome.from_tag, global_json) {
        println!("{} {}", "Using latest git tag:".cyan(), tag);
    }
    super::report_change("set", "Version set", &outcome, global_json)
}

fn explain(err: OrchestratorError) -> anyhow::Error {
    match err {
        OrchestratorError::EmptyVersion => anyhow!("A version string is required."),
        OrchestratorError::Version(VersionError::InvalidFormat { input, .. }) => {
            anyhow!("Invalid version format: {input}\n{FORMAT_HINT}")
        }
        OrchestratorError::NoTags => anyhow!("No git tags found."),
        other => anyhow::Error::new(other),
    }
}
