//! Bump command: thin CLI layer over `Orchestrator::bump`.

use std::fmt;

use anyhow::{Context, bail};
use clap::Args;
use inquire::Select;
use tracing::{debug, instrument};

use vmark_core::git::GitRunner;
use vmark_core::{BumpKind, BumpRequest, Orchestrator, VersionMutator};

/// Arguments for the `bump` subcommand.
#[derive(Args, Debug, Default)]
pub struct BumpArgs {
    /// What to bump; prompts when omitted
    #[arg(value_enum, ignore_case = true, value_name = "TYPE")]
    pub kind: Option<BumpKind>,

    /// Attach build metadata (e.g., --build 123 gives 1.0.0+123)
    #[arg(long, value_name = "META")]
    pub build: Option<String>,

    /// Skip git commit and tag even if git integration is enabled
    #[arg(long)]
    pub no_git: bool,
}

/// Execute the bump command.
#[instrument(name = "cmd_bump", skip_all, fields(json_output = global_json))]
pub fn cmd_bump<R: GitRunner>(
    args: BumpArgs,
    global_json: bool,
    orchestrator: &Orchestrator<R>,
    mutator: &mut VersionMutator,
) -> anyhow::Result<()> {
    let kind = match args.kind {
        Some(kind) => kind,
        None if global_json => bail!("a bump TYPE is required with --json"),
        None => prompt_bump_kind(mutator).context("bump type selection failed")?,
    };
    debug!(%kind, build = ?args.build, no_git = args.no_git, "executing bump command");

    let request = BumpRequest {
        kind,
        build: args.build,
        skip_git: args.no_git,
    };
    let outcome = orchestrator
        .bump(mutator, &request)
        .context("bump failed")?;

    super::report_change("bump", "Version bumped", &outcome, global_json)
}

struct Choice {
    kind: BumpKind,
    preview: Option<String>,
}

impl Choice {
    fn new(kind: BumpKind, current: &VersionMutator) -> Self {
        let mut next = current.clone();
        let preview = kind
            .apply(&mut next)
            .ok()
            .map(|_| next.current().format());
        Self { kind, preview }
    }

    const fn label(&self) -> &'static str {
        match self.kind {
            BumpKind::Major => "Major (breaking changes)",
            BumpKind::Minor => "Minor (new features)",
            BumpKind::Patch => "Patch (bug fixes)",
            BumpKind::Alpha => "Alpha (pre-release)",
            BumpKind::Beta => "Beta (pre-release)",
            BumpKind::Rc => "Release Candidate (pre-release)",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.preview {
            Some(next) => write!(f, "{} → {next}", self.label()),
            None => write!(f, "{} (not possible from here)", self.label()),
        }
    }
}

fn prompt_bump_kind(current: &VersionMutator) -> anyhow::Result<BumpKind> {
    let choices: Vec<Choice> = BumpKind::ALL
        .into_iter()
        .map(|kind| Choice::new(kind, current))
        .collect();
    let start = BumpKind::ALL
        .iter()
        .position(|kind| *kind == BumpKind::default())
        .unwrap_or(0);

    let prompt = format!("What type of version bump? (current {})", current.current());
    let choice = Select::new(&prompt, choices)
        .with_starting_cursor(start)
        .prompt()
        .context("no bump type given and the prompt could not be shown; pass TYPE explicitly")?;
    Ok(choice.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;
    use vmark_core::{Git, GitConfig, OrchestratorOptions, SemVer, VersionStore};

    fn setup(version: &str) -> (TempDir, Orchestrator, VersionMutator) {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let store = VersionStore::new(dir.join("version.json"));
        let version = SemVer::parse(version).unwrap();
        store.save(&version).unwrap();
        let options = OrchestratorOptions {
            git_enabled: false,
            prohibited: false,
        };
        let orchestrator = Orchestrator::new(store, Git::system(dir, &GitConfig::default()), options);
        (tmp, orchestrator, VersionMutator::new(version))
    }

    #[test]
    fn test_cmd_bump_with_kind() {
        let (_tmp, orchestrator, mut mutator) = setup("1.2.3");
        let args = BumpArgs {
            kind: Some(BumpKind::Minor),
            build: Some("7".into()),
            no_git: true,
        };

        cmd_bump(args, false, &orchestrator, &mut mutator).unwrap();

        assert_eq!(mutator.current().format(), "1.3.0+7");
        assert_eq!(orchestrator.store().load().unwrap().format(), "1.3.0+7");
    }

    #[test]
    fn test_cmd_bump_json_requires_kind() {
        let (_tmp, orchestrator, mut mutator) = setup("1.2.3");

        let err = cmd_bump(BumpArgs::default(), true, &orchestrator, &mut mutator).unwrap_err();

        assert!(err.to_string().contains("TYPE is required"));
        assert_eq!(mutator.current().format(), "1.2.3");
    }

    #[test]
    fn choices_preview_the_result() {
        let current = VersionMutator::new(SemVer::parse("1.0.0-alpha.2").unwrap());

        assert_eq!(
            Choice::new(BumpKind::Alpha, &current).to_string(),
            "Alpha (pre-release) → 1.0.0-alpha.3"
        );
        assert_eq!(
            Choice::new(BumpKind::Patch, &current).to_string(),
            "Patch (bug fixes) → 1.0.1"
        );
    }

    #[test]
    fn choices_flag_impossible_bumps() {
        let current = VersionMutator::new(SemVer::parse("1.0.0-rc.final").unwrap());

        let choice = Choice::new(BumpKind::Rc, &current);

        assert!(choice.preview.is_none());
        assert!(choice.to_string().ends_with("(not possible from here)"));
    }
}
