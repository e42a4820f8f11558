//! Git integration for version changes.
//!
//! Shells out to `git` for all operations. This ensures we inherit the user's
//! identity, GPG signing, hooks, and other configuration. Every operation here
//! is fail-soft: problems are logged and reported as `false` or an empty list,
//! and callers decide whether that deserves a warning.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::GitConfig;
use crate::version::SemVer;

/// Placeholder substituted with the formatted version in templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "commit").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Executes one git invocation and returns its stdout.
pub trait GitRunner {
    /// Run `git <args>`.
    ///
    /// # Errors
    ///
    /// Returns a [`GitError`] when git cannot be spawned or exits non-zero.
    fn run(&self, args: &[&str]) -> GitResult<String>;

    /// Whether a git executable can be found at all.
    fn is_installed(&self) -> bool {
        true
    }
}

/// Runs the `git` executable found on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: Utf8PathBuf,
}

impl SystemGit {
    /// Run git commands from `workdir`.
    pub fn new(workdir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Directory git is run from.
    pub fn workdir(&self) -> &Utf8Path {
        &self.workdir
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str]) -> GitResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            if stderr.contains("not a git repository") {
                return Err(GitError::NotARepo);
            }

            Err(GitError::Command {
                command: args.first().unwrap_or(&"").to_string(),
                stderr,
            })
        }
    }

    fn is_installed(&self) -> bool {
        which::which("git").is_ok()
    }
}

/// A tag-name pattern such as `v{version}` or `release-{version}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTemplate {
    format: String,
}

impl TagTemplate {
    /// Wrap a template string.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// The tag name for `version`.
    pub fn render(&self, version: &str) -> String {
        render_template(&self.format, version)
    }

    /// Text before the placeholder, empty when there is none.
    pub fn prefix(&self) -> &str {
        self.format
            .split_once(VERSION_PLACEHOLDER)
            .map_or("", |(prefix, _)| prefix)
    }

    /// Text after the placeholder, empty when there is none.
    pub fn suffix(&self) -> &str {
        self.format
            .split_once(VERSION_PLACEHOLDER)
            .map_or("", |(_, suffix)| suffix)
    }

    /// The version part of `tag`, with prefix and suffix removed where present.
    pub fn extract<'a>(&self, tag: &'a str) -> &'a str {
        let rest = tag.strip_prefix(self.prefix()).unwrap_or(tag);
        rest.strip_suffix(self.suffix()).unwrap_or(rest)
    }
}

impl Default for TagTemplate {
    fn default() -> Self {
        Self::new("v{version}")
    }
}

/// Substitute every `{version}` in `template`.
pub fn render_template(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

/// Git operations for the version file.
#[derive(Debug, Clone)]
pub struct Git<R = SystemGit> {
    runner: R,
    commit_message: String,
    tag_template: TagTemplate,
}

impl Git<SystemGit> {
    /// Git run from `workdir`, configured from `config`.
    pub fn system(workdir: impl Into<Utf8PathBuf>, config: &GitConfig) -> Self {
        Self::with_runner(SystemGit::new(workdir), config)
    }
}

impl<R: GitRunner> Git<R> {
    /// Git driven by `runner`, configured from `config`.
    pub fn with_runner(runner: R, config: &GitConfig) -> Self {
        Self {
            runner,
            commit_message: config.commit_message.clone(),
            tag_template: TagTemplate::new(config.tag_format.clone()),
        }
    }

    /// The underlying runner.
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// The configured tag template.
    pub const fn tag_template(&self) -> &TagTemplate {
        &self.tag_template
    }

    /// Whether we are inside a git working tree.
    ///
    /// Anything other than git answering exactly `true` counts as unavailable.
    #[instrument(skip(self))]
    pub fn is_available(&self) -> bool {
        if !self.runner.is_installed() {
            debug!("git executable not found");
            return false;
        }
        match self.runner.run(&["rev-parse", "--is-inside-work-tree"]) {
            Ok(output) => {
                let inside = output.trim() == "true";
                debug!(inside, "repository check");
                inside
            }
            Err(err) => {
                debug!(error = %err, "repository check failed");
                false
            }
        }
    }

    /// Stage `file` and commit it with the configured message.
    ///
    /// Only the commit result is reported; a failed `git add` shows up as a
    /// failed (or empty) commit.
    #[instrument(skip(self, file), fields(%file))]
    pub fn commit(&self, version: &str, file: &Utf8Path) -> bool {
        if let Err(err) = self.runner.run(&["add", file.as_str()]) {
            debug!(error = %err, "git add failed");
        }

        let message = self.commit_message(version);
        match self.runner.run(&["commit", "-m", &message]) {
            Ok(_) => {
                debug!(%message, "committed");
                true
            }
            Err(err) => {
                warn!(error = %err, "git commit failed");
                false
            }
        }
    }

    /// The commit message `version` would get.
    pub fn commit_message(&self, version: &str) -> String {
        render_template(&self.commit_message, version)
    }

    /// The tag name `version` would get.
    pub fn tag_name(&self, version: &str) -> String {
        self.tag_template.render(version)
    }

    /// Create a lightweight tag for `version`.
    #[instrument(skip(self))]
    pub fn tag(&self, version: &str) -> bool {
        let name = self.tag_name(version);
        match self.runner.run(&["tag", &name]) {
            Ok(_) => {
                debug!(%name, "tagged");
                true
            }
            Err(err) => {
                warn!(error = %err, %name, "git tag failed");
                false
            }
        }
    }

    /// Every tag that parses as a version under the template, ascending.
    ///
    /// Tags that do not parse are skipped. A failed listing yields an empty
    /// list.
    #[instrument(skip(self))]
    pub fn list_version_tags(&self) -> Vec<SemVer> {
        let output = match self.runner.run(&["tag", "-l"]) {
            Ok(output) => output,
            Err(err) => {
                debug!(error = %err, "git tag -l failed");
                return Vec::new();
            }
        };

        let mut versions: Vec<SemVer> = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|tag| SemVer::parse(self.tag_template.extract(tag)).ok())
            .collect();
        versions.sort();

        debug!(count = versions.len(), "version tags");
        versions
    }

    /// The highest version tag, if any.
    pub fn latest_version_tag(&self) -> Option<SemVer> {
        self.list_version_tags().pop()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::{GitError, GitResult, GitRunner};

    type Handler = Box<dyn Fn(&[&str]) -> Result<String, String>>;

    /// Scripted runner that records every invocation.
    pub(crate) struct FakeGit {
        handler: Handler,
        installed: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeGit {
        pub(crate) fn new(handler: impl Fn(&[&str]) -> Result<String, String> + 'static) -> Self {
            Self {
                handler: Box::new(handler),
                installed: true,
                calls: RefCell::new(Vec::new()),
            }
        }

        /// A repository where every command succeeds with empty output.
        pub(crate) fn healthy() -> Self {
            Self::new(|args| match args {
                ["rev-parse", "--is-inside-work-tree"] => Ok("true\n".into()),
                _ => Ok(String::new()),
            })
        }

        pub(crate) fn not_installed(mut self) -> Self {
            self.installed = false;
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl GitRunner for FakeGit {
        fn run(&self, args: &[&str]) -> GitResult<String> {
            self.calls.borrow_mut().push(args.join(" "));
            (self.handler)(args).map_err(|stderr| GitError::Command {
                command: args.first().unwrap_or(&"").to_string(),
                stderr,
            })
        }

        fn is_installed(&self) -> bool {
            self.installed
        }
    }
}
