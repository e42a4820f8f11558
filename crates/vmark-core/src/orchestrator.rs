//! Bump, set and show.
//!
//! All orchestration logic lives here. The CLI is purely a display layer.
//!
//! Each mutating operation follows the same sequence:
//!
//! 1. compute the new value on a copy of the caller's [`VersionMutator`]
//! 2. save it through the [`VersionStore`]
//! 3. hand the copy back to the caller
//! 4. commit and tag, downgrading any git failure to a [`VcsOutcome`]
//!
//! A failure in steps 1 or 2 leaves both the mutator and the file as they
//! were. Git problems never undo a saved version.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::git::{Git, GitRunner, SystemGit};
use crate::store::{StoreError, VersionStore};
use crate::version::{Channel, SemVer, VersionError, VersionMutator, VersionResult};

/// Errors from orchestrated operations.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The command is disabled by the `prohibited` setting.
    #[error("{command} is prohibited by configuration")]
    Prohibited {
        /// The rejected command.
        command: &'static str,
    },

    /// `set` was given an empty or blank version.
    #[error("a version string is required")]
    EmptyVersion,

    /// Version parsing or mutation failed.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Reading or writing the version record failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Tag lookup needs a repository and none was found.
    #[error("git is not available or not in a git repository")]
    VcsUnavailable,

    /// Tag lookup found no tag that parses as a version.
    #[error("no version tags found")]
    NoTags,
}

/// Result alias for orchestrated operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// What a `bump` should change.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    /// `X.0.0`
    Major,
    /// `x.Y.0`
    Minor,
    /// `x.y.Z`
    #[default]
    Patch,
    /// Advance or start the alpha channel.
    Alpha,
    /// Advance or start the beta channel.
    Beta,
    /// Advance or start the release-candidate channel.
    Rc,
}

impl BumpKind {
    /// All kinds, in prompt order.
    pub const ALL: [Self; 6] = [
        Self::Major,
        Self::Minor,
        Self::Patch,
        Self::Alpha,
        Self::Beta,
        Self::Rc,
    ];

    /// Lowercase name as accepted on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Rc => "rc",
        }
    }

    /// The pre-release channel for `alpha`, `beta` and `rc`.
    pub const fn channel(self) -> Option<Channel> {
        match self {
            Self::Alpha => Some(Channel::Alpha),
            Self::Beta => Some(Channel::Beta),
            Self::Rc => Some(Channel::Rc),
            Self::Major | Self::Minor | Self::Patch => None,
        }
    }

    /// Apply this kind to `mutator`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::NoPreReleaseToIncrement`] when the version is
    /// already on the same channel but its pre-release has no numeric tail,
    /// and [`VersionError::ComponentOverflow`] when the incremented
    /// component is already `u64::MAX`.
    pub fn apply(self, mutator: &mut VersionMutator) -> VersionResult<()> {
        match (self, self.channel()) {
            (_, Some(channel)) => {
                mutator.advance_pre_release(channel)?;
            }
            (Self::Major, None) => {
                mutator.increment_major()?;
            }
            (Self::Minor, None) => {
                mutator.increment_minor()?;
            }
            (_, None) => {
                mutator.increment_patch()?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no bump kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bump type: {0} (expected major, minor, patch, alpha, beta or rc)")]
pub struct UnknownBumpKind(pub String);

impl FromStr for BumpKind {
    type Err = UnknownBumpKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBumpKind(s.to_string()))
    }
}

/// Parameters for [`Orchestrator::bump`].
#[derive(Debug, Clone, Default)]
pub struct BumpRequest {
    /// What to increment.
    pub kind: BumpKind,
    /// Build metadata to attach afterwards. Empty means none.
    pub build: Option<String>,
    /// Skip commit and tag for this call.
    pub skip_git: bool,
}

/// Where [`Orchestrator::set`] takes the new version from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetSource {
    /// A user-supplied version string.
    Explicit(String),
    /// The highest version found among git tags.
    LatestTag,
}

/// Parameters for [`Orchestrator::set`].
#[derive(Debug, Clone)]
pub struct SetRequest {
    /// The new version.
    pub source: SetSource,
    /// Skip commit and tag for this call.
    pub skip_git: bool,
}

/// Construction-time switches.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// Commit and tag after changes (`git.enabled`).
    pub git_enabled: bool,
    /// Reject `bump` and `set`.
    pub prohibited: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            git_enabled: true,
            prohibited: false,
        }
    }
}

/// What happened on the git side of a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VcsOutcome {
    /// Git integration is off, globally or for this call.
    Disabled,
    /// Not inside a repository, or git is not installed.
    Unavailable,
    /// The commit did not go through; no tag was attempted.
    CommitFailed,
    /// Committed, and no tag was wanted.
    Committed,
    /// Committed and tagged.
    Tagged {
        /// The created tag.
        tag: String,
    },
    /// Committed, but the tag could not be created.
    TagFailed {
        /// The tag that was attempted.
        tag: String,
    },
}

impl VcsOutcome {
    /// Whether this outcome should be surfaced as a warning.
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::Unavailable | Self::CommitFailed | Self::TagFailed { .. }
        )
    }
}

/// Result of a successful `bump` or `set`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeOutcome {
    /// Version before the change.
    pub previous: SemVer,
    /// Version after the change, as saved.
    pub current: SemVer,
    /// The tag the version was taken from, for `set` from tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_tag: Option<SemVer>,
    /// Git result.
    pub vcs: VcsOutcome,
}

/// Decomposed view of the current version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSummary {
    /// Full formatted version.
    pub version: String,
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Pre-release identifiers.
    pub pre_release: Option<String>,
    /// Build metadata.
    pub build: Option<String>,
    /// No pre-release attached.
    pub stable: bool,
    /// Where the version is stored.
    pub file: Utf8PathBuf,
}

/// Drives version changes through the store and git.
#[derive(Debug)]
pub struct Orchestrator<R = SystemGit> {
    store: VersionStore,
    git: Git<R>,
    options: OrchestratorOptions,
}

impl<R: GitRunner> Orchestrator<R> {
    /// Wire up the collaborators.
    pub const fn new(store: VersionStore, git: Git<R>, options: OrchestratorOptions) -> Self {
        Self {
            store,
            git,
            options,
        }
    }

    /// The version store.
    pub const fn store(&self) -> &VersionStore {
        &self.store
    }

    /// The git adapter.
    pub const fn git(&self) -> &Git<R> {
        &self.git
    }

    /// Apply `request.kind` (and build metadata), save, then commit and tag.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::Prohibited`] when disabled by configuration,
    /// [`OrchestratorError::Version`] when a same-channel pre-release has no
    /// numeric tail or the build metadata is invalid, and
    /// [`OrchestratorError::Store`] when saving fails.
    #[instrument(skip(self, mutator, request), fields(kind = %request.kind))]
    pub fn bump(
        &self,
        mutator: &mut VersionMutator,
        request: &BumpRequest,
    ) -> OrchestratorResult<ChangeOutcome> {
        self.ensure_allowed("bump")?;

        let previous = mutator.current().clone();
        let mut next = mutator.clone();
        request.kind.apply(&mut next)?;
        if let Some(build) = request.build.as_deref().filter(|b| !b.is_empty()) {
            next.set_build(Some(build))?;
        }

        self.store.save(next.current())?;
        *mutator = next;
        info!(from = %previous, to = %mutator.current(), "version bumped");

        let vcs = self.sync_vcs(mutator.current(), request.skip_git, true);
        Ok(ChangeOutcome {
            previous,
            current: mutator.current().clone(),
            from_tag: None,
            vcs,
        })
    }

    /// Replace the version, save, then commit and (for explicit versions) tag.
    ///
    /// A version taken from the latest tag is committed but not tagged again.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::Prohibited`], [`OrchestratorError::EmptyVersion`]
    /// for a blank string, [`OrchestratorError::Version`] for an invalid one,
    /// [`OrchestratorError::VcsUnavailable`] or [`OrchestratorError::NoTags`]
    /// when tag lookup cannot produce a version, and
    /// [`OrchestratorError::Store`] when saving fails.
    #[instrument(skip(self, mutator, request), fields(source = ?request.source))]
    pub fn set(
        &self,
        mutator: &mut VersionMutator,
        request: &SetRequest,
    ) -> OrchestratorResult<ChangeOutcome> {
        self.ensure_allowed("set")?;

        let (text, from_tag) = match &request.source {
            SetSource::Explicit(text) => {
                if text.trim().is_empty() {
                    return Err(OrchestratorError::EmptyVersion);
                }
                (text.clone(), None)
            }
            SetSource::LatestTag => {
                let latest = self.latest_tag()?;
                (latest.format(), Some(latest))
            }
        };

        let previous = mutator.current().clone();
        let mut next = mutator.clone();
        next.set(&text)?;

        self.store.save(next.current())?;
        *mutator = next;
        info!(from = %previous, to = %mutator.current(), "version set");

        let create_tag = from_tag.is_none();
        let vcs = self.sync_vcs(mutator.current(), request.skip_git, create_tag);
        Ok(ChangeOutcome {
            previous,
            current: mutator.current().clone(),
            from_tag,
            vcs,
        })
    }

    /// Break the current version into its parts. Always allowed.
    pub fn show(&self, mutator: &VersionMutator) -> VersionSummary {
        let current = mutator.current();
        VersionSummary {
            version: current.format(),
            major: current.major(),
            minor: current.minor(),
            patch: current.patch(),
            pre_release: current.pre_release().map(str::to_string),
            build: current.build().map(str::to_string),
            stable: current.is_stable(),
            file: self.store.path().to_path_buf(),
        }
    }

    fn ensure_allowed(&self, command: &'static str) -> OrchestratorResult<()> {
        if self.options.prohibited {
            warn!(command, "command prohibited by configuration");
            return Err(OrchestratorError::Prohibited { command });
        }
        Ok(())
    }

    fn latest_tag(&self) -> OrchestratorResult<SemVer> {
        if !self.git.is_available() {
            return Err(OrchestratorError::VcsUnavailable);
        }
        let latest = self
            .git
            .latest_version_tag()
            .ok_or(OrchestratorError::NoTags)?;
        debug!(%latest, "resolved latest version tag");
        Ok(latest)
    }

    fn sync_vcs(&self, version: &SemVer, skip_git: bool, create_tag: bool) -> VcsOutcome {
        if skip_git || !self.options.git_enabled {
            debug!(skip_git, enabled = self.options.git_enabled, "git integration off");
            return VcsOutcome::Disabled;
        }
        if !self.git.is_available() {
            warn!("git is not available, skipping commit and tag");
            return VcsOutcome::Unavailable;
        }

        let text = version.format();
        if !self.git.commit(&text, self.store.path()) {
            return VcsOutcome::CommitFailed;
        }
        if !create_tag {
            return VcsOutcome::Committed;
        }

        let tag = self.git.tag_name(&text);
        if self.git.tag(&text) {
            VcsOutcome::Tagged { tag }
        } else {
            VcsOutcome::TagFailed { tag }
        }
    }
}
