//! Core library for vmark.
//!
//! This crate provides the version model, its persistence, git integration
//! and the orchestration used by the `vmark` CLI and any downstream
//! consumers.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git commit, tag and tag listing
//! - [`orchestrator`] - Bump, set and show
//! - [`store`] - The `version.json` record
//! - [`version`] - Semantic version value and mutations
//!
//! # Quick Start
//!
//! ```no_run
//! use vmark_core::{BumpKind, BumpRequest, Config, ConfigLoader, Git, Orchestrator,
//!     OrchestratorOptions, VersionMutator, VersionStore};
//!
//! let config = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let store = VersionStore::new(config.file.clone());
//! let mut mutator = VersionMutator::new(store.load().expect("readable version file"));
//! let orchestrator = Orchestrator::new(
//!     store,
//!     Git::system(".", &config.git),
//!     OrchestratorOptions { git_enabled: config.git.enabled, prohibited: config.prohibited },
//! );
//!
//! let request = BumpRequest { kind: BumpKind::Minor, ..BumpRequest::default() };
//! let outcome = orchestrator.bump(&mut mutator, &request).expect("bump");
//! println!("{} -> {}", outcome.previous, outcome.current);
//! ```
#![deny(unsafe_code)]

pub mod config;

pub mod error;

pub mod git;

pub mod orchestrator;

pub mod store;

pub mod version;

pub use config::{Config, ConfigLoader, GitConfig, LogLevel};

pub use error::{ConfigError, ConfigResult};

pub use git::{Git, GitRunner, SystemGit, TagTemplate};

pub use orchestrator::{
    BumpKind, BumpRequest, ChangeOutcome, Orchestrator, OrchestratorError, OrchestratorOptions,
    SetRequest, SetSource, VcsOutcome, VersionSummary,
};

pub use store::VersionStore;

pub use version::{Channel, SemVer, VersionError, VersionMutator};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
