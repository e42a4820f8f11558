//! Error types for vmark-core
//!
//! Each module owns its error enum; this one covers configuration and
//! re-exports the rest so callers can `use vmark_core::error::*`.

use thiserror::Error;

pub use crate::git::{GitError, GitResult};
pub use crate::orchestrator::{OrchestratorError, OrchestratorResult};
pub use crate::store::{StoreError, StoreResult};
pub use crate::version::{VersionError, VersionResult};

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
