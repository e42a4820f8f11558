//! Persisted version record.
//!
//! The record is a JSON object with a single `version` field:
//!
//! ```json
//! {
//!     "version": "1.4.0-beta.2"
//! }
//! ```
//!
//! A missing file is created at `1.0.0` on first load. Saves replace the
//! whole file through a temporary sibling so a reader never sees a partial
//! record.

use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::version::{SemVer, VersionError};

/// Default file name for the version record.
pub const DEFAULT_VERSION_FILE: &str = "version.json";

/// Errors from reading or writing the version record.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The record location.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The `version` field holds something that is not a semantic version.
    #[error("corrupt version file {path}: {value:?} is not a valid version")]
    CorruptVersion {
        /// The record location.
        path: Utf8PathBuf,
        /// The stored string.
        value: String,
        /// Parser diagnostic.
        #[source]
        source: VersionError,
    },

    /// Serializing the record failed.
    #[error("failed to encode version record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Serialize)]
struct VersionRecord<'a> {
    version: &'a str,
}

/// Reads and writes the version record at a fixed path.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: Utf8PathBuf,
}

impl VersionStore {
    /// A store backed by `path`. Nothing is read until [`Self::load`].
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Read the stored version.
    ///
    /// - missing file: `1.0.0` is written and returned
    /// - empty file, text that is not JSON, or no string `version` field:
    ///   `1.0.0` is returned and the file is left alone
    ///
    /// # Errors
    ///
    /// [`StoreError::CorruptVersion`] when `version` does not parse, and
    /// [`StoreError::Io`] for filesystem failures.
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn load(&self) -> StoreResult<SemVer> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let initial = SemVer::default();
                info!(version = %initial, "no version file, creating one");
                self.save(&initial)?;
                return Ok(initial);
            }
            Err(source) => return Err(self.io_error(source)),
        };

        if contents.trim().is_empty() {
            warn!("version file is empty, using default");
            return Ok(SemVer::default());
        }

        let record: Value = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "version file is not JSON, using default");
                return Ok(SemVer::default());
            }
        };

        match record.get("version") {
            Some(Value::String(text)) => {
                let version =
                    SemVer::parse(text).map_err(|source| StoreError::CorruptVersion {
                        path: self.path.clone(),
                        value: text.clone(),
                        source,
                    })?;
                debug!(%version, "loaded version");
                Ok(version)
            }
            other => {
                warn!(found = ?other, "version field missing or not a string, using default");
                Ok(SemVer::default())
            }
        }
    }

    /// Overwrite the record with `version`.
    ///
    /// The output is indented by four spaces and ends with a newline.
    /// Parent directories are created when missing.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] when the directory, temporary file or final
    /// rename cannot be written.
    #[instrument(skip_all, fields(path = %self.path, %version))]
    pub fn save(&self, version: &SemVer) -> StoreResult<()> {
        let formatted = version.format();
        let body = encode_record(&formatted)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;

        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        staged.write_all(&body).map_err(|e| self.io_error(e))?;
        staged.as_file().sync_all().map_err(|e| self.io_error(e))?;
        staged
            .persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!("version saved");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn encode_record(version: &str) -> StoreResult<Vec<u8>> {
    let mut body = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut body, formatter);
    VersionRecord { version }
        .serialize(&mut serializer)
        .map_err(StoreError::Encode)?;
    body.push(b'\n');
    Ok(body)
}
