//! Logging setup.
//!
//! Log records are written as JSON lines to a file, never to stdout, which
//! carries the command's own output (and `--json` documents). When no log
//! file can be opened, records go to stderr instead.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "VMARK_LOG_PATH";
const ENV_LOG_DIR: &str = "VMARK_LOG_DIR";
const LOG_FILE_SUFFIX: &str = ".jsonl";

/// Where and under which name logs are written.
#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// Base name of the log file.
    pub service: String,
    /// Directory from the `log_dir` setting, if any.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Config for this binary, with the configured log directory.
    pub fn for_binary(log_dir: Option<PathBuf>) -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_string(),
            log_dir,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogTarget {
    dir: PathBuf,
    file_name: String,
}

impl LogTarget {
    fn in_dir(dir: PathBuf, service: &str) -> Self {
        Self {
            dir,
            file_name: format!("{service}{LOG_FILE_SUFFIX}"),
        }
    }

    #[cfg(test)]
    fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Keeps the background log writer alive; drop it last.
pub struct ObservabilityGuard {
    _log_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let (writer, guard) = match build_log_writer(&cfg.service, cfg.log_dir.as_deref()) {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("Warning: {err}. Falling back to stderr logging.");
            tracing_appender::non_blocking(std::io::stderr())
        }
    };

    let log_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init()?;

    tracing::debug!(service = %cfg.service, "logging initialized");

    Ok(ObservabilityGuard { _log_guard: guard })
}

/// Build the filter from the command line and environment.
///
/// `--quiet` wins over `-v`, which wins over `RUST_LOG`, which wins over
/// the configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn build_log_writer(
    service: &str,
    config_log_dir: Option<&Path>,
) -> Result<(NonBlocking, WorkerGuard), String> {
    let target = resolve_log_target_with(
        service,
        std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
        std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
        config_log_dir.map(Path::to_path_buf),
    )?;

    let appender = tracing_appender::rolling::never(&target.dir, &target.file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn resolve_log_target_with(
    service: &str,
    path_override: Option<PathBuf>,
    dir_override: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Result<LogTarget, String> {
    if let Some(path) = path_override {
        return log_target_from_path(&path);
    }

    if let Some(dir) = dir_override.or(config_dir) {
        let target = LogTarget::in_dir(dir, service);
        ensure_writable(&target)?;
        return Ok(target);
    }

    // Never the project directory.
    let mut candidates = Vec::new();
    if let Some(dirs) = directories::ProjectDirs::from("", "", service) {
        candidates.push(dirs.data_local_dir().join("logs"));
    }
    candidates.push(std::env::temp_dir().join(service));

    candidates
        .into_iter()
        .map(|dir| LogTarget::in_dir(dir, service))
        .find(|target| ensure_writable(target).is_ok())
        .ok_or_else(|| "no writable log directory found".to_string())
}

fn log_target_from_path(path: &Path) -> Result<LogTarget, String> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| format!("{ENV_LOG_PATH} must end in a UTF-8 file name"))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let target = LogTarget { dir, file_name };
    ensure_writable(&target)?;
    Ok(target)
}

fn ensure_writable(target: &LogTarget) -> Result<(), String> {
    std::fs::create_dir_all(&target.dir).map_err(|e| {
        format!(
            "failed to create log directory {}: {e}",
            target.dir.display()
        )
    })?;

    let path = target.dir.join(&target.file_name);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("failed to open log file {}: {e}", path.display()))?;

    Ok(())
}
