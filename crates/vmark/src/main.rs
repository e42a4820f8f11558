//! vmark CLI
#![deny(unsafe_code)]

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use tracing::debug;
use vmark::{Cli, Commands, commands};
use vmark_core::config::ConfigLoader;
use vmark_core::{Git, Orchestrator, OrchestratorOptions, VersionMutator, VersionStore};

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let config = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::for_binary(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        file = %config.file,
        "CLI initialized"
    );

    let store = VersionStore::new(cwd.join(&config.file));
    let mut mutator = VersionMutator::new(
        store
            .load()
            .with_context(|| format!("failed to read {}", store.path()))?,
    );
    let orchestrator = Orchestrator::new(
        store,
        Git::system(cwd, &config.git),
        OrchestratorOptions {
            git_enabled: config.git.enabled,
            prohibited: config.prohibited,
        },
    );

    let result = match cli.command {
        Commands::Show(args) => commands::show::cmd_show(args, cli.json, &orchestrator, &mutator),
        Commands::Bump(args) => {
            commands::bump::cmd_bump(args, cli.json, &orchestrator, &mut mutator)
        }
        Commands::Set(args) => commands::set::cmd_set(args, cli.json, &orchestrator, &mut mutator),
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
