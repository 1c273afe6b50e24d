//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use fql_config::Config;
use tracing::debug;

use super::args::QueryArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    ///
    /// An explicit `config_file` is loaded on its own; otherwise `.fql.toml` files are
    /// discovered from the current directory upwards.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = match config_file {
            Some(path) => Config::load_file(path),
            None => Config::load(&cwd),
        }
        .map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;

        debug!(
            sources = config.sources.len(),
            fields = config.fields.len(),
            strict = config.settings.strict,
            "configuration loaded"
        );
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Returns the filter expression, enforcing the configured length limit.
    pub fn query_text(&self, args: &QueryArgs) -> Result<String, ExitCode> {
        let text = args.text();
        let limit = self.config.settings.max_query_length;
        if text.len() > limit {
            eprintln!(
                "error: query is {} bytes, longer than the maximum of {limit}",
                text.len()
            );
            eprintln!("Raise max_query_length in [settings] to accept longer filters.");
            return Err(ExitCode::FAILURE);
        }
        Ok(text)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
