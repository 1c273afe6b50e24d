//! Configuration file discovery.
//!
//! Every directory from the working directory up to the filesystem root may hold a
//! `.fql.toml`. Files are parsed as they are found, so the file that sets `root = true`
//! ends the walk without a second read. The user's `~/.fql.toml` is appended last
//! unless a root file was reached first.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::{ConfigError, merge::ParsedConfig, parse::parse_config_file};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".fql.toml";

/// Config files found for a working directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Parsed files, closest to the working directory first.
    pub configs: Vec<ParsedConfig>,
    /// The `root = true` file that ended the walk, if one was reached.
    pub root: Option<PathBuf>,
}

impl Discovery {
    /// Paths of the discovered files in precedence order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.configs.iter().map(|c| c.path.as_path())
    }
}

/// Walks up from `cwd` collecting and parsing `.fql.toml` files.
///
/// Fails on the first file that cannot be read or parsed. Files above a
/// `root = true` file are never opened.
pub fn discover_configs(cwd: &Path) -> Result<Discovery, ConfigError> {
    let mut discovery = Discovery::default();

    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            continue;
        }

        let config = parse_config_file(&path)?;
        let is_root = config.root == Some(true);
        debug!(path = %path.display(), is_root, "found config file");
        discovery.configs.push(ParsedConfig {
            path: path.clone(),
            config,
        });

        if is_root {
            discovery.root = Some(path);
            return Ok(discovery);
        }
    }

    // A home directory inside the walk has already contributed its file
    if let Some(global) = global_config_path().filter(|p| p.is_file())
        && !discovery.paths().any(|p| p == global)
    {
        debug!(path = %global.display(), "found global config file");
        let config = parse_config_file(&global)?;
        discovery.configs.push(ParsedConfig {
            path: global,
            config,
        });
    }

    Ok(discovery)
}

/// Location of the user's global config, `~/.fql.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// True when `path` is the user's global config.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
