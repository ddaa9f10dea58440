use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use crate::chips;
use crate::suggest;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "storefind";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the configuration was read from; `None` when running on defaults.
    pub config_path: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub suggestion_limit: usize,
    pub chip_query_max_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            catalog: None,
            suggestion_limit: suggest::DEFAULT_LIMIT,
            chip_query_max_len: chips::DEFAULT_QUERY_MAX_LEN,
        }
    }
}

// =============================================================================
// File Deserialization
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConfigFile {
    catalog: Option<PathBuf>,
    suggestion_limit: usize,
    chip_query_max_len: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let defaults = Config::default();
        Self {
            catalog: defaults.catalog,
            suggestion_limit: defaults.suggestion_limit,
            chip_query_max_len: defaults.chip_query_max_len,
        }
    }
}

impl ConfigFile {
    fn into_config(self, path: PathBuf) -> Result<Config> {
        if self.suggestion_limit == 0 {
            bail!("suggestion_limit must be at least 1");
        }
        if self.chip_query_max_len == 0 {
            bail!("chip_query_max_len must be at least 1");
        }

        // relative catalog paths are resolved against the config file
        let catalog = self.catalog.map(|catalog| {
            let expanded = expand_tilde(&catalog);
            match path.parent() {
                Some(dir) if expanded.is_relative() => dir.join(expanded),
                _ => expanded,
            }
        });

        Ok(Config {
            config_path: Some(path),
            catalog,
            suggestion_limit: self.suggestion_limit,
            chip_query_max_len: self.chip_query_max_len,
        })
    }
}

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine base directories")?;
    Ok(base.config_dir().join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is tried
/// and a missing file falls back to built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("configuration file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let path = config_path()?;
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Config::default());
            }
            path
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration file at {}", path.display()))?;
    parse(&raw, path)
}

fn parse(raw: &str, path: PathBuf) -> Result<Config> {
    let value: toml::Value = toml::from_str(raw)
        .with_context(|| format!("failed to parse {} as TOML", path.display()))?;

    warn_unknown_keys(&value);

    let cfg_file: ConfigFile = value
        .try_into()
        .with_context(|| format!("failed to deserialize config from {}", path.display()))?;

    let config = cfg_file.into_config(path)?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known = HashSet::from(["catalog", "suggestion_limit", "chip_query_max_len"]);

    for key in table.keys() {
        if !known.contains(key.as_str()) {
            tracing::warn!("unknown configuration key `{}`", key);
        }
    }
}
