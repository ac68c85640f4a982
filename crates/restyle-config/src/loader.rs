//! Configuration loader.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

use crate::error::ConfigError;
use crate::schema::Config;

/// Reads TOML configuration, substituting `${VAR}` from the environment
/// before parsing.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::Io(e),
        })?;
        Self::load_str(&content)
    }

    /// Like [`ConfigLoader::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(&Self::expand_env_vars(content)?)?)
    }

    /// Replace every `${VAR}`. The first unset variable is an error.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let pattern = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "env".to_string(),
            message: e.to_string(),
        })?;

        let mut missing = None;
        let expanded = pattern.replace_all(content, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| caps[1].to_string());
                String::new()
            })
        });
        match missing {
            Some(name) => Err(ConfigError::EnvVarNotSet(name)),
            None => Ok(expanded.into_owned()),
        }
    }

    /// Expand `~` in a configured path.
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).into_owned()
    }

    /// `~/.restyle/config.toml`, or `./.restyle/config.toml` without a
    /// home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".restyle")
            .join("config.toml")
    }
}
