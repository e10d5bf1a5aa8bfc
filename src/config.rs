// src/config.rs

//! # Startup Configuration
//!
//! `AppConfig` is built exactly once, in `main`, and passed down to the store and the
//! handlers. Nothing below the CLI layer reads environment variables or guesses paths,
//! which keeps the engine usable from tests with a temporary directory.
//!
//! Resolution order for the base directory:
//! 1. `CMDR_HOME`, when set and non-empty.
//! 2. `<system config dir>/cmdr` (e.g. `~/.config/cmdr`).
//!
//! An optional `config.toml` in the base directory may override `store_path`,
//! `scripts_dir` and `shell`. Values go through `shellexpand`, so `~` and `$VAR`
//! work; relative paths are taken relative to the base directory.

use crate::{
    constants::{
        APP_DIR_NAME, CONFIG_FILENAME, HOME_ENV_VAR, SCRIPTS_DIRNAME, STORE_FILENAME,
    },
    models::ConfigFile,
};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse configuration file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to expand '{value}' in configuration: {message}")]
    Expand { value: String, message: String },
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Paths and settings shared by every command of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_dir: PathBuf,
    pub store_path: PathBuf,
    pub scripts_dir: PathBuf,
    /// Shell used to run final commands. `None` means the platform default.
    pub shell: Option<String>,
}

impl AppConfig {
    /// Builds the configuration from the process environment. Call once at startup.
    pub fn from_env() -> ConfigResult<Self> {
        let base_dir = match env::var_os(HOME_ENV_VAR) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or(ConfigError::ConfigDirNotFound)?
                .join(APP_DIR_NAME),
        };
        Self::load(base_dir)
    }

    /// Loads `config.toml` from `base_dir` if it exists and applies it over the defaults.
    pub fn load(base_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let defaults = Self::with_base_dir(base_dir);
        let config_path = defaults.base_dir.join(CONFIG_FILENAME);

        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No '{}'; using defaults.", config_path.display());
                return Ok(defaults);
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_path,
                    source,
                });
            }
        };

        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?;
        log::debug!("Loaded '{}': {:?}", config_path.display(), file);
        defaults.apply(file)
    }

    /// The default layout rooted at `base_dir`, without reading anything from disk.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            store_path: base_dir.join(STORE_FILENAME),
            scripts_dir: base_dir.join(SCRIPTS_DIRNAME),
            base_dir,
            shell: None,
        }
    }

    fn apply(mut self, file: ConfigFile) -> ConfigResult<Self> {
        if let Some(store_path) = file.store_path {
            self.store_path = expand_path(&store_path, &self.base_dir)?;
        }
        if let Some(scripts_dir) = file.scripts_dir {
            self.scripts_dir = expand_path(&scripts_dir, &self.base_dir)?;
        }
        if let Some(shell) = file.shell {
            let shell = shell.trim();
            if !shell.is_empty() {
                self.shell = Some(shell.to_string());
            }
        }
        Ok(self)
    }
}

/// Expands `~` and environment variables, then anchors relative results at `base_dir`.
fn expand_path(value: &str, base_dir: &Path) -> ConfigResult<PathBuf> {
    let expanded = shellexpand::full(value).map_err(|e| ConfigError::Expand {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    let path = PathBuf::from(expanded.into_owned());
    Ok(if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    })
}
