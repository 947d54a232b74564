//! Global context for libplan operations.
//!
//! Provides centralized access to the working directory, configuration
//! locations and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::util::config::{self, Config, PROJECT_CONFIG_NAME};

/// Errors locating the project configuration.
#[derive(Debug, Error)]
pub enum ConfigLookupError {
    #[error("could not find {} in {} or any parent directory", PROJECT_CONFIG_NAME, .dir.display())]
    NotFound { dir: PathBuf },

    #[error("config file does not exist: {}", .path.display())]
    Missing { path: PathBuf },
}

/// Global context containing the working directory and config locations.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Explicit project config (`--config`)
    config_override: Option<PathBuf>,

    /// Global config file (~/.libplan/config.toml), if a home dir exists
    global_config: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context rooted at a specific directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            config_override: None,
            global_config: config::global_config_path(),
            verbose: false,
        }
    }

    /// Use an explicit project config instead of searching for one.
    pub fn with_config(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path.map(|p| {
            if p.is_absolute() {
                p
            } else {
                self.cwd.join(p)
            }
        });
        self
    }

    /// Replace (or disable) the global config location.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find the project config (libplan.toml) starting from cwd and searching upward.
    pub fn find_config(&self) -> Result<PathBuf, ConfigLookupError> {
        if let Some(path) = &self.config_override {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(ConfigLookupError::Missing { path: path.clone() })
            };
        }

        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(PROJECT_CONFIG_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ConfigLookupError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Directory that relative paths in the project config are resolved against.
    ///
    /// Without a project config this is the working directory.
    pub fn project_root(&self) -> PathBuf {
        match self.find_config() {
            Ok(path) => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.cwd.clone()),
            Err(_) => self.cwd.clone(),
        }
    }

    /// Load the merged global + project configuration.
    ///
    /// An explicit `--config` that does not exist is an error; a missing
    /// discovered config falls back to defaults.
    pub fn load_config(&self) -> Result<Config> {
        let project = match self.find_config() {
            Ok(path) => Some(path),
            Err(ConfigLookupError::NotFound { .. }) => {
                tracing::debug!("no {} found, using defaults", PROJECT_CONFIG_NAME);
                None
            }
            Err(e @ ConfigLookupError::Missing { .. }) => return Err(e.into()),
        };

        config::load_config(self.global_config.as_deref(), project.as_deref())
    }
}
