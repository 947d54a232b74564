//! Configuration file support for libplan.
//!
//! Two locations are read:
//! - Global: `~/.libplan/config.toml` - user-wide defaults (e.g. where UVVM lives)
//! - Project: `libplan.toml` - found in the working directory or an ancestor
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::classify::{OWN_SOURCE_MARKER, TARGET_DEPENDENT_MARKER};
use crate::core::layout::DEFAULT_MANIFEST_SUBPATH;
use crate::util::fs;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_NAME: &str = "libplan.toml";

/// Collection root used when nothing else is configured.
pub const DEFAULT_COLLECTION_ROOT: &str = "/opt/uvvm";

/// Environment variable consulted for the collection root by default.
pub const DEFAULT_ROOT_ENV: &str = "UVVM_HOME";

/// libplan configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library collection whose manifests are resolved
    pub collection: CollectionConfig,

    /// Classification markers
    pub classify: ClassifyConfig,

    /// Project-local libraries built from glob patterns
    pub local: Vec<LocalLibraryConfig>,

    /// Emission defaults
    pub emit: EmitConfig,
}

/// A collection of libraries sharing one root directory, each with a
/// compile-order manifest at the same relative location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Directory containing one subdirectory per library
    pub root: Option<PathBuf>,

    /// Environment variable overriding `root` when set
    pub root_env: Option<String>,

    /// Manifest location relative to a library directory
    pub manifest: Option<PathBuf>,

    /// Whether the collection takes part in resolution at all (default true)
    pub enabled: Option<bool>,

    /// Warn about resolved files that are missing on disk (default false)
    pub check_files: Option<bool>,

    /// Declared libraries, in resolution order
    pub libraries: Vec<String>,

    /// Libraries living outside `root`
    pub paths: BTreeMap<String, PathBuf>,
}

impl CollectionConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn check_files(&self) -> bool {
        self.check_files.unwrap_or(false)
    }
}

/// Classification markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Directory name marking target-dependent sources of the current library
    pub target_dependent_marker: Option<String>,

    /// Relative prefix denoting the current library's own source tree
    pub own_source_marker: Option<String>,
}

impl ClassifyConfig {
    pub fn target_dependent_marker(&self) -> &str {
        self.target_dependent_marker
            .as_deref()
            .unwrap_or(TARGET_DEPENDENT_MARKER)
    }

    pub fn own_source_marker(&self) -> &str {
        self.own_source_marker.as_deref().unwrap_or(OWN_SOURCE_MARKER)
    }
}

/// A project library whose files come from glob patterns instead of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalLibraryConfig {
    /// Library name (e.g. `main`)
    pub name: String,

    /// Glob patterns relative to the project root
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Defaults for emitted plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// VHDL standard written to `vhdl_ls.toml`
    pub standard: Option<String>,
}

impl EmitConfig {
    pub fn standard(&self) -> &str {
        self.standard.as_deref().unwrap_or("2008")
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Lists are replaced wholesale when the other config sets them, so a
    /// project can narrow the globally declared library set.
    pub fn merge(&mut self, other: Config) {
        let collection = other.collection;
        if collection.root.is_some() {
            self.collection.root = collection.root;
        }
        if collection.root_env.is_some() {
            self.collection.root_env = collection.root_env;
        }
        if collection.manifest.is_some() {
            self.collection.manifest = collection.manifest;
        }
        if collection.enabled.is_some() {
            self.collection.enabled = collection.enabled;
        }
        if collection.check_files.is_some() {
            self.collection.check_files = collection.check_files;
        }
        if !collection.libraries.is_empty() {
            self.collection.libraries = collection.libraries;
        }
        self.collection.paths.extend(collection.paths);

        if other.classify.target_dependent_marker.is_some() {
            self.classify.target_dependent_marker = other.classify.target_dependent_marker;
        }
        if other.classify.own_source_marker.is_some() {
            self.classify.own_source_marker = other.classify.own_source_marker;
        }

        if !other.local.is_empty() {
            self.local = other.local;
        }

        if other.emit.standard.is_some() {
            self.emit.standard = other.emit.standard;
        }
    }

    /// Manifest location relative to a library directory.
    pub fn manifest_subpath(&self) -> &Path {
        self.collection
            .manifest
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_MANIFEST_SUBPATH))
    }

    /// Environment variable naming the collection root.
    pub fn root_env(&self) -> &str {
        self.collection.root_env.as_deref().unwrap_or(DEFAULT_ROOT_ENV)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (libplan.toml)
/// 2. Global config (~/.libplan/config.toml)
/// 3. Defaults
///
/// A broken global file is logged and skipped; a broken project file is an
/// error.
pub fn load_config(global_path: Option<&Path>, project_path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    if let Some(project_path) = project_path {
        config.merge(Config::load(project_path)?);
    }

    Ok(config)
}

/// Get the global libplan config directory (~/.libplan).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".libplan"))
}

/// Get the global config path (~/.libplan/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}
