//! Configuration file support for gah.
//!
//! gah reads two configuration files:
//! - Global: `~/.gah/config.toml` - User-wide defaults
//! - Project: `<host>/.gah/config.toml` - Host-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Package manager used when none is configured.
pub const DEFAULT_PACKAGE_MANAGER: &str = "yarn";

/// gah configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Install settings
    pub install: InstallConfig,

    /// Build plugins, always written into the host's devDependencies
    pub plugins: Vec<PluginEntry>,
}

/// Install-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InstallConfig {
    /// Package manager executable (default: yarn)
    pub package_manager: Option<String>,

    /// Extra arguments passed to the package manager
    pub args: Vec<String>,

    /// Stop before running the package manager
    pub skip_package_install: bool,

    /// Template rendered into the generated folder, relative to the host directory
    pub template: Option<PathBuf>,
}

/// A build plugin and the version to pin in devDependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    pub version: String,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

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
    /// Plugins are keyed by name; a plugin listed in `other` replaces the
    /// version of the same plugin here.
    pub fn merge(&mut self, other: Config) {
        if other.install.package_manager.is_some() {
            self.install.package_manager = other.install.package_manager;
        }
        if !other.install.args.is_empty() {
            self.install.args = other.install.args;
        }
        if other.install.skip_package_install {
            self.install.skip_package_install = true;
        }
        if other.install.template.is_some() {
            self.install.template = other.install.template;
        }

        for plugin in other.plugins {
            match self.plugins.iter_mut().find(|p| p.name == plugin.name) {
                Some(existing) => existing.version = plugin.version,
                None => self.plugins.push(plugin),
            }
        }
    }

    /// The package manager executable to run.
    pub fn package_manager(&self) -> &str {
        self.install
            .package_manager
            .as_deref()
            .unwrap_or(DEFAULT_PACKAGE_MANAGER)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`<host>/.gah/config.toml`)
/// 2. Global config (`~/.gah/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global gah config directory (`~/.gah`).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".gah"))
}

/// Get the global config path (`~/.gah/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`<host>/.gah/config.toml`).
pub fn project_config_path(host_dir: &Path) -> PathBuf {
    host_dir.join(".gah").join("config.toml")
}
