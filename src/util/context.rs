//! Global context for gah operations.
//!
//! Provides centralized access to the working directory, the global gah
//! home (`~/.gah`), output settings and host discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{ManifestError, Workspace};
use crate::util::config::{self, Config};

/// Global context shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global gah data (~/.gah/)
    home: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let home = config::global_config_dir().unwrap_or_else(|| PathBuf::from(".gah"));
        GlobalContext {
            cwd,
            home,
            verbose: false,
            color: true,
        }
    }

    /// Override the gah home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The gah home directory (~/.gah/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Find `gah-host.json` starting from cwd and searching upward.
    pub fn find_host_descriptor(&self) -> Result<PathBuf, ManifestError> {
        Workspace::find_descriptor(&self.cwd)
    }

    /// Load the host workspace around the working directory.
    pub fn workspace(&self) -> Result<Workspace, ManifestError> {
        Workspace::new(&self.find_host_descriptor()?)
    }

    /// Global config merged with the host's project config.
    pub fn load_config(&self, ws: &Workspace) -> Config {
        config::load_config(Some(&self.config_path()), &ws.config_path())
    }
}
