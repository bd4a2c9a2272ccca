//! High-level operations.
//!
//! This module contains the implementation of gah commands.

pub mod clean;
pub mod install;
pub mod installer;
pub mod tree;

pub use clean::{clean, CleanReport};
pub use install::{
    InstallError, InstallOptions, InstallOutcome, InstallReport, Installer, PackageInstallStatus,
};
pub use installer::{CommandInstaller, InstallerReport, PackageInstaller};
pub use tree::{render_tree, TreeOptions};
