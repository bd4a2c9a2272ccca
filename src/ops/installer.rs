//! External package installation.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::util::process::{find_executable, ProcessBuilder};

/// Outcome of running the package manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerReport {
    pub success: bool,
    /// Captured error output, empty on success
    pub error_output: String,
}

impl InstallerReport {
    pub fn ok() -> Self {
        InstallerReport {
            success: true,
            error_output: String::new(),
        }
    }

    pub fn failed(error_output: impl Into<String>) -> Self {
        InstallerReport {
            success: false,
            error_output: error_output.into(),
        }
    }
}

/// Installs the host's package dependencies.
pub trait PackageInstaller {
    /// Install packages for the `package.json` in `base_dir`.
    ///
    /// Returns `Err` only when the installer could not be started at all.
    fn install(&self, base_dir: &Path) -> Result<InstallerReport>;
}

/// Runs a package manager executable (`yarn` by default).
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
}

impl CommandInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        CommandInstaller {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, base_dir: &Path) -> ProcessBuilder {
        let program = find_executable(&self.program)
            .map(|p| p.into_os_string())
            .unwrap_or_else(|| self.program.clone().into());
        ProcessBuilder::new(program)
            .args(&self.args)
            .cwd(base_dir)
    }
}

fn spinner(message: String) -> Option<ProgressBar> {
    if !io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

impl PackageInstaller for CommandInstaller {
    fn install(&self, base_dir: &Path) -> Result<InstallerReport> {
        let cmd = self.command(base_dir);
        tracing::debug!("running `{}` in {}", cmd.display_command(), base_dir.display());

        let pb = spinner(format!("Installing packages with {}", self.program));
        let output = cmd.exec();
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let output = output?;

        if output.status.success() {
            Ok(InstallerReport::ok())
        } else {
            let mut error_output = String::from_utf8_lossy(&output.stderr).into_owned();
            if error_output.trim().is_empty() {
                error_output = String::from_utf8_lossy(&output.stdout).into_owned();
            }
            Ok(InstallerReport::failed(error_output))
        }
    }
}
