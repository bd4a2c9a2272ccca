//! Test utilities and mocks for gah unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! let host = TestHost::new();
//! host.module(ModuleFixture::new("core", "acme"));
//! host.write_descriptor(&[("core", "core")]);
//!
//! let mock = MockInstaller::new();
//! // Pass `&mock` to an `Installer` and inspect `mock.calls()` afterwards.
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::ops::installer::{InstallerReport, PackageInstaller};

pub use fixtures::*;

/// A package installer that records calls instead of running anything.
#[derive(Debug, Default)]
pub struct MockInstaller {
    calls: RefCell<Vec<PathBuf>>,
    failure: Option<String>,
}

impl MockInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// An installer whose every run fails with `error_output`.
    pub fn failing(error_output: impl Into<String>) -> Self {
        MockInstaller {
            calls: RefCell::new(Vec::new()),
            failure: Some(error_output.into()),
        }
    }

    /// Base directories the installer was run in, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl PackageInstaller for MockInstaller {
    fn install(&self, base_dir: &Path) -> Result<InstallerReport> {
        self.calls.borrow_mut().push(base_dir.to_path_buf());
        Ok(match &self.failure {
            Some(output) => InstallerReport::failed(output.clone()),
            None => InstallerReport::ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_installer_records_calls() {
        let mock = MockInstaller::failing("offline");

        let report = mock.install(Path::new("/host/.gah")).unwrap();

        assert!(!report.success);
        assert_eq!(report.error_output, "offline");
        assert_eq!(mock.calls(), vec![PathBuf::from("/host/.gah")]);
    }
}
