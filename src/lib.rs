//! gah - a linker for file-system-resident application modules
//!
//! This crate resolves the module graph declared by a host's
//! `gah-host.json`, links every module into the host, merges the modules'
//! build configuration into the host's own and runs the package manager.

pub mod core;
pub mod materialize;
pub mod merge;
pub mod ops;
pub mod resolver;
pub mod template;
pub mod util;

/// Test utilities and mocks for gah unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides temporary host fixtures and a recording package installer.
#[cfg(test)]
pub mod test_support;

pub use core::{ModuleId, ModuleNode, Workspace};
pub use resolver::Resolve;
pub use util::context::GlobalContext;
