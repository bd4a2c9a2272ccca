//! Resolution error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::ManifestError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during dependency resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("module `{name}` is not defined in {}", .manifest.display())]
    ModuleNotFound {
        name: String,
        manifest: PathBuf,
        available: Vec<String>,
    },

    #[error("base directory of module `{name}` does not exist: {}", .path.display())]
    MissingBaseDir { name: String, path: PathBuf },

    #[error("circular module dependency: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Manifest(e) => e.to_diagnostic(),

            ResolveError::ModuleNotFound {
                name,
                manifest,
                available,
            } => {
                let mut diag = Diagnostic::error(format!("module `{}` is not defined", name))
                    .with_location(manifest);

                if available.is_empty() {
                    diag = diag.with_context("the manifest defines no modules");
                } else {
                    diag = diag.with_context(format!("defined modules: {}", available.join(", ")));
                }

                diag.with_suggestion(suggestions::CHECK_DEPENDENCY_PATH)
            }

            ResolveError::MissingBaseDir { name, path } => {
                Diagnostic::error(format!("base directory of module `{}` does not exist", name))
                    .with_location(path)
                    .with_suggestion(suggestions::CHECK_BASE_DIR)
            }

            ResolveError::CircularDependency { chain } => {
                Diagnostic::error("circular module dependency")
                    .with_context(format!("cycle: {}", chain.join(" -> ")))
                    .with_suggestion(suggestions::BREAK_CYCLE)
            }
        }
    }
}
