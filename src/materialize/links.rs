//! Generated layout and module links.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::Workspace;
use crate::resolver::Resolve;
use crate::util::fs::{ensure_dir, recreate_dir, remove_dir_all_if_exists, symlink};

/// A link that could not be created.
#[derive(Debug, thiserror::Error)]
#[error("failed to link module `{module}` to {}", .target.display())]
pub struct LinkError {
    pub module: String,
    pub target: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Delete and recreate every directory gah owns, and empty the assets folder.
pub fn clean_layout(ws: &Workspace) -> Result<()> {
    for dir in ws.layout().owned_dirs() {
        recreate_dir(&dir)?;
    }
    recreate_dir(&ws.assets_dir())?;
    tracing::debug!("cleaned {}", ws.layout().root().display());
    Ok(())
}

/// Remove the generated layout and the copied assets without recreating them.
pub fn remove_layout(ws: &Workspace) -> Result<()> {
    for dir in ws.layout().owned_dirs() {
        remove_dir_all_if_exists(&dir)?;
    }
    remove_dir_all_if_exists(&ws.assets_dir())
}

/// Create one link per resolved module in the dependency directory.
///
/// Each link is named after the module and points at its base path. If any
/// link fails, the dependency directory is removed before returning.
pub fn link_modules(ws: &Workspace, resolve: &Resolve) -> Result<usize> {
    let dependency_dir = ws.layout().dependency_dir();
    ensure_dir(&dependency_dir)?;

    let mut linked = 0;
    for module in resolve.modules() {
        let link = dependency_dir.join(module.name().as_str());
        if let Err(source) = symlink(module.base_path(), &link) {
            remove_dir_all_if_exists(&dependency_dir)?;
            return Err(LinkError {
                module: module.name().to_string(),
                target: module.base_path().to_path_buf(),
                source,
            }
            .into());
        }
        tracing::debug!(
            "linked `{}` -> {}",
            module.name(),
            module.base_path().display()
        );
        linked += 1;
    }

    Ok(linked)
}
