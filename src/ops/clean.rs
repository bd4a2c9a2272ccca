//! Implementation of `gah clean`.

use anyhow::Result;

use crate::core::Workspace;
use crate::materialize::remove_layout;
use crate::merge::{StyleSheet, TsConfig};

/// What `gah clean` removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub aliases_removed: usize,
    pub styles_reset: bool,
}

/// Undo the generated parts of an install.
///
/// Removes the generated layout and the copied assets, strips generated
/// path aliases and resets the global stylesheet to its header. Entries the
/// host wrote itself are left alone.
pub fn clean(ws: &Workspace) -> Result<CleanReport> {
    remove_layout(ws)?;

    let mut report = CleanReport::default();

    let tsconfig_path = ws.tsconfig_path();
    if tsconfig_path.is_file() {
        let mut tsconfig = TsConfig::load(&tsconfig_path)?;
        report.aliases_removed = tsconfig.clean();
        tsconfig.save()?;
    }

    let styles = ws.styles_file();
    if styles.is_file() {
        StyleSheet::with_header().save(&styles)?;
        report.styles_reset = true;
    }

    tracing::info!(
        "removed generated files and {} path alias(es)",
        report.aliases_removed
    );
    Ok(report)
}
