//! Global stylesheet generation.
//!
//! The host's `styles.scss` is owned by gah: it is rewritten from a fixed
//! header every install, followed by one `@import` per module that exposes
//! a facade stylesheet.

use std::path::Path;

use anyhow::Result;

use crate::core::{ModuleNode, Workspace};
use crate::resolver::Resolve;
use crate::util::fs::{relative_path, to_slash, write_string};

/// Header written at the top of every generated stylesheet.
pub const STYLES_HEADER: &str = "\
/*
  * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *
  *   Please do not edit this file. Any changes to this file will be overwriten by gah.   *
  *              Check the documentation for how to edit your global styles:              *
  *                        https://github.com/awdware/gah/wiki                        *
  * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *
*/";

/// File name of the style index in the generated styles directory.
pub const STYLE_INDEX_NAME: &str = "gah-modules.scss";

/// A stylesheet built in memory and written once.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    lines: Vec<String>,
}

impl StyleSheet {
    /// A stylesheet containing only the header.
    pub fn with_header() -> Self {
        StyleSheet {
            lines: STYLES_HEADER.lines().map(str::to_string).collect(),
        }
    }

    pub fn push_import(&mut self, path: &str) {
        self.lines.push(format!("@import \"{}\";", path));
    }

    /// The `@import` targets, in order.
    pub fn imports(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.strip_prefix("@import \"")?.strip_suffix("\";"))
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_string(path, &self.render())
    }
}

/// Import path of a module's facade stylesheet, seen from `from_dir`.
///
/// The path goes through the module's link in the dependency directory so
/// the build never reaches outside the host.
pub fn facade_import(ws: &Workspace, module: &ModuleNode, from_dir: &Path) -> Option<String> {
    module.facade_styles_file()?;
    let facade = module.facade_path()?;

    let target = ws
        .layout()
        .dependency_dir()
        .join(module.name().as_str())
        .join(facade)
        .join("styles.scss");
    Some(to_slash(&relative_path(from_dir, &target)))
}

/// Build the host's `styles.scss`: header plus one import per facade stylesheet.
pub fn host_stylesheet(ws: &Workspace, resolve: &Resolve) -> StyleSheet {
    let src = ws.src_dir();
    let mut sheet = StyleSheet::with_header();
    for module in resolve.modules() {
        if let Some(import) = facade_import(ws, module, &src) {
            tracing::debug!("importing styles of `{}`", module.name());
            sheet.push_import(&import);
        }
    }
    sheet
}

/// Build the style index written into the generated styles directory.
pub fn style_index(ws: &Workspace, resolve: &Resolve) -> StyleSheet {
    let styles_dir = ws.layout().styles_dir();
    let mut sheet = StyleSheet::with_header();
    for module in resolve.modules() {
        if let Some(import) = facade_import(ws, module, &styles_dir) {
            sheet.push_import(&import);
        }
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_header_then_imports() {
        let mut sheet = StyleSheet::with_header();
        sheet.push_import("app/.gah/dependencies/core/facade/styles.scss");

        let out = sheet.render();

        assert!(out.starts_with(STYLES_HEADER));
        assert!(out.contains("Please do not edit this file."));
        assert!(out.contains("https://github.com/awdware/gah/wiki"));
        assert!(out.ends_with("@import \"app/.gah/dependencies/core/facade/styles.scss\";\n"));
        assert_eq!(
            sheet.imports(),
            vec!["app/.gah/dependencies/core/facade/styles.scss"]
        );
    }

    #[test]
    fn test_header_only_has_no_imports() {
        assert!(StyleSheet::with_header().imports().is_empty());
    }
}
