//! Facade asset copying.

use anyhow::{Context, Result};

use crate::core::Workspace;
use crate::resolver::Resolve;
use crate::util::fs::copy_dir_all;

/// Copy each module's facade `assets` folder into `<src>/assets/<module>`.
///
/// Returns the number of files copied across all modules.
pub fn copy_facade_assets(ws: &Workspace, resolve: &Resolve) -> Result<usize> {
    let assets_dir = ws.assets_dir();
    let mut copied = 0;

    for module in resolve.modules() {
        let Some(src) = module.facade_assets_dir() else {
            continue;
        };
        let dst = assets_dir.join(module.name().as_str());
        let n = copy_dir_all(&src, &dst)
            .with_context(|| format!("failed to copy assets of module `{}`", module.name()))?;
        tracing::debug!("copied {} asset(s) of `{}`", n, module.name());
        copied += n;
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_host;
    use crate::test_support::{ModuleFixture, TestHost};

    #[test]
    fn test_copies_only_modules_with_assets() {
        let host = TestHost::new();
        host
            .module(
                ModuleFixture::new("core", "example")
                    .facade("src/facade")
                    .asset("img/logo.svg", "<svg/>"),
            )
            .module(ModuleFixture::new("plain", "example").facade("src/facade"));
        host.write_descriptor(&[("core", "core"), ("plain", "plain")]);
        let ws = host.workspace();
        let resolve = resolve_host(ws.descriptor()).unwrap();

        let copied = copy_facade_assets(&ws, &resolve).unwrap();

        assert_eq!(copied, 1);
        let logo = ws.assets_dir().join("core/img/logo.svg");
        assert_eq!(std::fs::read_to_string(logo).unwrap(), "<svg/>");
        assert!(!ws.assets_dir().join("plain").exists());
        assert!(!std::fs::symlink_metadata(ws.assets_dir().join("core"))
            .unwrap()
            .file_type()
            .is_symlink());
    }
}
