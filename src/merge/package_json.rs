//! `package.json` dependency merging.
//!
//! Host entries always win: a module's dependency is copied only when the
//! host does not declare that package name yet. Plugins are the exception
//! and are always written into `devDependencies`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::{Map, Value};

use crate::core::manifest::{read_json, ManifestError};
use crate::util::config::PluginEntry;
use crate::util::fs::write_atomic;

/// Which dependency map of a package manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Dependencies,
    DevDependencies,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 2] =
        [DependencyKind::Dependencies, DependencyKind::DevDependencies];

    pub fn key(self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependencies",
            DependencyKind::DevDependencies => "devDependencies",
        }
    }
}

/// An in-memory `package.json`.
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    root: Map<String, Value>,
}

impl PackageJson {
    /// Load `package.json` from `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let value: Value = read_json(path)?;
        match value {
            Value::Object(root) => Ok(PackageJson {
                path: path.to_path_buf(),
                root,
            }),
            _ => Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Load `package.json` if the file exists.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>, ManifestError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A dependency map, if present and an object.
    pub fn section(&self, kind: DependencyKind) -> Option<&Map<String, Value>> {
        self.root.get(kind.key()).and_then(Value::as_object)
    }

    /// A dependency map, created empty if absent or malformed.
    pub fn section_mut(&mut self, kind: DependencyKind) -> &mut Map<String, Value> {
        let slot = self
            .root
            .entry(kind.key())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("dependency map was just normalized to an object"),
        }
    }

    /// Version declared for `name` in `kind`.
    pub fn version_of(&self, kind: DependencyKind, name: &str) -> Option<&str> {
        self.section(kind)
            .and_then(|s| s.get(name))
            .and_then(Value::as_str)
    }

    pub fn to_json_string(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.root)?;
        out.push('\n');
        Ok(out)
    }

    /// Write the document back to where it was loaded from.
    pub fn save(&self) -> Result<()> {
        write_atomic(&self.path, &self.to_json_string()?)
    }
}

/// Counters for one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Entries copied into the host
    pub added: usize,
    /// Entries skipped because the host already declares them
    pub kept: usize,
}

impl std::ops::AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.kept += other.kept;
    }
}

/// Copy the module's dependencies into `host` where the host has none.
///
/// The module's contribution is collected in full before `host` is touched.
pub fn merge_module_dependencies(host: &mut PackageJson, module: &PackageJson) -> MergeStats {
    let mut staged: Vec<(DependencyKind, String, Value)> = Vec::new();
    let mut stats = MergeStats::default();

    for kind in DependencyKind::ALL {
        let Some(section) = module.section(kind) else {
            continue;
        };
        for (name, version) in section {
            let declared = host.section(kind).is_some_and(|s| s.contains_key(name))
                || staged.iter().any(|(k, n, _)| *k == kind && n == name);
            if declared {
                stats.kept += 1;
            } else {
                staged.push((kind, name.clone(), version.clone()));
            }
        }
    }

    for (kind, name, version) in staged {
        host.section_mut(kind).insert(name, version);
        stats.added += 1;
    }

    stats
}

/// Force every plugin into the host's `devDependencies`.
pub fn apply_plugins(host: &mut PackageJson, plugins: &[PluginEntry]) {
    let dev = host.section_mut(DependencyKind::DevDependencies);
    for plugin in plugins {
        dev.insert(plugin.name.clone(), Value::String(plugin.version.clone()));
    }
}
