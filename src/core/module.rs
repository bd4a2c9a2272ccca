//! Module - a resolved node of the dependency graph.

use std::fmt;
use std::path::{Path, PathBuf};

use petgraph::graph::NodeIndex;

use crate::core::manifest::ModuleDef;
use crate::util::InternedString;

/// Index of a module in the resolution arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) NodeIndex);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.index())
    }
}

/// A module definition resolved against its location on disk.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    name: InternedString,
    package_name: String,

    /// Absolute source root: `baseDir`, or the manifest's directory
    base_path: PathBuf,

    /// Absolute path of the manifest the module was read from
    manifest_path: PathBuf,

    facade_path: Option<PathBuf>,
    public_api_path: Option<PathBuf>,
    base_module_name: Option<String>,
    is_entry: bool,

    /// Direct dependencies, in declaration order
    dependencies: Vec<ModuleId>,
}

impl ModuleNode {
    /// Create a node from a manifest definition.
    ///
    /// `manifest_path` must be absolute; `baseDir` is resolved against its
    /// directory.
    pub fn new(def: &ModuleDef, manifest_path: &Path, dependencies: Vec<ModuleId>) -> Self {
        let base_path = def.base_path(manifest_path.parent().unwrap_or(Path::new(".")));

        ModuleNode {
            name: def.name,
            package_name: def.package_name.clone(),
            base_path,
            manifest_path: manifest_path.to_path_buf(),
            facade_path: def.facade_path.clone(),
            public_api_path: def.public_api_path.clone(),
            base_module_name: def.base_ng_module_name.clone(),
            is_entry: def.is_entry,
            dependencies,
        }
    }

    pub fn name(&self) -> InternedString {
        self.name
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn is_entry(&self) -> bool {
        self.is_entry
    }

    pub fn base_module_name(&self) -> Option<&str> {
        self.base_module_name.as_deref()
    }

    /// Facade path relative to the base path.
    pub fn facade_path(&self) -> Option<&Path> {
        self.facade_path.as_deref()
    }

    /// Public API entry relative to the base path.
    pub fn public_api_path(&self) -> Option<&Path> {
        self.public_api_path.as_deref()
    }

    pub fn dependencies(&self) -> &[ModuleId] {
        &self.dependencies
    }

    /// Absolute facade directory.
    pub fn facade_dir(&self) -> Option<PathBuf> {
        self.facade_path.as_ref().map(|f| self.base_path.join(f))
    }

    /// The facade's `assets` folder, if the module exposes one.
    pub fn facade_assets_dir(&self) -> Option<PathBuf> {
        self.facade_dir()
            .map(|f| f.join("assets"))
            .filter(|p| p.is_dir())
    }

    /// The facade's `styles.scss`, if the module exposes one.
    pub fn facade_styles_file(&self) -> Option<PathBuf> {
        self.facade_dir()
            .map(|f| f.join("styles.scss"))
            .filter(|p| p.is_file())
    }

    /// The module's own `package.json`.
    pub fn package_json_path(&self) -> PathBuf {
        self.base_path.join("package.json")
    }

    /// Path alias under which the host imports this module.
    pub fn alias(&self) -> String {
        format!("@{}/{}", self.package_name, self.name)
    }
}
