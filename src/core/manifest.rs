//! Host descriptor and module manifest parsing.
//!
//! Both files are JSON:
//!
//! ```json
//! // gah-host.json
//! { "modules": [{ "names": ["core"], "path": "./modules/core/gah-module.json" }] }
//!
//! // gah-module.json
//! {
//!   "modules": [{
//!     "name": "core",
//!     "packageName": "acme",
//!     "baseDir": ".",
//!     "facadePath": "facade",
//!     "publicApiPath": "src/public-api.ts",
//!     "baseNgModuleName": "CoreModule",
//!     "isEntry": false,
//!     "dependencies": [{ "names": ["shared"], "path": "../shared/gah-module.json" }]
//!   }]
//! }
//! ```
//!
//! Paths inside a file are relative to the directory that contains it,
//! except `facadePath` and `publicApiPath`, which are relative to the
//! module's base directory.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic, InvalidJsonError};
use crate::util::fs::normalize_path;
use crate::util::InternedString;

/// File name of the host descriptor.
pub const HOST_DESCRIPTOR_NAME: &str = "gah-host.json";

/// File name of a module manifest.
pub const MODULE_MANIFEST_NAME: &str = "gah-module.json";

/// Failure to locate or parse a descriptor, manifest or JSON config document.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `gah-host.json` in `{}` or any parent directory", .dir.display())]
    HostNotFound { dir: PathBuf },

    #[error("missing manifest: {}", .path.display())]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    InvalidJson(Box<InvalidJsonError>),

    #[error("expected a JSON object at the top level of {}", .path.display())]
    NotAnObject { path: PathBuf },
}

impl ManifestError {
    /// The file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ManifestError::HostNotFound { .. } => None,
            ManifestError::Missing { path, .. } | ManifestError::NotAnObject { path } => {
                Some(path.as_path())
            }
            ManifestError::InvalidJson(e) => Some(Path::new(&e.path)),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ManifestError::HostNotFound { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_HOST)
            }
            ManifestError::Missing { path, source } => {
                Diagnostic::error(format!("missing or unreadable manifest: {}", source))
                    .with_location(path)
                    .with_suggestion(suggestions::CHECK_DEPENDENCY_PATH)
            }
            ManifestError::InvalidJson(e) => Diagnostic::error("invalid manifest")
                .with_location(&e.path)
                .with_context(e.message.clone()),
            ManifestError::NotAnObject { path } => {
                Diagnostic::error("manifest is not a JSON object").with_location(path)
            }
        }
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Missing {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents)
        .map_err(|e| ManifestError::InvalidJson(Box::new(InvalidJsonError::new(path, contents, &e))))
}

/// A reference from a host or module to modules defined in another manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyRef {
    /// Module names this reference satisfies
    pub names: Vec<InternedString>,

    /// Path to the manifest, relative to the referencing file's directory
    pub path: PathBuf,
}

/// The parsed `gah-host.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct HostDescriptor {
    /// Top-level module references
    #[serde(default)]
    pub modules: Vec<DependencyRef>,

    #[serde(skip)]
    path: PathBuf,
}

impl HostDescriptor {
    /// Load the host descriptor at `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let mut host: HostDescriptor = read_json(path)?;
        host.path = path.to_path_buf();
        Ok(host)
    }

    /// Path of the descriptor file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the descriptor; module paths are relative to it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

/// A single module definition inside a `gah-module.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDef {
    pub name: InternedString,

    /// Package identifier, used as the scope of the module's path alias
    pub package_name: String,

    /// Module source root, relative to the manifest directory
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Public surface (assets, styles), relative to the base directory
    #[serde(default)]
    pub facade_path: Option<PathBuf>,

    /// Entry point of the module's public API, relative to the base directory
    #[serde(default)]
    pub public_api_path: Option<PathBuf>,

    /// Identifier of the module's base module class
    #[serde(default)]
    pub base_ng_module_name: Option<String>,

    /// Whether this is the application's bootstrap module
    #[serde(default)]
    pub is_entry: bool,

    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
}

impl ModuleDef {
    /// Absolute base path of the module declared in `manifest_dir`.
    ///
    /// Defaults to the manifest directory when `baseDir` is absent.
    pub fn base_path(&self, manifest_dir: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) => normalize_path(&manifest_dir.join(dir)),
            None => manifest_dir.to_path_buf(),
        }
    }
}

/// The parsed `gah-module.json`, which may define several modules.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    #[serde(default)]
    pub modules: Vec<ModuleDef>,

    #[serde(skip)]
    path: PathBuf,
}

impl ModuleManifest {
    /// Load the module manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let mut manifest: ModuleManifest = read_json(path)?;
        manifest.path = path.to_path_buf();
        Ok(manifest)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest; dependency paths are relative to it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Find a module definition by name.
    pub fn module(&self, name: InternedString) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Names of all modules defined in this manifest.
    pub fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_host_descriptor() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(HOST_DESCRIPTOR_NAME);
        std::fs::write(
            &path,
            r#"{
  "modules": [
    { "names": ["core", "shared"], "path": "../modules/gah-module.json" }
  ],
  "htmlHeadContent": "ignored"
}"#,
        )
        .unwrap();

        let host = HostDescriptor::load(&path).unwrap();
        assert_eq!(host.modules.len(), 1);
        assert_eq!(host.modules[0].names, vec![InternedString::new("core"), InternedString::new("shared")]);
        assert_eq!(host.modules[0].path, Path::new("../modules/gah-module.json"));
        assert_eq!(host.dir(), tmp.path());
    }

    #[test]
    fn test_parse_module_manifest_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MODULE_MANIFEST_NAME);
        std::fs::write(
            &path,
            r#"{ "modules": [{ "name": "core", "packageName": "acme" }] }"#,
        )
        .unwrap();

        let manifest = ModuleManifest::load(&path).unwrap();
        let core = manifest.module(InternedString::new("core")).unwrap();
        assert_eq!(core.package_name, "acme");
        assert!(!core.is_entry);
        assert!(core.facade_path.is_none());
        assert!(core.dependencies.is_empty());
        assert_eq!(core.base_path(tmp.path()), tmp.path());
        assert!(manifest.module(InternedString::new("other")).is_none());
    }

    #[test]
    fn test_base_dir_is_relative_to_manifest() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("module").join("src")).unwrap();
        let def: ModuleDef = serde_json::from_str(
            r#"{ "name": "core", "packageName": "acme", "baseDir": "./src" }"#,
        )
        .unwrap();

        let manifest_dir = tmp.path().join("module").canonicalize().unwrap();
        assert_eq!(def.base_path(&manifest_dir), manifest_dir.join("src"));
    }

    #[test]
    fn test_missing_manifest_names_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nowhere").join(MODULE_MANIFEST_NAME);

        let err = ModuleManifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Missing { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_invalid_manifest_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MODULE_MANIFEST_NAME);
        std::fs::write(&path, r#"{ "modules": [{ "packageName": "acme" }] }"#).unwrap();

        let err = ModuleManifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidJson(_)));
        assert!(err.to_string().contains("name"));
        let diag = err.to_diagnostic().format(false);
        assert!(diag.contains("invalid manifest"));
    }
}
