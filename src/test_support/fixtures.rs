//! Test fixtures for common test scenarios.
//!
//! A [`TestHost`] is a temporary host directory with a `.gah` base folder.
//! Modules are written below `<host>/modules/<name>` from [`ModuleFixture`]s.

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use crate::core::{HostDescriptor, Workspace, HOST_DESCRIPTOR_NAME, MODULE_MANIFEST_NAME};

/// Default `tsconfig.json` written into every test host.
pub const DEFAULT_TSCONFIG: &str = r#"{ "compilerOptions": { "baseUrl": "./" } }"#;

/// Default `package.json` written into every test host.
pub const DEFAULT_PACKAGE_JSON: &str = r#"{ "name": "host" }"#;

/// Fixture for a single module directory.
#[derive(Debug, Clone)]
pub struct ModuleFixture {
    pub name: String,
    pub package_name: String,
    pub dependencies: Vec<String>,
    /// `baseDir`; facade files and `package.json` are written below it
    pub base_dir: Option<String>,
    pub facade: Option<String>,
    pub public_api: Option<String>,
    pub base_module: Option<String>,
    pub is_entry: bool,
    /// Facade `styles.scss` contents
    pub styles: Option<String>,
    /// Facade assets (path relative to `assets/` -> content)
    pub assets: Vec<(PathBuf, String)>,
    /// Raw `package.json` contents
    pub package_json: Option<String>,
}

impl ModuleFixture {
    pub fn new(name: impl Into<String>, package_name: impl Into<String>) -> Self {
        ModuleFixture {
            name: name.into(),
            package_name: package_name.into(),
            dependencies: Vec::new(),
            base_dir: None,
            facade: None,
            public_api: None,
            base_module: None,
            is_entry: false,
            styles: None,
            assets: Vec::new(),
            package_json: None,
        }
    }

    /// Depend on the module `name`, defined in `modules/<name>`.
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    pub fn base_dir(mut self, path: impl Into<String>) -> Self {
        self.base_dir = Some(path.into());
        self
    }

    pub fn facade(mut self, path: impl Into<String>) -> Self {
        self.facade = Some(path.into());
        self
    }

    pub fn public_api(mut self, path: impl Into<String>) -> Self {
        self.public_api = Some(path.into());
        self
    }

    pub fn base_module(mut self, name: impl Into<String>) -> Self {
        self.base_module = Some(name.into());
        self
    }

    pub fn entry(mut self) -> Self {
        self.is_entry = true;
        self
    }

    /// Facade stylesheet; implies a `src/facade` facade if none is set.
    pub fn styles(mut self, contents: impl Into<String>) -> Self {
        self.facade.get_or_insert_with(|| "src/facade".to_string());
        self.styles = Some(contents.into());
        self
    }

    /// Facade asset; implies a `src/facade` facade if none is set.
    pub fn asset(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.facade.get_or_insert_with(|| "src/facade".to_string());
        self.assets.push((path.into(), contents.into()));
        self
    }

    pub fn package_json(mut self, contents: impl Into<String>) -> Self {
        self.package_json = Some(contents.into());
        self
    }

    /// The `gah-module.json` document for this fixture.
    pub fn manifest(&self) -> serde_json::Value {
        let mut module = json!({
            "name": self.name,
            "packageName": self.package_name,
            "isEntry": self.is_entry,
            "dependencies": self.dependencies.iter().map(|dep| json!({
                "names": [dep],
                "path": format!("../{}/{}", dep, MODULE_MANIFEST_NAME),
            })).collect::<Vec<_>>(),
        });
        if let Some(base_dir) = &self.base_dir {
            module["baseDir"] = json!(base_dir);
        }
        if let Some(facade) = &self.facade {
            module["facadePath"] = json!(facade);
        }
        if let Some(api) = &self.public_api {
            module["publicApiPath"] = json!(api);
        }
        if let Some(base) = &self.base_module {
            module["baseNgModuleName"] = json!(base);
        }
        json!({ "modules": [module] })
    }

    /// Write the module below `modules_root/<name>` and return its directory.
    pub fn write_to(&self, modules_root: &Path) -> std::io::Result<PathBuf> {
        let dir = modules_root.join(&self.name);
        std::fs::create_dir_all(&dir)?;

        let manifest = serde_json::to_string_pretty(&self.manifest())?;
        std::fs::write(dir.join(MODULE_MANIFEST_NAME), manifest)?;

        let base = match &self.base_dir {
            Some(base_dir) => dir.join(base_dir),
            None => dir.clone(),
        };
        std::fs::create_dir_all(&base)?;

        if let Some(facade) = &self.facade {
            let facade_dir = base.join(facade);
            std::fs::create_dir_all(&facade_dir)?;
            if let Some(styles) = &self.styles {
                std::fs::write(facade_dir.join("styles.scss"), styles)?;
            }
            for (path, contents) in &self.assets {
                let target = facade_dir.join("assets").join(path);
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(target, contents)?;
            }
        }

        if let Some(package_json) = &self.package_json {
            std::fs::write(base.join("package.json"), package_json)?;
        }

        Ok(dir)
    }
}

/// A temporary host directory.
pub struct TestHost {
    dir: TempDir,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    /// Create a host with a `.gah` base folder holding default config files.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join(".gah");
        std::fs::create_dir_all(base.join("src")).unwrap();
        std::fs::write(base.join("tsconfig.json"), DEFAULT_TSCONFIG).unwrap();
        std::fs::write(base.join("package.json"), DEFAULT_PACKAGE_JSON).unwrap();
        TestHost { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn base_dir(&self) -> PathBuf {
        self.root().join(".gah")
    }

    pub fn module(&self, fixture: ModuleFixture) -> &Self {
        fixture.write_to(&self.root().join("modules")).unwrap();
        self
    }

    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.root().join("modules").join(name)
    }

    /// Write `gah-host.json` referencing `(directory, module name)` pairs.
    pub fn write_descriptor(&self, modules: &[(&str, &str)]) {
        let refs: Vec<_> = modules
            .iter()
            .map(|(dir, name)| {
                json!({
                    "names": [name],
                    "path": format!("./modules/{}/{}", dir, MODULE_MANIFEST_NAME),
                })
            })
            .collect();
        let json = serde_json::to_string_pretty(&json!({ "modules": refs })).unwrap();
        self.write_descriptor_raw(&json);
    }

    pub fn write_descriptor_raw(&self, json: &str) {
        std::fs::write(self.descriptor_path(), json).unwrap();
    }

    /// Write a hand-written manifest to `modules/<dir>/gah-module.json`.
    pub fn write_multi_manifest(&self, dir: &str, json: &str) {
        let dir = self.module_dir(dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MODULE_MANIFEST_NAME), json).unwrap();
    }

    pub fn write_host_package_json(&self, json: &str) {
        std::fs::write(self.base_dir().join("package.json"), json).unwrap();
    }

    pub fn write_tsconfig(&self, json: &str) {
        std::fs::write(self.base_dir().join("tsconfig.json"), json).unwrap();
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root().join(HOST_DESCRIPTOR_NAME)
    }

    pub fn descriptor(&self) -> HostDescriptor {
        HostDescriptor::load(&self.descriptor_path()).unwrap()
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(&self.descriptor_path()).unwrap()
    }
}
