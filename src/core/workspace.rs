//! Workspace - the host and the folder layout gah owns inside it.
//!
//! ```text
//! <host>/
//!   gah-host.json
//!   .gah/                       base directory
//!     package.json
//!     tsconfig.json
//!     .gitignore
//!     config.toml
//!     src/
//!       styles.scss             regenerated every install
//!       assets/<module>/        copied facade assets
//!       app/.gah/               generated layout, fully owned
//!         dependencies/<module> -> module base path
//!         generated/
//!         styles/
//! ```

use std::path::{Path, PathBuf};

use crate::core::manifest::{HostDescriptor, ManifestError, HOST_DESCRIPTOR_NAME};
use crate::util::config::project_config_path;
use crate::util::fs::{normalize_path, relative_path};

/// Name of the host's base directory.
pub const BASE_DIR_NAME: &str = ".gah";

/// Source root, relative to the base directory.
pub const SRC_DIR: &str = "src";

/// Generated layout root, relative to the source root.
pub const GENERATED_ROOT: &str = "app/.gah";

/// The generated folder tree under the host's source root.
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    root: PathBuf,
}

impl GeneratedLayout {
    pub fn new(root: PathBuf) -> Self {
        GeneratedLayout { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one link per resolved module.
    pub fn dependency_dir(&self) -> PathBuf {
        self.root.join("dependencies")
    }

    /// Directory holding template output.
    pub fn generated_dir(&self) -> PathBuf {
        self.root.join("generated")
    }

    /// Directory holding generated stylesheets.
    pub fn styles_dir(&self) -> PathBuf {
        self.root.join("styles")
    }

    /// All owned directories, in clean order.
    pub fn owned_dirs(&self) -> [PathBuf; 3] {
        [self.dependency_dir(), self.generated_dir(), self.styles_dir()]
    }
}

/// A host workspace: the parsed descriptor plus all derived paths.
#[derive(Debug)]
pub struct Workspace {
    descriptor: HostDescriptor,

    /// Absolute host directory
    host_dir: PathBuf,

    layout: GeneratedLayout,
}

impl Workspace {
    /// Load the workspace from a host descriptor path.
    pub fn new(descriptor_path: &Path) -> Result<Self, ManifestError> {
        let descriptor_path = normalize_path(descriptor_path);
        let descriptor = HostDescriptor::load(&descriptor_path)?;
        let host_dir = descriptor.dir().to_path_buf();

        let layout = GeneratedLayout::new(
            host_dir
                .join(BASE_DIR_NAME)
                .join(SRC_DIR)
                .join(GENERATED_ROOT),
        );

        Ok(Workspace {
            descriptor,
            host_dir,
            layout,
        })
    }

    /// Locate `gah-host.json` in `start` or any parent directory.
    pub fn find_descriptor(start: &Path) -> Result<PathBuf, ManifestError> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(HOST_DESCRIPTOR_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ManifestError::HostNotFound {
                    dir: start.to_path_buf(),
                });
            }
        }
    }

    pub fn descriptor(&self) -> &HostDescriptor {
        &self.descriptor
    }

    pub fn host_dir(&self) -> &Path {
        &self.host_dir
    }

    /// The host's base directory (`<host>/.gah`).
    pub fn base_dir(&self) -> PathBuf {
        self.host_dir.join(BASE_DIR_NAME)
    }

    /// The host's source root (`<base>/src`).
    pub fn src_dir(&self) -> PathBuf {
        self.base_dir().join(SRC_DIR)
    }

    pub fn layout(&self) -> &GeneratedLayout {
        &self.layout
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.src_dir().join("assets")
    }

    pub fn styles_file(&self) -> PathBuf {
        self.src_dir().join("styles.scss")
    }

    pub fn tsconfig_path(&self) -> PathBuf {
        self.base_dir().join("tsconfig.json")
    }

    pub fn package_json_path(&self) -> PathBuf {
        self.base_dir().join("package.json")
    }

    pub fn config_path(&self) -> PathBuf {
        project_config_path(&self.host_dir)
    }

    /// The dependency directory relative to the base directory.
    pub fn dependency_dir_from_base(&self) -> PathBuf {
        relative_path(&self.base_dir(), &self.layout.dependency_dir())
    }

    /// The dependency directory relative to the source root.
    pub fn dependency_dir_from_src(&self) -> PathBuf {
        relative_path(&self.src_dir(), &self.layout.dependency_dir())
    }

    /// The generated layout root relative to the base directory.
    pub fn generated_root_from_base(&self) -> PathBuf {
        relative_path(&self.base_dir(), self.layout.root())
    }

    /// The assets directory relative to the base directory.
    pub fn assets_dir_from_base(&self) -> PathBuf {
        relative_path(&self.base_dir(), &self.assets_dir())
    }
}
