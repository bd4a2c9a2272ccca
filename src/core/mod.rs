//! Core data structures for gah.
//!
//! - Host descriptor and module manifests
//! - Resolved module nodes
//! - The host workspace and its generated layout

pub mod manifest;
pub mod module;
pub mod workspace;

pub use manifest::{
    DependencyRef, HostDescriptor, ManifestError, ModuleDef, ModuleManifest,
    HOST_DESCRIPTOR_NAME, MODULE_MANIFEST_NAME,
};
pub use module::{ModuleId, ModuleNode};
pub use workspace::{GeneratedLayout, Workspace};
