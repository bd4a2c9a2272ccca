//! Merging module build configuration into the host.
//!
//! Every document follows the same discipline: load once, mutate in memory,
//! save once. Entries the host wrote itself are never overwritten.

pub mod gitignore;
pub mod package_json;
pub mod styles;
pub mod tsconfig;

pub use package_json::{apply_plugins, merge_module_dependencies, DependencyKind, MergeStats, PackageJson};
pub use styles::StyleSheet;
pub use tsconfig::{PathAlias, Provenance, TsConfig};
