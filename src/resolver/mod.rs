//! Dependency graph builder.
//!
//! Resolution is purely by module name and manifest path: a module name seen
//! once is never resolved again, no matter how many references lead to it.
//! The [`ResolveContext`] owns every node created during one run and hands
//! out [`ModuleId`]s, so two references to the same name always yield the
//! same node.

pub mod errors;
pub mod resolve;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use petgraph::graph::DiGraph;

use crate::core::{DependencyRef, HostDescriptor, ManifestError, ModuleId, ModuleManifest, ModuleNode};
use crate::util::InternedString;

pub use errors::ResolveError;
pub use resolve::Resolve;

/// Mutable state for one resolution run.
#[derive(Debug, Default)]
pub struct ResolveContext {
    graph: DiGraph<ModuleNode, ()>,

    by_name: HashMap<InternedString, ModuleId>,

    /// Parsed manifests by canonical path; each file is read at most once
    manifests: HashMap<PathBuf, Rc<ModuleManifest>>,

    /// Names whose resolution has started but not finished
    in_progress: Vec<InternedString>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an already-resolved module.
    pub fn get(&self, name: InternedString) -> Option<ModuleId> {
        self.by_name.get(&name).copied()
    }

    /// Resolve module `name` defined in the manifest at `manifest_path`.
    ///
    /// Returns the existing node if `name` was already resolved in this run.
    pub fn resolve_module(
        &mut self,
        manifest_path: &Path,
        name: InternedString,
    ) -> Result<ModuleId, ResolveError> {
        if let Some(id) = self.get(name) {
            tracing::trace!("reusing module `{}`", name);
            return Ok(id);
        }

        if let Some(pos) = self.in_progress.iter().position(|n| *n == name) {
            let mut chain: Vec<String> =
                self.in_progress[pos..].iter().map(|n| n.to_string()).collect();
            chain.push(name.to_string());
            return Err(ResolveError::CircularDependency { chain });
        }

        let manifest = self.load_manifest(manifest_path)?;
        let def = manifest
            .module(name)
            .ok_or_else(|| ResolveError::ModuleNotFound {
                name: name.to_string(),
                manifest: manifest.path().to_path_buf(),
                available: manifest.module_names(),
            })?;

        let base_path = def.base_path(manifest.dir());
        if !base_path.is_dir() {
            return Err(ResolveError::MissingBaseDir {
                name: name.to_string(),
                path: base_path,
            });
        }

        tracing::debug!(
            "resolving module `{}` from {}",
            name,
            manifest.path().display()
        );

        self.in_progress.push(name);
        let deps = self.resolve_refs(manifest.dir(), &def.dependencies);
        self.in_progress.pop();
        let deps = deps?;

        let node = ModuleNode::new(def, manifest.path(), deps.clone());
        let id = ModuleId(self.graph.add_node(node));
        for dep in deps {
            self.graph.add_edge(id.0, dep.0, ());
        }
        self.by_name.insert(name, id);

        Ok(id)
    }

    /// Resolve every name of every reference, relative to `base_dir`.
    ///
    /// The result is in declaration order with duplicates removed.
    pub fn resolve_refs(
        &mut self,
        base_dir: &Path,
        refs: &[DependencyRef],
    ) -> Result<Vec<ModuleId>, ResolveError> {
        let mut ids = Vec::new();
        for dep_ref in refs {
            let manifest_path = base_dir.join(&dep_ref.path);
            for &name in &dep_ref.names {
                let id = self.resolve_module(&manifest_path, name)?;
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// Finish the run, with `roots` as the host's direct dependencies.
    pub fn into_resolve(self, roots: Vec<ModuleId>) -> Resolve {
        Resolve::new(self.graph, self.by_name, roots)
    }

    fn load_manifest(&mut self, path: &Path) -> Result<Rc<ModuleManifest>, ResolveError> {
        let canonical = path.canonicalize().map_err(|source| ManifestError::Missing {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(manifest) = self.manifests.get(&canonical) {
            return Ok(Rc::clone(manifest));
        }

        let manifest = Rc::new(ModuleManifest::load(&canonical)?);
        self.manifests.insert(canonical, Rc::clone(&manifest));
        Ok(manifest)
    }
}

/// Resolve the full module graph of a host.
pub fn resolve_host(host: &HostDescriptor) -> Result<Resolve, ResolveError> {
    let mut ctx = ResolveContext::new();
    let roots = ctx.resolve_refs(host.dir(), &host.modules)?;
    let resolve = ctx.into_resolve(roots);

    tracing::debug!("resolved {} module(s)", resolve.len());
    Ok(resolve)
}
