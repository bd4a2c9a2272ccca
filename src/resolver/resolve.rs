//! Resolve - the immutable module graph produced by one resolution run.

use std::collections::{HashMap, HashSet};

use petgraph::graph::DiGraph;
use petgraph::Direction;

use crate::core::{ModuleId, ModuleNode};
use crate::util::InternedString;

/// The resolved module graph.
///
/// Nodes live in a single arena and are addressed by [`ModuleId`]; every
/// module name maps to exactly one node.
#[derive(Debug, Clone)]
pub struct Resolve {
    graph: DiGraph<ModuleNode, ()>,

    by_name: HashMap<InternedString, ModuleId>,

    /// Modules the host references directly, in declaration order
    roots: Vec<ModuleId>,

    /// Transitive closure of `roots`, first-discovered order
    order: Vec<ModuleId>,
}

impl Resolve {
    pub(crate) fn new(
        graph: DiGraph<ModuleNode, ()>,
        by_name: HashMap<InternedString, ModuleId>,
        roots: Vec<ModuleId>,
    ) -> Self {
        let mut resolve = Resolve {
            graph,
            by_name,
            roots,
            order: Vec::new(),
        };
        resolve.order = resolve.closure(&resolve.roots);
        resolve
    }

    /// Get a module by id.
    pub fn module(&self, id: ModuleId) -> &ModuleNode {
        &self.graph[id.0]
    }

    /// Get a module id by name.
    pub fn id_of(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(&InternedString::new(name)).copied()
    }

    /// Get a module by name.
    pub fn by_name(&self, name: &str) -> Option<&ModuleNode> {
        self.id_of(name).map(|id| self.module(id))
    }

    /// Modules the host references directly.
    pub fn roots(&self) -> &[ModuleId] {
        &self.roots
    }

    /// Every reachable module, deduplicated, in first-discovered order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> + '_ {
        self.order.iter().map(move |&id| self.module(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All modules `id` depends on, directly or transitively, deduplicated
    /// in first-discovered order.
    pub fn recursive_dependencies(&self, id: ModuleId) -> Vec<ModuleId> {
        self.closure(self.module(id).dependencies())
    }

    /// Modules that depend directly on `id`, in arena order.
    pub fn dependents(&self, id: ModuleId) -> Vec<ModuleId> {
        let mut dependents: Vec<ModuleId> = self
            .graph
            .neighbors_directed(id.0, Direction::Incoming)
            .map(ModuleId)
            .collect();
        dependents.sort();
        dependents
    }

    /// Pre-order walk over `start` and their dependencies, each module once.
    fn closure(&self, start: &[ModuleId]) -> Vec<ModuleId> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for &id in start {
            self.visit(id, &mut seen, &mut out);
        }
        out
    }

    fn visit(&self, id: ModuleId, seen: &mut HashSet<ModuleId>, out: &mut Vec<ModuleId>) {
        if !seen.insert(id) {
            return;
        }
        out.push(id);
        for &dep in self.module(id).dependencies() {
            self.visit(dep, seen, out);
        }
    }
}
