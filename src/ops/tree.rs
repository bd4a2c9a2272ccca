//! Implementation of `gah tree`.

use std::collections::HashSet;
use std::fmt::Write;

use crate::core::ModuleId;
use crate::resolver::Resolve;

/// Options for rendering the module tree.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Maximum depth to print (unlimited when `None`)
    pub depth: Option<usize>,

    /// Expand modules every time they appear instead of marking repeats
    pub duplicates: bool,
}

/// Render the resolved module graph, one root per host reference.
///
/// Modules already printed are marked with `(*)` and not expanded again.
pub fn render_tree(resolve: &Resolve, opts: &TreeOptions) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();
    let max_depth = opts.depth.unwrap_or(usize::MAX);

    for &root in resolve.roots() {
        render_node(resolve, root, "", None, 0, max_depth, opts.duplicates, &mut seen, &mut out);
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn render_node(
    resolve: &Resolve,
    id: ModuleId,
    prefix: &str,
    last: Option<bool>,
    depth: usize,
    max_depth: usize,
    show_duplicates: bool,
    seen: &mut HashSet<ModuleId>,
    out: &mut String,
) {
    let module = resolve.module(id);
    let is_duplicate = !seen.insert(id);

    let branch = match last {
        None => "",
        Some(true) => "└── ",
        Some(false) => "├── ",
    };
    let entry = if module.is_entry() { " [entry]" } else { "" };
    let dup_marker = if is_duplicate && !show_duplicates {
        " (*)"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "{}{}{} ({}){}{}",
        prefix,
        branch,
        module.name(),
        module.alias(),
        entry,
        dup_marker
    );

    if (is_duplicate && !show_duplicates) || depth >= max_depth {
        return;
    }

    let child_prefix = match last {
        None => prefix.to_string(),
        Some(true) => format!("{}    ", prefix),
        Some(false) => format!("{}│   ", prefix),
    };
    let deps = module.dependencies();
    for (i, &dep) in deps.iter().enumerate() {
        let is_last = i + 1 == deps.len();
        render_node(
            resolve,
            dep,
            &child_prefix,
            Some(is_last),
            depth + 1,
            max_depth,
            show_duplicates,
            seen,
            out,
        );
    }
}
