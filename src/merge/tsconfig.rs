//! Compiler path aliases in `tsconfig.json`.
//!
//! Aliases written by gah carry a trailing marker entry on disk:
//!
//! ```json
//! "@acme/core": ["src/app/.gah/dependencies/core", "[gah] This property was generated by gah"]
//! ```
//!
//! In memory the marker is lifted into [`Provenance`], so cleaning is a
//! filter on a typed field and the marker never leaks into target lists.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::{Map, Value};

use crate::core::manifest::{read_json, ManifestError};
use crate::core::Workspace;
use crate::resolver::Resolve;
use crate::util::fs::{clean_path, relative_path, to_slash, write_atomic};

/// Prefix identifying a generated entry.
pub const MARKER_PREFIX: &str = "[gah]";

/// Marker entry appended to every generated alias.
pub const GENERATED_MARKER: &str = "[gah] This property was generated by gah";

/// Base URL set when the host has none.
pub const DEFAULT_BASE_URL: &str = "./";

/// Who wrote a config entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Generated,
    UserAuthored,
}

/// One `compilerOptions.paths` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    pub alias: String,
    pub targets: Vec<String>,
    pub provenance: Provenance,
}

impl PathAlias {
    fn from_json(alias: &str, value: &Value) -> Self {
        let entries: Vec<String> = match value {
            Value::Array(items) => items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Value::String(s) => vec![s.clone()],
            other => vec![other.to_string()],
        };

        let generated = entries.iter().any(|e| e.starts_with(MARKER_PREFIX));
        let targets = entries
            .into_iter()
            .filter(|e| !e.starts_with(MARKER_PREFIX))
            .collect();

        PathAlias {
            alias: alias.to_string(),
            targets,
            provenance: if generated {
                Provenance::Generated
            } else {
                Provenance::UserAuthored
            },
        }
    }

    fn to_json(&self) -> Value {
        let mut entries: Vec<Value> = self.targets.iter().cloned().map(Value::String).collect();
        if self.provenance == Provenance::Generated {
            entries.push(Value::String(GENERATED_MARKER.to_string()));
        }
        Value::Array(entries)
    }
}

/// Outcome of adding a generated alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasOutcome {
    Added,
    /// A user-authored alias of the same name exists and was kept
    KeptUserAlias,
}

/// An in-memory `tsconfig.json`.
#[derive(Debug, Clone)]
pub struct TsConfig {
    path: PathBuf,

    /// Whole document; `compilerOptions.paths` is rewritten from `aliases` on save
    root: Map<String, Value>,

    aliases: Vec<PathAlias>,
}

impl TsConfig {
    /// Load `tsconfig.json` from `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let value: Value = read_json(path)?;
        let Value::Object(root) = value else {
            return Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        let aliases = root
            .get("compilerOptions")
            .and_then(|c| c.get("paths"))
            .and_then(Value::as_object)
            .map(|paths| {
                paths
                    .iter()
                    .map(|(alias, value)| PathAlias::from_json(alias, value))
                    .collect()
            })
            .unwrap_or_default();

        Ok(TsConfig {
            path: path.to_path_buf(),
            root,
            aliases,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn aliases(&self) -> &[PathAlias] {
        &self.aliases
    }

    pub fn alias(&self, name: &str) -> Option<&PathAlias> {
        self.aliases.iter().find(|a| a.alias == name)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.root
            .get("compilerOptions")
            .and_then(|c| c.get("baseUrl"))
            .and_then(Value::as_str)
    }

    /// Drop every generated alias and normalize the document shape.
    ///
    /// Creates `compilerOptions` and `compilerOptions.paths` if absent and
    /// sets `baseUrl` to `./` if unset. Returns the number of aliases removed.
    pub fn clean(&mut self) -> usize {
        let before = self.aliases.len();
        self.aliases
            .retain(|a| a.provenance == Provenance::UserAuthored);

        let options = self.compiler_options_mut();
        if !options.get("paths").is_some_and(Value::is_object) {
            options.insert("paths".to_string(), Value::Object(Map::new()));
        }
        if options.get("baseUrl").and_then(Value::as_str).is_none() {
            options.insert(
                "baseUrl".to_string(),
                Value::String(DEFAULT_BASE_URL.to_string()),
            );
        }

        before - self.aliases.len()
    }

    /// Add (or replace) a generated alias.
    ///
    /// A user-authored alias with the same name always wins.
    pub fn add_generated_alias(&mut self, alias: &str, target: String) -> AliasOutcome {
        let generated = PathAlias {
            alias: alias.to_string(),
            targets: vec![target],
            provenance: Provenance::Generated,
        };

        match self.aliases.iter_mut().find(|a| a.alias == alias) {
            Some(existing) if existing.provenance == Provenance::UserAuthored => {
                AliasOutcome::KeptUserAlias
            }
            Some(existing) => {
                *existing = generated;
                AliasOutcome::Added
            }
            None => {
                self.aliases.push(generated);
                AliasOutcome::Added
            }
        }
    }

    /// Serialize the document, with aliases written back in order.
    pub fn to_json_string(&self) -> Result<String> {
        let mut root = self.root.clone();
        let paths: Map<String, Value> = self
            .aliases
            .iter()
            .map(|a| (a.alias.clone(), a.to_json()))
            .collect();

        let options = root
            .entry("compilerOptions")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(options) = options {
            options.insert("paths".to_string(), Value::Object(paths));
        }

        let mut out = serde_json::to_string_pretty(&Value::Object(root))?;
        out.push('\n');
        Ok(out)
    }

    /// Write the document back to where it was loaded from.
    pub fn save(&self) -> Result<()> {
        write_atomic(&self.path, &self.to_json_string()?)
    }

    fn compiler_options_mut(&mut self) -> &mut Map<String, Value> {
        let options = self
            .root
            .entry("compilerOptions")
            .or_insert_with(|| Value::Object(Map::new()));
        if !options.is_object() {
            *options = Value::Object(Map::new());
        }
        match options {
            Value::Object(map) => map,
            _ => unreachable!("compilerOptions was just normalized to an object"),
        }
    }
}

/// Directory the host's aliases are resolved against.
///
/// `baseUrl` may climb out of the base directory (`"../"`), so the joined
/// path is cleaned before targets are made relative to it.
fn alias_root(ws: &Workspace, tsconfig: &TsConfig) -> PathBuf {
    let base_url = tsconfig.base_url().unwrap_or(DEFAULT_BASE_URL);
    clean_path(&ws.base_dir().join(base_url))
}

/// Add one generated alias per resolved module.
///
/// Returns the number of aliases written.
pub fn add_module_aliases(ws: &Workspace, resolve: &Resolve, tsconfig: &mut TsConfig) -> usize {
    let root = alias_root(ws, tsconfig);
    let dependency_dir = ws.layout().dependency_dir();

    let mut added = 0;
    for module in resolve.modules() {
        let mut target = dependency_dir.join(module.name().as_str());
        if let Some(api) = module.public_api_path() {
            target = target.join(api);
        }
        let target = to_slash(&relative_path(&root, &target));
        let alias = module.alias();

        match tsconfig.add_generated_alias(&alias, target) {
            AliasOutcome::Added => added += 1,
            AliasOutcome::KeptUserAlias => {
                tracing::warn!(
                    "keeping user-defined path alias `{}`; not linking module `{}`",
                    alias,
                    module.name()
                );
            }
        }
    }
    added
}
