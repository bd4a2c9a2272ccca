//! Generated source file for the host application.
//!
//! One record is collected per resolved module and the template is rendered
//! once into `generated/gah-generated.ts`.

pub mod engine;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::ModuleNode;
use crate::util::fs::{read_to_string, write_string};

pub use engine::{Template, TemplateError};

/// File name of the rendered output inside the generated directory.
pub const GENERATED_FILE_NAME: &str = "gah-generated.ts";

/// Template used when no `install.template` is configured.
pub const DEFAULT_TEMPLATE: &str = r#"/*
 * This file is generated by gah. Changes are lost on the next install.
 */
{{#each modules}}
{{#if baseModuleName}}
import { {{baseModuleName}} } from '@{{packageName}}/{{name}}';
{{/if}}
{{/each}}

export interface GahModuleData {
  name: string;
  packageName: string;
  isEntry: boolean;
}

export const gahModules: GahModuleData[] = [
{{#each modules}}
  { name: '{{name}}', packageName: '{{packageName}}', isEntry: {{isEntry}} },
{{/each}}
];

export const gahBaseModules = [
{{#each modules}}
{{#if baseModuleName}}
  {{baseModuleName}},
{{/if}}
{{/each}}
];
"#;

/// Data exposed to the template for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleTemplateData {
    pub name: String,
    pub package_name: String,
    pub is_entry: bool,
    pub base_module_name: Option<String>,
}

impl From<&ModuleNode> for ModuleTemplateData {
    fn from(module: &ModuleNode) -> Self {
        ModuleTemplateData {
            name: module.name().to_string(),
            package_name: module.package_name().to_string(),
            is_entry: module.is_entry(),
            base_module_name: module.base_module_name().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    modules: &'a [ModuleTemplateData],
}

/// Collects module records and renders them in one pass.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    source: String,
    origin: Option<PathBuf>,
    records: Vec<ModuleTemplateData>,
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        TemplateGenerator::new(DEFAULT_TEMPLATE)
    }
}

impl TemplateGenerator {
    pub fn new(source: impl Into<String>) -> Self {
        TemplateGenerator {
            source: source.into(),
            origin: None,
            records: Vec::new(),
        }
    }

    /// Use the template file at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = read_to_string(path)?;
        Ok(TemplateGenerator {
            origin: Some(path.to_path_buf()),
            ..TemplateGenerator::new(source)
        })
    }

    pub fn add(&mut self, record: ModuleTemplateData) {
        self.records.push(record);
    }

    pub fn render(&self) -> Result<String, TemplateError> {
        let template = Template::parse(&self.source)?;
        let context = TemplateContext {
            modules: &self.records,
        };
        template.render_serialized(&context)
    }

    /// Render and write `gah-generated.ts` into `generated_dir`.
    pub fn write(&self, generated_dir: &Path) -> Result<PathBuf> {
        let rendered = self.render().with_context(|| match &self.origin {
            Some(path) => format!("failed to render template {}", path.display()),
            None => "failed to render the built-in template".to_string(),
        })?;
        write_output(generated_dir, &rendered)
    }
}

/// Write already rendered output as `gah-generated.ts` into `generated_dir`.
pub fn write_output(generated_dir: &Path, rendered: &str) -> Result<PathBuf> {
    let output = generated_dir.join(GENERATED_FILE_NAME);
    write_string(&output, rendered)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, base: Option<&str>, is_entry: bool) -> ModuleTemplateData {
        ModuleTemplateData {
            name: name.into(),
            package_name: "example".into(),
            is_entry,
            base_module_name: base.map(str::to_string),
        }
    }

    #[test]
    fn test_default_template_lists_modules() {
        let mut generator = TemplateGenerator::default();
        generator.add(record("core", Some("CoreModule"), false));
        generator.add(record("app", None, true));

        let out = generator.render().unwrap();

        assert!(out.contains("import { CoreModule } from '@example/core';"));
        assert!(out.contains("{ name: 'core', packageName: 'example', isEntry: false },"));
        assert!(out.contains("{ name: 'app', packageName: 'example', isEntry: true },"));
        assert!(out.contains("  CoreModule,\n];"));
        assert!(!out.contains("{{"));
        assert!(!out.contains("'@example/app'"));
    }

    #[test]
    fn test_custom_template_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.hbs");
        std::fs::write(&path, "{{#each modules}}{{name}}\n{{/each}}").unwrap();

        let mut generator = TemplateGenerator::from_file(&path).unwrap();
        generator.add(record("a", None, false));
        generator.add(record("b", None, false));
        let output = generator.write(&tmp.path().join("generated")).unwrap();

        assert_eq!(std::fs::read_to_string(output).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_broken_template_is_an_error() {
        let mut generator = TemplateGenerator::new("{{#each modules}}");
        generator.add(record("a", None, false));
        assert!(matches!(
            generator.render(),
            Err(TemplateError::Unclosed { .. })
        ));
    }
}
