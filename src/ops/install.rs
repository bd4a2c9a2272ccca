//! Implementation of `gah install`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::{ManifestError, Workspace};
use crate::materialize::{clean_layout, copy_facade_assets, link_modules, LinkError};
use crate::merge::gitignore::ensure_line;
use crate::merge::styles::{host_stylesheet, style_index, STYLE_INDEX_NAME};
use crate::merge::tsconfig::add_module_aliases;
use crate::merge::{
    apply_plugins, merge_module_dependencies, MergeStats, PackageJson, StyleSheet, TsConfig,
};
use crate::ops::installer::PackageInstaller;
use crate::resolver::{resolve_host, Resolve, ResolveError};
use crate::template::{write_output, ModuleTemplateData, TemplateError, TemplateGenerator};
use crate::util::config::{Config, PluginEntry};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::to_slash;

/// Options for the install command.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Stop before running the external package manager
    pub skip_package_install: bool,
}

/// Whether the external package manager ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageInstallStatus {
    Skipped,
    Completed,
}

/// Summary of a completed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Modules in the resolved set
    pub modules: usize,
    /// Generated aliases stripped before relinking
    pub aliases_removed: usize,
    /// Generated aliases written
    pub aliases_added: usize,
    /// Asset files copied
    pub assets_copied: usize,
    pub dependencies: MergeStats,
    pub package_install: PackageInstallStatus,
    /// Rendered template output
    pub generated_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(InstallReport),
    /// The installer already ran once in this process.
    AlreadyInstalled,
}

/// Errors that abort an install.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to render the module template")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("package installation with `{program}` failed\n{stderr}")]
    PackageInstall { program: String, stderr: String },

    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for InstallError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<LinkError>() {
            Ok(e) => return InstallError::Link(e),
            Err(err) => err,
        };
        let err = match err.downcast::<TemplateError>() {
            Ok(e) => return InstallError::Template(e),
            Err(err) => err,
        };
        match err.downcast::<ManifestError>() {
            Ok(e) => InstallError::Manifest(e),
            Err(err) => InstallError::Other(err),
        }
    }
}

impl InstallError {
    /// Convert to a user-friendly diagnostic.
    ///
    /// Returns `None` for errors that render better on their own, such as
    /// invalid JSON with a labeled source span.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            InstallError::Resolve(ResolveError::Manifest(ManifestError::InvalidJson(_)))
            | InstallError::Manifest(ManifestError::InvalidJson(_))
            | InstallError::Other(_) => None,
            InstallError::Resolve(e) => Some(e.to_diagnostic()),
            InstallError::Manifest(e) => Some(e.to_diagnostic()),
            InstallError::Template(e) => {
                Some(Diagnostic::error("failed to render the module template").with_context(e.to_string()))
            }
            InstallError::Link(e) => Some(
                Diagnostic::error(e.to_string())
                    .with_context(e.source.to_string())
                    .with_suggestion(suggestions::RERUN_INSTALL),
            ),
            InstallError::PackageInstall { program, stderr } => {
                let mut diag = Diagnostic::error(format!("`{}` failed", program));
                for line in stderr.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    diag = diag.with_context(line.to_string());
                }
                Some(diag.with_suggestion(suggestions::RERUN_INSTALL))
            }
        }
    }
}

/// Runs the install pipeline for one host.
///
/// An `Installer` installs at most once; later calls return
/// [`InstallOutcome::AlreadyInstalled`].
pub struct Installer<'a> {
    ws: &'a Workspace,
    config: &'a Config,
    package_installer: &'a dyn PackageInstaller,
    options: InstallOptions,
    installed: bool,
}

impl<'a> Installer<'a> {
    pub fn new(
        ws: &'a Workspace,
        config: &'a Config,
        package_installer: &'a dyn PackageInstaller,
        options: InstallOptions,
    ) -> Self {
        Installer {
            ws,
            config,
            package_installer,
            options,
            installed: false,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn install(&mut self) -> Result<InstallOutcome, InstallError> {
        if self.installed {
            tracing::info!("modules are already installed");
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let ws = self.ws;
        let resolve = resolve_host(ws.descriptor())?;
        if resolve.is_empty() {
            tracing::warn!("{} declares no modules", ws.descriptor().path().display());
        }
        tracing::info!("resolved {} module(s)", resolve.len());

        // Every input is read and checked before the first write.
        let mut tsconfig = TsConfig::load(&ws.tsconfig_path())?;
        let mut host_package = PackageJson::load(&ws.package_json_path())?;
        let module_packages = load_module_packages(&resolve)?;
        let rendered = self.render_template(&resolve)?;

        let aliases_removed = tsconfig.clean();
        clean_layout(ws)?;
        StyleSheet::with_header().save(&ws.styles_file())?;

        let linked = link_modules(ws, &resolve)?;
        tracing::info!("linked {} module(s)", linked);

        let aliases_added = add_module_aliases(ws, &resolve, &mut tsconfig);
        tsconfig.save()?;

        let generated_file = write_output(&ws.layout().generated_dir(), &rendered)?;
        tracing::debug!("generated {}", generated_file.display());

        let assets_copied = copy_facade_assets(ws, &resolve)?;
        host_stylesheet(ws, &resolve).save(&ws.styles_file())?;

        let dependencies =
            merge_package_manifests(&mut host_package, &module_packages, &self.config.plugins);
        host_package.save()?;
        tracing::info!(
            "merged package dependencies ({} added, {} kept from host)",
            dependencies.added,
            dependencies.kept
        );

        style_index(ws, &resolve).save(&ws.layout().styles_dir().join(STYLE_INDEX_NAME))?;

        let base_dir = ws.base_dir();
        ensure_line(
            &base_dir,
            &format!("{}/**", to_slash(&ws.generated_root_from_base())),
            "Ignoring gah generated files",
        )?;
        ensure_line(
            &base_dir,
            &format!("{}/**", to_slash(&ws.assets_dir_from_base())),
            "Ignoring gah generated assets",
        )?;

        self.installed = true;

        let package_install = if self.skip_package_install() {
            tracing::info!("skipping package installation");
            PackageInstallStatus::Skipped
        } else {
            tracing::info!("installing packages");
            let report = self.package_installer.install(&base_dir)?;
            if !report.success {
                tracing::error!("package installation failed");
                return Err(InstallError::PackageInstall {
                    program: self.config.package_manager().to_string(),
                    stderr: report.error_output,
                });
            }
            PackageInstallStatus::Completed
        };

        Ok(InstallOutcome::Installed(InstallReport {
            modules: resolve.len(),
            aliases_removed,
            aliases_added,
            assets_copied,
            dependencies,
            package_install,
            generated_file,
        }))
    }

    fn skip_package_install(&self) -> bool {
        self.options.skip_package_install || self.config.install.skip_package_install
    }

    fn template_generator(&self) -> Result<TemplateGenerator> {
        match &self.config.install.template {
            Some(path) => TemplateGenerator::from_file(&self.ws.host_dir().join(path)),
            None => Ok(TemplateGenerator::default()),
        }
    }

    fn render_template(&self, resolve: &Resolve) -> Result<String, InstallError> {
        let mut generator = self.template_generator()?;
        for module in resolve.modules() {
            generator.add(ModuleTemplateData::from(module));
        }
        Ok(generator.render()?)
    }
}

/// Parse the `package.json` of every resolved module, in resolution order.
///
/// Modules without one are skipped.
fn load_module_packages(resolve: &Resolve) -> Result<Vec<PackageJson>, InstallError> {
    let mut packages = Vec::new();
    for module in resolve.modules() {
        match PackageJson::load_if_exists(&module.package_json_path())? {
            Some(package) => packages.push(package),
            None => tracing::debug!("`{}` has no package.json", module.name()),
        }
    }
    Ok(packages)
}

/// Merge module dependencies and plugins into the host's `package.json`.
fn merge_package_manifests(
    host: &mut PackageJson,
    modules: &[PackageJson],
    plugins: &[PluginEntry],
) -> MergeStats {
    let mut stats = MergeStats::default();
    for package in modules {
        stats += merge_module_dependencies(host, package);
    }
    apply_plugins(host, plugins);
    stats
}
