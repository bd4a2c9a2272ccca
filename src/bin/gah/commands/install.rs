//! `gah install` command

use anyhow::Result;

use crate::cli::InstallArgs;
use gah::ops::{
    CommandInstaller, InstallOptions, InstallOutcome, Installer, PackageInstallStatus,
};
use gah::GlobalContext;

pub fn execute(args: InstallArgs, ctx: &GlobalContext) -> Result<()> {
    let ws = ctx.workspace()?;
    let config = ctx.load_config(&ws);

    let package_installer = CommandInstaller::new(config.package_manager())
        .with_args(config.install.args.iter().cloned());
    let options = InstallOptions {
        skip_package_install: args.skip_package_install,
    };

    let mut installer = Installer::new(&ws, &config, &package_installer, options);
    if let InstallOutcome::Installed(report) = installer.install()? {
        tracing::info!(
            "installed {} module(s) into {}",
            report.modules,
            ws.host_dir().display()
        );
        if report.package_install == PackageInstallStatus::Skipped {
            tracing::info!("run `{}` in {} to install packages", package_installer.program(), ws.base_dir().display());
        }
    }

    Ok(())
}
