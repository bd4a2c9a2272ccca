//! gah CLI - links file-system-resident modules into a host application

use anyhow::Result;
use clap::Parser;
use miette::{GraphicalReportHandler, GraphicalTheme};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use gah::core::ManifestError;
use gah::ops::InstallError;
use gah::resolver::ResolveError;
use gah::util::diagnostic::{emit, Diagnostic, InvalidJsonError};
use gah::GlobalContext;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gah=debug")
    } else {
        EnvFilter::new("gah=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    match cli.command {
        Commands::Install(args) => commands::install::execute(args, &ctx),
        Commands::Clean(args) => commands::clean::execute(args, &ctx),
        Commands::Tree(args) => commands::tree::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn report(err: &anyhow::Error, color: bool) {
    if let Some(json) = invalid_json(err) {
        let theme = if color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut out = String::new();
        if GraphicalReportHandler::new_themed(theme)
            .render_report(&mut out, json)
            .is_ok()
        {
            eprint!("{}", out);
            return;
        }
    }

    match diagnostic(err) {
        Some(diag) => emit(&diag, color),
        None => eprintln!("error: {:#}", err),
    }
}

fn manifest_error<'a>(cause: &'a (dyn std::error::Error + 'static)) -> Option<&'a ManifestError> {
    if let Some(e) = cause.downcast_ref::<ManifestError>() {
        return Some(e);
    }
    match cause.downcast_ref::<ResolveError>() {
        Some(ResolveError::Manifest(e)) => return Some(e),
        Some(_) => return None,
        None => {}
    }
    match cause.downcast_ref::<InstallError>() {
        Some(InstallError::Manifest(e)) | Some(InstallError::Resolve(ResolveError::Manifest(e))) => {
            Some(e)
        }
        _ => None,
    }
}

fn invalid_json(err: &anyhow::Error) -> Option<&InvalidJsonError> {
    err.chain().find_map(|cause| match manifest_error(cause) {
        Some(ManifestError::InvalidJson(e)) => Some(e.as_ref()),
        _ => None,
    })
}

fn diagnostic(err: &anyhow::Error) -> Option<Diagnostic> {
    if let Some(e) = err.downcast_ref::<InstallError>() {
        return e.to_diagnostic();
    }
    if let Some(e) = err.downcast_ref::<ResolveError>() {
        return Some(e.to_diagnostic());
    }
    err.downcast_ref::<ManifestError>().map(ManifestError::to_diagnostic)
}
