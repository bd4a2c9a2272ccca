//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// gah - links file-system-resident modules into a host application
#[derive(Parser)]
#[command(name = "gah")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link all modules referenced by gah-host.json into the host
    Install(InstallArgs),

    /// Remove generated links, assets and path aliases
    Clean(CleanArgs),

    /// Display the resolved module tree
    Tree(TreeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InstallArgs {
    /// Do not run the package manager after linking
    #[arg(long, env = "GAH_SKIP_PACKAGE_INSTALL")]
    pub skip_package_install: bool,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct TreeArgs {
    /// Maximum depth to display
    #[arg(long)]
    pub depth: Option<usize>,

    /// Expand modules every time they appear
    #[arg(short, long)]
    pub duplicates: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
