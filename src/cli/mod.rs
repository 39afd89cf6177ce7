//! Command-line interface for lab-clone
//!
//! Provides the `clone` subcommand.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod clone;

/// Clone GitLab projects and link fork upstreams
#[derive(Parser)]
#[command(name = "lab-clone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (defaults to ~/.config/lab-clone/config.toml)
    #[arg(long, value_name = "FILE", env = "LAB_CLONE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a GitLab repository/project
    ///
    /// REPO may be a project name owned by the current user (`glab`),
    /// a namespaced path (`profclems/glab`, `group/subgroup/repo`),
    /// a numeric project ID (`4356677`) or a full URL.
    /// Everything after REPO is handed to `git clone` unchanged.
    #[command(name = "clone", verbatim_doc_comment)]
    CloneRepo(clone::CloneArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::CloneRepo(args) => clone::run(args, cli.config.as_deref()),
    }
}
