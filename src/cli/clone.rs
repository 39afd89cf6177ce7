//! Clone command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use tracing::{debug, info};

use crate::api::GitLabClient;
use crate::config::{default_config_dir, load_config};
use crate::fetch::{clone_project, resolve_host, CloneSettings};
use crate::git::SystemGit;

#[derive(Args)]
pub struct CloneArgs {
    /// Project to clone: name, namespace/name, project ID or URL
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Directory and flags passed through to `git clone`
    #[arg(value_name = "GIT_ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

pub fn run(args: CloneArgs, config_path: Option<&Path>) -> Result<()> {
    let search_dir = default_config_dir();
    let mut config = load_config(config_path, search_dir.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok())?;

    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let host = resolve_host(&cwd, &config);

    let client = GitLabClient::new(&host, config.api_protocol(&host), config.token(&host))
        .with_context(|| format!("Failed creating API client for {host}"))?;
    debug!("Using GitLab API at {}", client.base_url());

    let settings = CloneSettings::from_config(&config, &host);
    let outcome = clone_project(&client, &SystemGit::new(), &settings, &args.repo, &args.git_args)?;

    if let Some(link) = outcome.upstream {
        info!("Linked upstream {} in {}", link.url, link.directory);
    }

    Ok(())
}
