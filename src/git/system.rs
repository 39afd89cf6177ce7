//! `Vcs` implementation backed by the system `git` binary and libgit2

use super::{redact_url, Vcs};
use crate::error::GitError;
use git2::Repository;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Clones through the `git` executable so arbitrary clone flags pass through untouched,
/// and edits remotes with libgit2.
#[derive(Debug, Clone, Default)]
pub struct SystemGit;

impl SystemGit {
    pub fn new() -> Self {
        Self
    }
}

impl Vcs for SystemGit {
    fn clone_repo(&self, url: &str, extra_args: &[String]) -> Result<(), GitError> {
        let shown = redact_url(url);
        debug!(url = %shown, args = ?extra_args, "Running git clone");

        let status = Command::new("git").arg("clone").arg(url).args(extra_args).status()?;

        if status.success() {
            Ok(())
        } else {
            let mut command = format!("git clone {shown}");
            for arg in extra_args {
                command.push(' ');
                command.push_str(arg);
            }
            Err(GitError::Failed { command, status })
        }
    }

    fn add_remote(&self, name: &str, url: &str, directory: &Path) -> Result<(), GitError> {
        debug!(name, url = %redact_url(url), directory = %directory.display(), "Adding remote");

        let repo = Repository::open(directory)?;
        repo.remote(name, url)?;
        Ok(())
    }
}
