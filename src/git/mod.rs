//! Git collaborator: clone/remote operations and URL helpers

use crate::error::GitError;
use std::path::Path;
use url::Url;

pub mod system;

pub use system::SystemGit;

/// The git operations the clone pipeline delegates to.
pub trait Vcs {
    /// Clone `url`, passing `extra_args` to the clone verbatim.
    fn clone_repo(&self, url: &str, extra_args: &[String]) -> Result<(), GitError>;

    /// Add a remote called `name` pointing at `url` to the repository in `directory`.
    fn add_remote(&self, name: &str, url: &str, directory: &Path) -> Result<(), GitError>;
}

/// Returns `true` for absolute URLs with a host and for scp-style `user@host:path` remotes.
pub fn is_valid_url(candidate: &str) -> bool {
    url_host(candidate).is_some()
}

/// Extract the (lowercased) host from a remote URL.
///
/// Handles `scheme://[user@]host[:port]/path` and scp-style `user@host:path`.
pub fn url_host(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.contains("://") {
        let parsed = Url::parse(candidate).ok()?;
        return parsed.host_str().filter(|h| !h.is_empty()).map(|h| h.to_ascii_lowercase());
    }

    let (user_host, path) = candidate.split_once(':')?;
    let (user, host) = user_host.split_once('@')?;
    if user.is_empty() || host.is_empty() || path.is_empty() || host.contains('/') {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Mask any password embedded in a URL so it can be logged or shown in errors.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("*****")).is_ok() {
                parsed.to_string()
            } else {
                raw.to_string()
            }
        }
        _ => raw.to_string(),
    }
}
