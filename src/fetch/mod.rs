//! Repository resolution and cloning
//!
//! Runs the clone pipeline in order, stopping at the first failure:
//! identifier classification, project lookup, clone URL construction,
//! the clone itself, and linking the fork parent as `upstream`.

use crate::api::ProjectApi;
use crate::config::Config;
use crate::domain::{CloneOutcome, CloneTarget, ProjectRef, Protocol, RemoteArgs, Resolved};
use crate::error::{CloneError, CloneResult};
use crate::git::{redact_url, Vcs};
use tracing::{debug, info};

pub mod host;
pub mod identifier;
pub mod locate;
pub mod remote_url;
pub mod upstream;

pub use host::resolve_host;
pub use identifier::{IdentifierKind, RepoIdentifier};

/// Host-level settings the pipeline needs, taken from the config once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSettings {
    pub host: String,
    pub protocol: Protocol,
    pub token: Option<String>,
}

impl CloneSettings {
    pub fn from_config(config: &Config, host: &str) -> Self {
        Self {
            host: host.to_string(),
            protocol: config.git_protocol(host),
            token: config.token(host),
        }
    }
}

/// Resolve `repo`, clone it with `extra_args` forwarded verbatim, and link the
/// fork parent when the clone is the acting user's own fork.
pub fn clone_project(
    api: &dyn ProjectApi,
    vcs: &dyn Vcs,
    settings: &CloneSettings,
    repo: &str,
    extra_args: &[String],
) -> CloneResult<CloneOutcome> {
    let identifier = RepoIdentifier::classify(repo);
    debug!("Classified {:?} as {:?}", identifier.raw(), identifier.kind());

    let (url, resolved, username) = resolve_clone_url(api, settings, &identifier)?;

    let shown = redact_url(&url);
    info!("Cloning {}", shown);
    vcs.clone_repo(&url, extra_args).map_err(|source| CloneError::Clone { url: shown, source })?;

    let upstream = match (&resolved, username.as_deref()) {
        (Resolved::Project(project), Some(username)) => {
            match upstream::fork_parent(project, username) {
                Some(parent) => {
                    let directory = upstream::clone_directory(project, extra_args);
                    Some(upstream::link_upstream(api, vcs, parent, directory)?)
                }
                None => None,
            }
        }
        _ => None,
    };

    Ok(CloneOutcome { target: CloneTarget { url, extra_args: extra_args.to_vec() }, upstream })
}

/// Turn the identifier into a clone URL, looking the project up unless it is a URL.
///
/// Also returns the acting username when it was needed for the lookup.
fn resolve_clone_url(
    api: &dyn ProjectApi,
    settings: &CloneSettings,
    identifier: &RepoIdentifier,
) -> CloneResult<(String, Resolved, Option<String>)> {
    let current_user = || api.current_user().map_err(CloneError::CurrentUser);

    let (project_ref, user) = match identifier.kind() {
        IdentifierKind::Url(url) => return Ok((url.clone(), Resolved::RawUrl, None)),
        IdentifierKind::ProjectId(id) => (ProjectRef::Id(*id), current_user()?),
        IdentifierKind::NamespacedPath(path) => (ProjectRef::Path(path.clone()), current_user()?),
        IdentifierKind::BareName(name) => {
            // A bare name is one of the acting user's own projects.
            let user = current_user()?;
            (ProjectRef::Path(format!("{}/{name}", user.username)), user)
        }
    };
    debug!("Acting as {}", user.username);

    let project = locate::locate(api, &project_ref)?;
    debug!(
        "Resolved {} (default branch {})",
        project.path_with_namespace,
        project.default_branch.as_deref().unwrap_or("unknown")
    );

    let args = RemoteArgs {
        protocol: settings.protocol,
        token: settings.token.clone(),
        host: settings.host.clone(),
        username: user.username.clone(),
    };
    let url = remote_url::remote_url(&project, &args)?;

    Ok((url, Resolved::Project(project), Some(user.username)))
}
