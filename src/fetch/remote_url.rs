//! Clone URL construction for a resolved project

use crate::domain::{ProjectRecord, Protocol, RemoteArgs};
use crate::error::{CloneError, CloneResult};
use crate::git::{redact_url, url_host};
use tracing::warn;
use url::Url;

/// Username placed in front of a token when the acting user is unknown.
const TOKEN_USERNAME: &str = "oauth2";

/// Build the clone URL for `project` according to `args.protocol`.
///
/// ssh URLs never carry the token; https URLs embed it as the password when one is set.
pub fn remote_url(project: &ProjectRecord, args: &RemoteArgs) -> CloneResult<String> {
    let build_error = |reason: &str| CloneError::Build {
        project: project.path_with_namespace.clone(),
        protocol: args.protocol,
        reason: reason.to_string(),
    };

    let url = match args.protocol {
        Protocol::Ssh => non_empty(&project.ssh_url_to_repo)
            .map(str::to_string)
            .ok_or_else(|| build_error("project has no SSH URL")),
        Protocol::Https => {
            let http_url = non_empty(&project.http_url_to_repo)
                .ok_or_else(|| build_error("project has no HTTP URL"))?;

            match args.token.as_deref().filter(|t| !t.is_empty()) {
                None => Ok(http_url.to_string()),
                Some(token) => with_credentials(http_url, &args.username, token)
                    .ok_or_else(|| build_error("project HTTP URL cannot carry credentials")),
            }
        }
    }?;

    if !points_at_host(&url, &args.host) {
        warn!(
            "Clone URL {} is not on the API host {}; check the instance's external URL",
            redact_url(&url),
            args.host
        );
    }
    Ok(url)
}

/// Whether `url` targets `host`, ignoring a port on `host`. URLs without a
/// recognizable host are not second-guessed.
fn points_at_host(url: &str, host: &str) -> bool {
    let host = host.rsplit_once(':').map_or(host, |(name, _)| name);
    match url_host(url) {
        Some(found) => host.is_empty() || found.eq_ignore_ascii_case(host),
        None => true,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn with_credentials(http_url: &str, username: &str, token: &str) -> Option<String> {
    let mut url = Url::parse(http_url).ok()?;
    let username = if username.is_empty() { TOKEN_USERNAME } else { username };
    url.set_username(username).ok()?;
    url.set_password(Some(token)).ok()?;
    Some(url.to_string())
}
