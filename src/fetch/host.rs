//! Host resolution from the local repository context

use crate::config::Config;
use crate::git::url_host;
use git2::Repository;
use std::path::Path;
use tracing::debug;

/// Pick the GitLab host to talk to.
///
/// Uses the remote host of the repository containing `start` when that host is one
/// the config knows about, otherwise the configured default host. Never fails.
pub fn resolve_host(start: &Path, config: &Config) -> String {
    match detect_repo_host(start, &config.known_hosts()) {
        Some(host) => {
            debug!("Using host {} from the local repository", host);
            host
        }
        None => {
            let host = config.default_host();
            debug!("No known remote in the local repository, using default host {}", host);
            host
        }
    }
}

/// Find the first remote of the repository containing `start` whose host is in `known_hosts`.
///
/// Remotes are checked in the order `upstream`, `origin`, then the rest by name.
/// Returns the matching entry from `known_hosts`, so a configured port is kept.
pub fn detect_repo_host(start: &Path, known_hosts: &[String]) -> Option<String> {
    let repo = match Repository::discover(start) {
        Ok(repo) => repo,
        Err(e) => {
            debug!("No repository found from {}: {}", start.display(), e.message());
            return None;
        }
    };

    let remotes = match repo.remotes() {
        Ok(remotes) => remotes,
        Err(e) => {
            debug!("Unable to list remotes: {}", e.message());
            return None;
        }
    };

    let mut names: Vec<String> = remotes.iter().flatten().map(str::to_string).collect();
    names.sort_by(|a, b| remote_rank(a).cmp(&remote_rank(b)).then_with(|| a.cmp(b)));

    names.iter().find_map(|name| {
        let remote = repo.find_remote(name).ok()?;
        let host = url_host(remote.url()?)?;
        known_hosts.iter().find(|known| host_matches(known, &host)).cloned()
    })
}

fn remote_rank(name: &str) -> u8 {
    match name {
        "upstream" => 0,
        "origin" => 1,
        _ => 2,
    }
}

/// Compare a configured host (maybe with `:port`) against a bare remote host.
fn host_matches(known: &str, host: &str) -> bool {
    let known_host = known.rsplit_once(':').map_or(known, |(h, _)| h);
    known.eq_ignore_ascii_case(host) || known_host.eq_ignore_ascii_case(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostConfig;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_hosts(hosts: &[&str]) -> Config {
        let mut config = Config::default();
        for host in hosts {
            config.hosts.insert(host.to_string(), HostConfig::default());
        }
        config
    }

    #[test]
    fn test_falls_back_to_default_outside_a_repository() {
        let tmp = TempDir::new().expect("tmp");
        let config = Config::default();
        assert_eq!(resolve_host(tmp.path(), &config), "gitlab.com");
    }

    #[test]
    fn test_uses_known_remote_host() {
        let tmp = TempDir::new().expect("tmp");
        let repo = Repository::init(tmp.path()).expect("init");
        repo.remote("origin", "git@gitlab.example.com:team/app.git").expect("remote");

        let config = config_with_hosts(&["gitlab.example.com"]);
        assert_eq!(resolve_host(tmp.path(), &config), "gitlab.example.com");
    }

    #[test]
    fn test_discovers_repository_from_subdirectory() {
        let tmp = TempDir::new().expect("tmp");
        let repo = Repository::init(tmp.path()).expect("init");
        repo.remote("origin", "https://gitlab.example.com/team/app.git").expect("remote");
        let nested = tmp.path().join("src").join("bin");
        fs::create_dir_all(&nested).expect("mkdir");

        let config = config_with_hosts(&["gitlab.example.com"]);
        assert_eq!(resolve_host(&nested, &config), "gitlab.example.com");
    }

    #[test]
    fn test_ignores_unknown_remote_hosts() {
        let tmp = TempDir::new().expect("tmp");
        let repo = Repository::init(tmp.path()).expect("init");
        repo.remote("origin", "git@github.com:someone/app.git").expect("remote");

        let config = Config::default();
        assert_eq!(resolve_host(tmp.path(), &config), "gitlab.com");
    }

    #[test]
    fn test_prefers_upstream_over_origin() {
        let tmp = TempDir::new().expect("tmp");
        let repo = Repository::init(tmp.path()).expect("init");
        repo.remote("origin", "git@gitlab.com:alice/app.git").expect("origin");
        repo.remote("upstream", "git@gitlab.example.com:team/app.git").expect("upstream");

        let known = vec!["gitlab.com".to_string(), "gitlab.example.com".to_string()];
        assert_eq!(detect_repo_host(tmp.path(), &known).as_deref(), Some("gitlab.example.com"));
    }

    #[test]
    fn test_keeps_configured_port() {
        let tmp = TempDir::new().expect("tmp");
        let repo = Repository::init(tmp.path()).expect("init");
        repo.remote("origin", "https://gitlab.example.com:8443/team/app.git").expect("remote");

        let known = vec!["gitlab.example.com:8443".to_string()];
        assert_eq!(
            detect_repo_host(tmp.path(), &known).as_deref(),
            Some("gitlab.example.com:8443")
        );
    }
}
