//! Core data types shared by the clone pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport used for the clone URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Ssh,
    Https,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Ssh => "ssh",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssh" => Ok(Protocol::Ssh),
            "https" => Ok(Protocol::Https),
            other => Err(format!("Invalid git protocol '{other}' (expected 'ssh' or 'https')")),
        }
    }
}

/// How a project is addressed when asking the API for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    Id(u64),
    Path(String),
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "{id}"),
            ProjectRef::Path(path) => f.write_str(path),
        }
    }
}

/// A project as returned by the GitLab API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: u64,
    /// Last segment of the project path, used as the default clone directory.
    pub path: String,
    pub path_with_namespace: String,
    pub default_branch: Option<String>,
    pub ssh_url_to_repo: Option<String>,
    pub http_url_to_repo: Option<String>,
    /// `path_with_namespace` of the project this one was forked from.
    ///
    /// Never equal to this record's own `path_with_namespace`.
    pub forked_from: Option<String>,
}

impl ProjectRecord {
    /// Namespace segments of the project path, excluding the project's own segment.
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        let namespace = match self.path_with_namespace.rsplit_once('/') {
            Some((namespace, _)) => namespace,
            None => "",
        };
        namespace.split('/').filter(|segment| !segment.is_empty())
    }
}

/// Settings used to turn a [`ProjectRecord`] into a clone URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteArgs {
    pub protocol: Protocol,
    pub token: Option<String>,
    pub host: String,
    pub username: String,
}

/// The URL handed to the clone operation plus whatever the caller asked to forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneTarget {
    pub url: String,
    pub extra_args: Vec<String>,
}

/// The `upstream` remote added after cloning one of the user's own forks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamLink {
    pub url: String,
    pub directory: String,
}

/// Outcome of identifier resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// The identifier was looked up through the API.
    Project(ProjectRecord),
    /// The identifier was a URL and is cloned as-is.
    RawUrl,
}

/// What a completed clone run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOutcome {
    pub target: CloneTarget,
    pub upstream: Option<UpstreamLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path_with_namespace: &str) -> ProjectRecord {
        ProjectRecord {
            id: 1,
            path: path_with_namespace.rsplit('/').next().unwrap_or_default().to_string(),
            path_with_namespace: path_with_namespace.to_string(),
            default_branch: None,
            ssh_url_to_repo: None,
            http_url_to_repo: None,
            forked_from: None,
        }
    }

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("SSH".parse::<Protocol>(), Ok(Protocol::Ssh));
        assert_eq!(" https ".parse::<Protocol>(), Ok(Protocol::Https));
        assert!("git".parse::<Protocol>().is_err());
    }

    #[test]
    fn protocol_defaults_to_ssh() {
        assert_eq!(Protocol::default(), Protocol::Ssh);
        assert_eq!(RemoteArgs::default().protocol, Protocol::Ssh);
    }

    #[test]
    fn namespace_segments_skip_project_segment() {
        let rec = record("group/sub/repo");
        assert_eq!(rec.namespace_segments().collect::<Vec<_>>(), vec!["group", "sub"]);

        let rec = record("repo");
        assert_eq!(rec.namespace_segments().count(), 0);
    }
}
