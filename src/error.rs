//! Error types for the clone pipeline.

use crate::domain::Protocol;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced while resolving, cloning and linking a project.
#[derive(Debug, Error)]
pub enum CloneError {
    /// The acting user could not be determined.
    #[error("failed to look up the current user")]
    CurrentUser(#[source] ApiError),

    /// The identifier could not be mapped to a project.
    #[error("could not resolve project '{identifier}'")]
    Resolution {
        identifier: String,
        #[source]
        source: ApiError,
    },

    /// The project lacks the data needed for the requested protocol.
    #[error("cannot build a {protocol} clone URL for '{project}': {reason}")]
    Build { project: String, protocol: Protocol, reason: String },

    /// The clone itself failed. The URL is stored with credentials redacted.
    #[error("failed to clone {url}")]
    Clone {
        url: String,
        #[source]
        source: GitError,
    },

    /// Adding a remote to the cloned repository failed.
    #[error("failed to add remote '{name}' in {directory}")]
    Remote {
        name: String,
        directory: String,
        #[source]
        source: GitError,
    },

    /// The clone succeeded but linking its fork parent did not.
    #[error("cloned successfully, but linking upstream '{upstream}' failed")]
    UpstreamLink {
        upstream: String,
        #[source]
        source: Box<CloneError>,
    },
}

/// Errors returned by the GitLab API collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("project not found: {0}")]
    NotFound(String),

    #[error("access denied ({status}) for {url}")]
    Unauthorized { status: u16, url: String },

    #[error("request to {url} failed with status {status}: {message}")]
    Status { status: u16, url: String, message: String },

    #[error("HTTP request failed")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Errors returned by the git collaborator.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("unable to invoke git")]
    Spawn(#[from] std::io::Error),

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },

    #[error("git repository error")]
    Repository(#[from] git2::Error),
}

/// Convenience result alias.
pub type CloneResult<T> = std::result::Result<T, CloneError>;
