//! GitLab API collaborator

use crate::domain::{ProjectRecord, ProjectRef};
use crate::error::ApiError;
use serde::Deserialize;

pub mod gitlab;

pub use gitlab::GitLabClient;

/// The authenticated user the API calls are made as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Lookups the clone pipeline needs from the remote host.
pub trait ProjectApi {
    fn current_user(&self) -> Result<User, ApiError>;

    /// Fetch a project by numeric ID or namespaced path.
    fn project(&self, project: &ProjectRef) -> Result<ProjectRecord, ApiError>;
}
