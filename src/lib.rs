//! lab-clone: clone GitLab projects by shorthand and link fork upstreams
//!
//! Resolves a repository identifier (name, namespaced path, project ID or URL)
//! against a GitLab instance, clones it, and adds the fork parent as an
//! `upstream` remote when the clone is one of the user's own forks.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod git;

pub use error::{ApiError, CloneError, CloneResult, GitError};
