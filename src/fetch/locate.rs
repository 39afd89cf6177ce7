//! Project lookup through the API collaborator

use crate::api::ProjectApi;
use crate::domain::{ProjectRecord, ProjectRef};
use crate::error::{CloneError, CloneResult};
use tracing::debug;

/// Resolve `project` to its record. Failures are fatal and not retried.
pub fn locate(api: &dyn ProjectApi, project: &ProjectRef) -> CloneResult<ProjectRecord> {
    debug!("Looking up project {}", project);

    let record = api
        .project(project)
        .map_err(|source| CloneError::Resolution { identifier: project.to_string(), source })?;

    debug!(
        "Resolved {} to {} (id {}, fork of {:?})",
        project, record.path_with_namespace, record.id, record.forked_from
    );
    Ok(record)
}
