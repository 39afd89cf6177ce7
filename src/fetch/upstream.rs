//! Linking a cloned fork to the project it was forked from

use super::locate::locate;
use super::remote_url::remote_url;
use crate::api::ProjectApi;
use crate::domain::{ProjectRecord, ProjectRef, RemoteArgs, UpstreamLink};
use crate::error::{CloneError, CloneResult};
use crate::git::Vcs;
use std::path::Path;
use tracing::{debug, info};

pub const UPSTREAM_REMOTE: &str = "upstream";

/// `git clone` options that consume the following argument as their value.
const VALUE_OPTIONS: &[&str] = &[
    "-b",
    "--branch",
    "-o",
    "--origin",
    "-c",
    "--config",
    "-u",
    "--upload-pack",
    "-j",
    "--jobs",
    "--depth",
    "--reference",
    "--reference-if-able",
    "--separate-git-dir",
    "--shallow-since",
    "--shallow-exclude",
    "--template",
    "--filter",
    "--server-option",
    "--bundle-uri",
    "--ref-format",
];

/// The parent to link, if `project` is a fork owned by `username`.
///
/// The project must have a fork origin and `username` must be one of its namespace
/// segments.
pub fn fork_parent<'a>(project: &'a ProjectRecord, username: &str) -> Option<&'a str> {
    let parent = project.forked_from.as_deref().filter(|p| !p.is_empty())?;
    if username.is_empty() || !project.namespace_segments().any(|segment| segment == username) {
        return None;
    }
    Some(parent)
}

/// The destination directory named among the forwarded clone arguments, if any.
pub fn destination_arg(extra_args: &[String]) -> Option<&str> {
    let mut args = extra_args.iter();
    while let Some(arg) = args.next() {
        if arg == "--" {
            return args.find(|a| !a.is_empty()).map(String::as_str);
        }
        if arg.len() > 1 && arg.starts_with('-') {
            if VALUE_OPTIONS.contains(&arg.as_str()) {
                args.next();
            }
            continue;
        }
        if !arg.is_empty() {
            return Some(arg);
        }
    }
    None
}

/// Where the clone landed: the explicit destination, else `./<project path>`.
pub fn clone_directory(project: &ProjectRecord, extra_args: &[String]) -> String {
    match destination_arg(extra_args) {
        Some(dir) => dir.to_string(),
        None => format!("./{}", project.path),
    }
}

/// Look up `parent`, build its URL with default remote args and add it as `upstream`.
///
/// Every failure is reported as [`CloneError::UpstreamLink`]; the clone is left alone.
pub fn link_upstream(
    api: &dyn ProjectApi,
    vcs: &dyn Vcs,
    parent: &str,
    directory: String,
) -> CloneResult<UpstreamLink> {
    let wrap = |source: CloneError| CloneError::UpstreamLink {
        upstream: parent.to_string(),
        source: Box::new(source),
    };

    let record = locate(api, &ProjectRef::Path(parent.to_string())).map_err(wrap)?;
    let url = remote_url(&record, &RemoteArgs::default()).map_err(wrap)?;

    debug!("Adding {} remote {} in {}", UPSTREAM_REMOTE, url, directory);
    vcs.add_remote(UPSTREAM_REMOTE, &url, Path::new(&directory))
        .map_err(|source| CloneError::Remote {
            name: UPSTREAM_REMOTE.to_string(),
            directory: directory.clone(),
            source,
        })
        .map_err(wrap)?;

    info!("Added remote '{}' pointing at {}", UPSTREAM_REMOTE, record.path_with_namespace);
    Ok(UpstreamLink { url, directory })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn project(path_with_namespace: &str, forked_from: Option<&str>) -> ProjectRecord {
        ProjectRecord {
            id: 1,
            path: path_with_namespace.rsplit('/').next().unwrap_or_default().to_string(),
            path_with_namespace: path_with_namespace.to_string(),
            default_branch: None,
            ssh_url_to_repo: None,
            http_url_to_repo: None,
            forked_from: forked_from.map(String::from),
        }
    }

    #[test]
    fn test_links_own_fork() {
        let rec = project("alice/glab", Some("profclems/glab"));
        assert_eq!(fork_parent(&rec, "alice"), Some("profclems/glab"));
    }

    #[test]
    fn test_no_link_for_someone_elses_project() {
        let rec = project("profclems/glab", Some("upstream/glab"));
        assert_eq!(fork_parent(&rec, "alice"), None);
    }

    #[test]
    fn test_no_link_without_fork_origin() {
        assert_eq!(fork_parent(&project("alice/glab", None), "alice"), None);
        assert_eq!(fork_parent(&project("alice/glab", Some("")), "alice"), None);
    }

    #[test]
    fn test_username_must_match_a_whole_segment() {
        let rec = project("malice/glab", Some("profclems/glab"));
        assert_eq!(fork_parent(&rec, "alice"), None);

        // The project's own name doesn't count as an owning namespace.
        let rec = project("team/alice", Some("profclems/alice"));
        assert_eq!(fork_parent(&rec, "alice"), None);
    }

    #[test]
    fn test_username_anywhere_in_namespace() {
        let rec = project("group/alice/glab", Some("profclems/glab"));
        assert_eq!(fork_parent(&rec, "alice"), Some("profclems/glab"));
    }

    #[test]
    fn test_destination_arg() {
        assert_eq!(destination_arg(&args(&[])), None);
        assert_eq!(destination_arg(&args(&["mydir"])), Some("mydir"));
        assert_eq!(destination_arg(&args(&["--depth", "1", "mydir"])), Some("mydir"));
        assert_eq!(destination_arg(&args(&["--depth=1", "-b", "dev"])), None);
        assert_eq!(destination_arg(&args(&["--quiet", "mydir", "--bare"])), Some("mydir"));
        assert_eq!(destination_arg(&args(&["--", "-odd-name"])), Some("-odd-name"));
    }

    #[test]
    fn test_clone_directory_defaults_to_project_path() {
        let rec = project("alice/glab", Some("profclems/glab"));
        assert_eq!(clone_directory(&rec, &[]), "./glab");
        assert_eq!(clone_directory(&rec, &args(&["--depth", "1"])), "./glab");
        assert_eq!(clone_directory(&rec, &args(&["work/glab"])), "work/glab");
    }
}
