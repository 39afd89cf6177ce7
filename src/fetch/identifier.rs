//! Repository identifier classification

use crate::git::is_valid_url;

/// What kind of identifier the user typed, with its normalized payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierKind {
    /// A clone URL, used as-is apart from `.git` normalization.
    Url(String),
    /// A numeric project ID.
    ProjectId(u64),
    /// A project name without a namespace, owned by the current user.
    BareName(String),
    /// `namespace/repo`, `group/subgroup/repo`, ...
    NamespacedPath(String),
}

/// A user-supplied repository identifier and its single classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentifier {
    raw: String,
    kind: IdentifierKind,
}

impl RepoIdentifier {
    /// Classify `raw` by inspection only. Any string is classifiable.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();

        let kind = if is_valid_url(trimmed) {
            IdentifierKind::Url(normalize_clone_url(trimmed))
        } else if let Ok(id) = trimmed.parse::<u64>() {
            IdentifierKind::ProjectId(id)
        } else {
            let path = normalize_project_path(trimmed);
            if path.contains('/') {
                IdentifierKind::NamespacedPath(path)
            } else {
                IdentifierKind::BareName(path)
            }
        };

        Self { raw: raw.to_string(), kind }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &IdentifierKind {
        &self.kind
    }
}

/// Strip trailing slashes and append `.git` when missing. Idempotent.
pub fn normalize_clone_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with(".git") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.git")
    }
}

/// Drop `./` segments, empty segments and a trailing `.git`.
fn normalize_project_path(path: &str) -> String {
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    match joined.strip_suffix(".git") {
        Some(stripped) if !stripped.is_empty() && !stripped.ends_with('/') => stripped.to_string(),
        _ => joined,
    }
}
