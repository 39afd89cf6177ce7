//! Blocking GitLab REST (v4) client

use super::{ProjectApi, User};
use crate::config::ApiProtocol;
use crate::domain::{ProjectRecord, ProjectRef};
use crate::error::ApiError;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

const USER_AGENT: &str = concat!("lab-clone/", env!("CARGO_PKG_VERSION"));

/// Longest error body carried into an [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 200;

pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GitLabClient {
    /// Create a client for the instance at `host` (may include a port).
    pub fn new(host: &str, protocol: ApiProtocol, token: Option<String>) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_http(http, api_base_url(host, protocol), token))
    }

    /// Use a preconfigured HTTP client against an explicit API base URL.
    pub fn with_http(http: Client, base_url: String, token: Option<String>) -> Self {
        Self { http, base_url, token }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, missing: &str) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.header("PRIVATE-TOKEN", token);
        }
        let response = request.send()?;
        let status = response.status();
        debug!("Received response ({}) from {}", status, url);

        match status.as_u16() {
            404 => return Err(ApiError::NotFound(missing.to_string())),
            401 | 403 => {
                return Err(ApiError::Unauthorized { status: status.as_u16(), url: url.to_string() })
            }
            _ if !status.is_success() => {
                let body = response.text().unwrap_or_default();
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                    message: error_message(&body),
                });
            }
            _ => {}
        }

        let body = response.text()?;
        trace!("Body: {}", body);
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode { url: url.to_string(), message: e.to_string() })
    }
}

impl ProjectApi for GitLabClient {
    fn current_user(&self) -> Result<User, ApiError> {
        let url = format!("{}/user", self.base_url);
        self.get_json(&url, "current user")
    }

    fn project(&self, project: &ProjectRef) -> Result<ProjectRecord, ApiError> {
        let url = project_endpoint(&self.base_url, project);
        let raw: ApiProject = self.get_json(&url, &project.to_string())?;
        Ok(raw.into())
    }
}

pub fn api_base_url(host: &str, protocol: ApiProtocol) -> String {
    format!("{}://{}/api/v4", protocol.as_str(), host.trim_end_matches('/'))
}

/// `/projects/:id` accepts either the numeric ID or the URL-encoded namespaced path.
pub fn project_endpoint(base_url: &str, project: &ProjectRef) -> String {
    match project {
        ProjectRef::Id(id) => format!("{base_url}/projects/{id}"),
        ProjectRef::Path(path) => format!("{base_url}/projects/{}", urlencoding::encode(path)),
    }
}

/// GitLab error bodies look like `{"message": "..."}`; fall back to the raw text.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: serde_json::Value,
    }

    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: serde_json::Value::String(s) }) => s,
        Ok(ErrorBody { message }) => message.to_string(),
        Err(_) => body.trim().to_string(),
    };
    message.chars().take(MAX_ERROR_BODY).collect()
}

#[derive(Debug, Deserialize)]
struct ApiProject {
    id: u64,
    path: String,
    path_with_namespace: String,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    ssh_url_to_repo: Option<String>,
    #[serde(default)]
    http_url_to_repo: Option<String>,
    #[serde(default)]
    forked_from_project: Option<ApiForkParent>,
}

#[derive(Debug, Deserialize)]
struct ApiForkParent {
    path_with_namespace: String,
}

impl From<ApiProject> for ProjectRecord {
    fn from(raw: ApiProject) -> Self {
        let forked_from = raw
            .forked_from_project
            .map(|parent| parent.path_with_namespace)
            .filter(|parent| !parent.is_empty() && *parent != raw.path_with_namespace);

        ProjectRecord {
            id: raw.id,
            path: raw.path,
            path_with_namespace: raw.path_with_namespace,
            default_branch: raw.default_branch,
            ssh_url_to_repo: raw.ssh_url_to_repo,
            http_url_to_repo: raw.http_url_to_repo,
            forked_from,
        }
    }
}
