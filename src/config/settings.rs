//! Config model and per-host lookups

use crate::domain::Protocol;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Instance used when nothing else names one.
pub const DEFAULT_HOST: &str = "gitlab.com";

/// Scheme used to reach a host's REST API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProtocol {
    Http,
    #[default]
    Https,
}

impl ApiProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiProtocol::Http => "http",
            ApiProtocol::Https => "https",
        }
    }
}

/// Settings for a single GitLab instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    pub token: Option<String>,
    pub git_protocol: Option<Protocol>,
    pub api_protocol: Option<ApiProtocol>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Host used outside of a repository bound to a known remote.
    pub default_host: Option<String>,
    /// Protocol for hosts that don't set their own.
    pub git_protocol: Option<Protocol>,
    pub hosts: BTreeMap<String, HostConfig>,
    #[serde(skip)]
    overrides: EnvOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EnvOverrides {
    host: Option<String>,
    token: Option<String>,
    git_protocol: Option<Protocol>,
}

impl Config {
    /// Apply environment overrides, reading variables through `lookup`.
    ///
    /// - `GITLAB_HOST` / `GITLAB_URI`: default host
    /// - `GITLAB_TOKEN` / `GITLAB_ACCESS_TOKEN`: token for every host
    /// - `LAB_CLONE_GIT_PROTOCOL`: protocol for every host
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = first_set(&lookup, &["GITLAB_HOST", "GITLAB_URI"]) {
            self.overrides.host = Some(strip_scheme(&host));
        }
        if let Some(token) = first_set(&lookup, &["GITLAB_TOKEN", "GITLAB_ACCESS_TOKEN"]) {
            self.overrides.token = Some(token);
        }
        if let Some(protocol) = first_set(&lookup, &["LAB_CLONE_GIT_PROTOCOL"]) {
            let parsed = protocol
                .parse::<Protocol>()
                .map_err(anyhow::Error::msg)
                .context("Invalid LAB_CLONE_GIT_PROTOCOL")?;
            self.overrides.git_protocol = Some(parsed);
        }
        Ok(())
    }

    pub fn default_host(&self) -> String {
        self.overrides
            .host
            .clone()
            .or_else(|| self.default_host.as_deref().map(strip_scheme))
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    /// Every host this config knows about, lowercased, default host first.
    pub fn known_hosts(&self) -> Vec<String> {
        let mut hosts = vec![self.default_host().to_ascii_lowercase()];
        for host in self.hosts.keys() {
            let host = host.to_ascii_lowercase();
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }

    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.iter().find(|(name, _)| name.eq_ignore_ascii_case(host)).map(|(_, cfg)| cfg)
    }

    pub fn git_protocol(&self, host: &str) -> Protocol {
        self.overrides
            .git_protocol
            .or_else(|| self.host_config(host).and_then(|h| h.git_protocol))
            .or(self.git_protocol)
            .unwrap_or_default()
    }

    pub fn token(&self, host: &str) -> Option<String> {
        self.overrides
            .token
            .clone()
            .or_else(|| self.host_config(host).and_then(|h| h.token.clone()))
            .filter(|t| !t.is_empty())
    }

    pub fn api_protocol(&self, host: &str) -> ApiProtocol {
        self.host_config(host).and_then(|h| h.api_protocol).unwrap_or_default()
    }
}

/// First non-blank value among `names`.
fn first_set<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().filter_map(|name| lookup(*name)).map(|v| v.trim().to_string()).find(|v| !v.is_empty())
}

/// `https://gitlab.example.com/` → `gitlab.example.com`
fn strip_scheme(host: &str) -> String {
    let host = host.trim();
    let host = host.split_once("://").map_or(host, |(_, rest)| rest);
    host.trim_end_matches('/').to_string()
}
