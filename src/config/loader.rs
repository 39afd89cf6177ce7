//! Config file loading

use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Section name allowed to wrap the settings inside a shared config file.
const NESTED_SECTION: &str = "lab-clone";

const CANDIDATES: [&str; 3] = ["config.toml", "config.yml", "config.yaml"];

/// Load the config from `config_path`, or from the first file found in `search_dir`.
///
/// An explicitly given file must exist and parse; an auto-discovered file that fails
/// to parse only produces a warning and the defaults.
pub fn load_config(config_path: Option<&Path>, search_dir: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => search_dir.and_then(discover_config),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let parsed = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))
        .and_then(|content| parse_config(&content, &config_file));

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            tracing::warn!(
                "Failed to load auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

/// `$XDG_CONFIG_HOME/lab-clone`, falling back to `~/.config/lab-clone`.
pub fn default_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|dir| PathBuf::from(dir).join("lab-clone"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(xdg).join("lab-clone"));
        }
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("lab-clone"))
    }
}

fn parse_config(content: &str, config_file: &Path) -> Result<Config> {
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match ext.as_str() {
        "toml" => parse_toml_config(content, config_file),
        "yaml" | "yml" => parse_yaml_config(content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

/// Parse TOML config, supporting a nested `[lab-clone]` section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested `lab-clone` section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    // An empty file parses as null.
    if config_val.is_null() {
        return Ok(Config::default());
    }

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiProtocol;
    use crate::domain::Protocol;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(None, Some(tmp.path())).expect("config");
        assert_eq!(cfg, Config::default());

        let cfg = load_config(None, None).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("config.toml"),
            r#"
default_host = "gitlab.example.com"
git_protocol = "https"

[hosts."gitlab.example.com"]
token = "glpat-123"
api_protocol = "http"
"#,
        )
        .expect("write");

        let cfg = load_config(None, Some(tmp.path())).expect("config");
        assert_eq!(cfg.default_host(), "gitlab.example.com");
        assert_eq!(cfg.git_protocol("gitlab.example.com"), Protocol::Https);
        assert_eq!(cfg.token("gitlab.example.com").as_deref(), Some("glpat-123"));
        assert_eq!(cfg.api_protocol("gitlab.example.com"), ApiProtocol::Http);
    }

    #[test]
    fn test_load_nested_toml_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("shared.toml");
        fs::write(&path, "[lab-clone]\ndefault_host = \"gitlab.internal\"\n").expect("write");

        let cfg = load_config(Some(&path), None).expect("config");
        assert_eq!(cfg.default_host(), "gitlab.internal");
    }

    #[test]
    fn test_load_yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("config.yml"),
            "hosts:\n  gitlab.com:\n    token: abc\n    git_protocol: ssh\n",
        )
        .expect("write");

        let cfg = load_config(None, Some(tmp.path())).expect("config");
        assert_eq!(cfg.token("gitlab.com").as_deref(), Some("abc"));
        assert_eq!(cfg.git_protocol("gitlab.com"), Protocol::Ssh);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "").expect("write");

        let cfg = load_config(Some(&path), None).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_explicit_config_invalid_protocol_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "git_protocol = \"ftp\"\n").expect("write");

        let result = load_config(Some(&path), None);
        assert!(result.is_err(), "explicit config with invalid protocol should return Err");
    }

    #[test]
    fn test_explicit_config_unknown_key_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[hosts.\"gitlab.com\"]\npassword = \"x\"\n").expect("write");

        assert!(load_config(Some(&path), None).is_err());
    }

    #[test]
    fn test_explicit_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_config(Some(&tmp.path().join("nope.toml")), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.ini");
        fs::write(&path, "default_host=x\n").expect("write");

        let err = load_config(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("Unsupported config extension"));
    }

    #[test]
    fn test_auto_discovered_invalid_config_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("config.toml"), "git_protocol = 123\n").expect("write");

        let cfg = load_config(None, Some(tmp.path())).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_toml_preferred_over_yaml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("config.toml"), "default_host = \"from-toml\"\n").expect("write");
        fs::write(tmp.path().join("config.yml"), "default_host: from-yaml\n").expect("write");

        let cfg = load_config(None, Some(tmp.path())).expect("config");
        assert_eq!(cfg.default_host(), "from-toml");
    }
}
