//! Gateway configuration.
//!
//! Loaded once from a JSON file at startup and shared read-only with every
//! handler for the lifetime of the process.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Build executable used when `hugo_exec_path` is missing or empty.
pub const DEFAULT_BUILD_EXEC: &str = "hugo";

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config key `{0}` is required and must not be empty")]
    MissingField(&'static str),
}

/// On-disk shape. Every key is optional here so that a missing key and an
/// empty string are reported the same way.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    hugo_content_path: String,
    #[serde(default)]
    hugo_moment_path: String,
    #[serde(default)]
    hugo_project_path: String,
    #[serde(default)]
    hugo_exec_path: String,
    #[serde(default)]
    listen_addr: String,
}

/// Validated gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shared secret callers must present.
    pub api_key: String,

    /// Directory that receives posts.
    pub content_dir: PathBuf,

    /// Directory that receives moments.
    pub moment_dir: PathBuf,

    /// Working directory for the site build.
    pub project_dir: PathBuf,

    /// Build executable, run without arguments.
    pub build_exec: PathBuf,

    /// Socket address to bind, e.g. `127.0.0.1:8080`.
    pub listen_addr: String,
}

impl Config {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&data).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate config JSON.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(data).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        let api_key = required("api_key", raw.api_key)?;
        let content_dir = required("hugo_content_path", raw.hugo_content_path)?;
        let moment_dir = required("hugo_moment_path", raw.hugo_moment_path)?;
        let project_dir = required("hugo_project_path", raw.hugo_project_path)?;
        let listen_addr = required("listen_addr", raw.listen_addr)?;

        let build_exec = if raw.hugo_exec_path.is_empty() {
            DEFAULT_BUILD_EXEC.to_string()
        } else {
            raw.hugo_exec_path
        };

        Ok(Self {
            api_key,
            content_dir: content_dir.into(),
            moment_dir: moment_dir.into(),
            project_dir: project_dir.into(),
            build_exec: build_exec.into(),
            listen_addr,
        })
    }

    /// Address to bind. A bare `:port` binds every interface.
    pub fn bind_addr(&self) -> String {
        if self.listen_addr.starts_with(':') {
            format!("0.0.0.0{}", self.listen_addr)
        } else {
            self.listen_addr.clone()
        }
    }

    /// Override the listen address (from the command line).
    pub fn with_listen_addr(mut self, addr: String) -> Self {
        self.listen_addr = addr;
        self
    }
}

fn required(key: &'static str, value: String) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(ConfigError::MissingField(key))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = r#"{
        "api_key": "secret",
        "hugo_content_path": "/site/content/post",
        "hugo_moment_path": "/site/content/moment",
        "hugo_project_path": "/site",
        "hugo_exec_path": "/usr/local/bin/hugo",
        "listen_addr": "127.0.0.1:8080"
    }"#;

    #[test]
    fn test_full_config() {
        let config = Config::from_json(FULL).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.content_dir, PathBuf::from("/site/content/post"));
        assert_eq!(config.moment_dir, PathBuf::from("/site/content/moment"));
        assert_eq!(config.project_dir, PathBuf::from("/site"));
        assert_eq!(config.build_exec, PathBuf::from("/usr/local/bin/hugo"));
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_build_exec_defaults_to_hugo() {
        let json = r#"{
            "api_key": "k",
            "hugo_content_path": "c",
            "hugo_moment_path": "m",
            "hugo_project_path": "p",
            "hugo_exec_path": "",
            "listen_addr": ":8080"
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.build_exec, PathBuf::from(DEFAULT_BUILD_EXEC));
    }

    #[test]
    fn test_missing_required_field() {
        let json = r#"{
            "api_key": "k",
            "hugo_content_path": "c",
            "hugo_project_path": "p",
            "listen_addr": ":8080"
        }"#;
        let err = Config::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("hugo_moment_path")));
    }

    #[test]
    fn test_empty_required_field() {
        let json = r#"{
            "api_key": "",
            "hugo_content_path": "c",
            "hugo_moment_path": "m",
            "hugo_project_path": "p",
            "listen_addr": ":8080"
        }"#;
        let err = Config::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("api_key")));
    }

    #[test]
    fn test_invalid_json() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, FULL).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_key, "secret");

        let config = config.with_listen_addr("0.0.0.0:9000".to_string());
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::from_json(FULL).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");

        let config = config.with_listen_addr(":8080".to_string());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/config.json"));
    }
}
