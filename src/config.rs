//! Configuration for the API client and cache
//!
//! Settings live in the `[reqres_api]` table of a TOML file. Every field has
//! a default, so a missing file or an empty table yields a usable config.

use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

/// Default cache lifetime in seconds
pub const DEFAULT_CACHE_DURATION_SECONDS: u64 = 60;

/// Default per-attempt HTTP timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is present but unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for the API client and caching decorator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the user-directory API
    pub base_url: String,
    /// Lifetime of cached lookups
    pub cache_duration_seconds: u64,
    /// Timeout for each individual HTTP attempt
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_duration_seconds: DEFAULT_CACHE_DURATION_SECONDS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

/// Layout of the config file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reqres_api: ApiConfig,
}

impl ApiConfig {
    /// Cache TTL as a `Duration`
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_duration_seconds)
    }

    /// Per-attempt request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.reqres_api.normalized())
    }

    /// Strips surrounding whitespace from the base URL
    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().to_string();
        self
    }

    /// Checks that the values can be used to build a client
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.as_str();
        if base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if base_url.trim() != base_url {
            return Err(ConfigError::Invalid(format!(
                "base_url '{}' has surrounding whitespace",
                base_url
            )));
        }

        let url = reqwest::Url::parse(base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}' is not a valid URL: {}", base_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "base_url '{}' must use http or https",
                base_url
            )));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path of the per-user config file (`~/.config/reqres-client/config.toml` on Linux)
///
/// Returns `None` if no home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "reqres-client")?;
    Some(project_dirs.config_dir().join("config.toml"))
}

/// Loads configuration from a TOML file
///
/// Values are not validated here, so command-line overrides can still replace
/// a bad entry; call [`ApiConfig::validate`] once the final values are known.
pub fn load_config(path: &Path) -> Result<ApiConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ApiConfig::from_toml_str(&content, path)
}

/// Resolves the configuration to start with
///
/// An explicit path must exist. Without one, the per-user config file is used
/// when present, otherwise the defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ApiConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(ApiConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).expect("Failed to write config file");
        path
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://reqres.in/api");
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_config(
            &dir,
            r#"
[reqres_api]
base_url = "http://localhost:8080/api"
cache_duration_seconds = 5
request_timeout_seconds = 10
"#,
        );

        let config = load_config(&path).expect("Config should load");

        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.cache_duration_seconds, 5);
        assert_eq!(config.request_timeout_seconds, 10);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[reqres_api]\ncache_duration_seconds = 120\n");

        let config = load_config(&path).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache_duration_seconds, 120);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");

        assert_eq!(load_config(&path).unwrap(), ApiConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[reqres_api]\ncache_duration_seconds = \"soon\"\n");

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_negative_cache_duration_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[reqres_api]\ncache_duration_seconds = -5\n");

        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_keeps_invalid_values_for_later_validation() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[reqres_api]\nbase_url = \"not a url\"\n");

        let config = load_config(&path).expect("Parsing should not validate");
        assert_eq!(config.base_url, "not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_trims_base_url() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[reqres_api]\nbase_url = \" http://host/api \"\n");

        assert_eq!(load_config(&path).unwrap().base_url, "http://host/api");
    }

    #[test]
    fn test_empty_base_url_is_invalid() {
        let config = ApiConfig {
            base_url: "  ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url must not be empty"));
    }

    #[test]
    fn test_base_url_with_surrounding_whitespace_is_invalid() {
        let config = ApiConfig {
            base_url: "http://host/api ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(config.normalized().validate().is_ok());
    }

    #[test]
    fn test_relative_base_url_is_invalid() {
        let config = ApiConfig {
            base_url: "users/api".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_http_base_url_is_invalid() {
        let config = ApiConfig {
            base_url: "ftp://reqres.in/api".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = ApiConfig {
            request_timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cache_duration_is_valid() {
        let config = ApiConfig {
            cache_duration_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_resolve_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[reqres_api]\nbase_url = \"http://example.test\"\n");

        let config = resolve_config(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://example.test");
    }

    #[test]
    fn test_resolve_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        assert!(resolve_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_default_config_path_mentions_project() {
        if let Some(path) = default_config_path() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("reqres-client"));
            assert!(path_str.ends_with("config.toml"));
        }
        // Test passes if no home directory is available (e.g. in CI)
    }
}
