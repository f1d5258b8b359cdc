//! Configuration management for the roombook client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; requests wait indefinitely when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// Session persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the logged-in user. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Environment variable prefix, e.g. `ROOMBOOK_API__BASE_URL`
pub const ENV_PREFIX: &str = "ROOMBOOK";

impl Config {
    /// Load configuration from an explicit file (required when given, otherwise
    /// an optional `roombook.*` in the working directory) layered under the
    /// environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or any source cannot be parsed.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("roombook").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first bad value.
    pub fn validate(&self) -> crate::Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::Error::Configuration {
                message: format!("api.base_url must be an http(s) URL, got '{url}'"),
            });
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(crate::Error::Configuration {
                message: "api.timeout_seconds must be greater than zero".to_string(),
            });
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(crate::Error::Configuration {
                message: format!(
                    "logging.format must be 'json' or 'pretty', got '{}'",
                    self.logging.format
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::field_reassign_with_default)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert!(config.api.timeout_seconds.is_none());
        assert!(config.session.path.is_none());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{ "api": {"base_url": "https://booking.kampus.ac.id/api"} }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.api.base_url, "https://booking.kampus.ac.id/api");
        assert!(config.api.timeout_seconds.is_none());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_serialization_skips_unset_options() {
        let serialized = serde_json::to_string(&Config::default()).unwrap();

        assert!(!serialized.contains("timeout_seconds"));
        assert!(!serialized.contains("path"));

        let deserialized: Config = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, Config::default().api.base_url);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout_seconds = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roombook.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://10.0.0.5:9000\"\ntimeout_seconds = 15\n\n[session]\npath = \"/tmp/rb-session.json\"\n"
        )
        .unwrap();
        drop(file);

        let config = Config::load_from(Some(&path)).unwrap();

        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.api.timeout_seconds, Some(15));
        assert_eq!(config.session.path, Some(PathBuf::from("/tmp/rb-session.json")));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let missing = Path::new("/definitely/not/here/roombook.toml");
        assert!(matches!(
            Config::load_from(Some(missing)),
            Err(crate::Error::Configuration { .. })
        ));
    }
}
