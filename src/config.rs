//! Configuration module for Pastis Share.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShareError};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Key-value storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per storage slot.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Total capacity of all slots in bytes.
    #[serde(default = "default_capacity_bytes")]
    pub capacity_bytes: u64,
}

fn default_storage_path() -> String {
    "data/storage".to_string()
}

fn default_capacity_bytes() -> u64 {
    crate::file::DEFAULT_CAPACITY_BYTES
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            capacity_bytes: default_capacity_bytes(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file; empty disables file output.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/pastis.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Static web host configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Directory of the built single-page application.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Entry document served for every unmatched GET.
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_static_path() -> String {
    "dist".to_string()
}

fn default_index_file() -> String {
    "index.html".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_path: default_static_path(),
            index_file: default_index_file(),
            cors_origins: vec![],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShareError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ShareError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listen port of the web server
    /// - `PASTIS_STORAGE_PATH`: storage directory
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(%port, "Ignoring invalid PORT value"),
            }
        }

        if let Some(path) = lookup("PASTIS_STORAGE_PATH") {
            if !path.is_empty() {
                self.storage.path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.capacity_bytes == 0 {
            return Err(ShareError::Config(
                "storage.capacity_bytes must be greater than zero".to_string(),
            ));
        }
        if self.web.index_file.is_empty() {
            return Err(ShareError::Config("web.index_file must be set".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.path, "data/storage");
        assert_eq!(config.storage.capacity_bytes, 5 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/pastis.log");
        assert_eq!(config.web.static_path, "dist");
        assert_eq!(config.web.index_file, "index.html");
        assert!(config.web.cors_origins.is_empty());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000

[storage]
path = "/tmp/pastis"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.path, "/tmp/pastis");
        assert_eq!(config.storage.capacity_bytes, 5 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server\nport = ");
        assert!(matches!(result, Err(ShareError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/pastis.toml");
        assert!(matches!(result, Err(ShareError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[web]\nstatic_path = \"public\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.web.static_path, "public");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> =
            [("PORT", "9090"), ("PASTIS_STORAGE_PATH", "/var/pastis")].into();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.path, "/var/pastis");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.storage.capacity_bytes = 0;
        assert!(config.validate().is_err());
    }
}
