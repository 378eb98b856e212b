//! Configuration for the kubeforge API server
//!
//! Settings are layered, highest priority first:
//! 1. Environment variables (`KUBEFORGE_*`)
//! 2. Configuration file (TOML)
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeforgeConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. "sqlite://kubeforge.db"
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when RUST_LOG is unset (trace, debug, info, warn, error)
    pub level: String,
    pub log_dir: PathBuf,
    pub file_logging_enabled: bool,
    /// Rotation of the JSON log file: hourly, daily or never
    pub rotation: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://kubeforge.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/kubeforge"),
            file_logging_enabled: false,
            rotation: "daily".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const ROTATIONS: [&str; 3] = ["hourly", "daily", "never"];

impl KubeforgeConfig {
    /// Defaults, then the first config file found, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("KUBEFORGE_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/kubeforge/config.toml")),
            Some(PathBuf::from("./kubeforge.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply `KUBEFORGE_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers and booleans leave the current value in place.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server
        if let Some(host) = lookup("KUBEFORGE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("KUBEFORGE_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(origins) = lookup("KUBEFORGE_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        // Database
        if let Some(url) = lookup("KUBEFORGE_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(max) = lookup("KUBEFORGE_DATABASE_MAX_CONNECTIONS").and_then(|m| m.parse().ok()) {
            self.database.max_connections = max;
        }

        // Logging
        if let Some(level) = lookup("KUBEFORGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(dir) = lookup("KUBEFORGE_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(dir);
        }
        if let Some(enabled) = lookup("KUBEFORGE_FILE_LOGGING").and_then(|e| e.parse().ok()) {
            self.logging.file_logging_enabled = enabled;
        }
        if let Some(rotation) = lookup("KUBEFORGE_LOG_ROTATION") {
            self.logging.rotation = rotation;
        }
    }

    /// Sample configuration file with every default spelled out
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(ConfigError::Validation(format!(
                "Database URL must be a sqlite URL, got '{}'",
                self.database.url
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "Database max_connections must be at least 1".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        if !ROTATIONS.contains(&self.logging.rotation.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Log rotation must be one of {}, got '{}'",
                ROTATIONS.join(", "),
                self.logging.rotation
            )));
        }

        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Config validation failed: {0}")]
    Validation(String),
}
