//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, database path, fingerprint
//! salt, admin credentials, the engagement threshold and janitor settings.

use inkwell_domain::DEFAULT_DWELL_SECS;
use inkwell_janitor::JanitorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database path, `:memory:` for a throwaway store
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Secret mixed into every visitor fingerprint
    ///
    /// Changing it makes every visitor look new.
    pub salt: String,

    /// Password accepted by `POST /admin/session`
    pub admin_password: String,

    /// JWT secret for signing admin tokens
    pub jwt_secret: String,

    /// Admin token expiry in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,

    /// Seconds a reader must stay before the client asks to count a view
    #[serde(default = "default_dwell_seconds")]
    pub dwell_seconds: u64,

    /// Ledger retention sweeps
    #[serde(default)]
    pub janitor: JanitorConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_db_path() -> PathBuf {
    PathBuf::from("inkwell.db")
}

/// Default token expiry: 1 hour
fn default_token_expiry() -> u64 {
    3600
}

fn default_dwell_seconds() -> u64 {
    DEFAULT_DWELL_SECS
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("salt", &self.salt),
            ("admin_password", &self.admin_password),
            ("jwt_secret", &self.jwt_secret),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField(name.to_string()));
            }
        }

        if self.dwell_seconds == 0 {
            return Err(ConfigError::Invalid("dwell_seconds must be positive".to_string()));
        }

        self.janitor
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            db_path: PathBuf::from(":memory:"),
            salt: "test-salt-do-not-use-in-production".to_string(),
            admin_password: "test-admin-password".to_string(),
            jwt_secret: "test-secret-key-do-not-use-in-production".to_string(),
            token_expiry_secs: default_token_expiry(),
            dwell_seconds: DEFAULT_DWELL_SECS,
            janitor: JanitorConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.token_expiry_secs, 3600);
        assert_eq!(config.dwell_seconds, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            db_path = "/var/lib/inkwell/views.db"
            salt = "pepper"
            admin_password = "hunter2"
            jwt_secret = "my-secret"
            dwell_seconds = 100

            [janitor]
            retention_days = 14
            dry_run = true
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.db_path, PathBuf::from("/var/lib/inkwell/views.db"));
        assert_eq!(config.dwell_seconds, 100);
        assert_eq!(config.token_expiry_secs, 3600);
        assert_eq!(config.janitor.retention_days, 14);
        assert_eq!(config.janitor.sweep_interval_minutes, 60);
        assert!(config.janitor.dry_run);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let toml = r#"
            salt = "pepper"
            admin_password = "hunter2"
            jwt_secret = "my-secret"
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("inkwell.db"));
        assert_eq!(config.dwell_seconds, 60);
        assert_eq!(config.janitor, JanitorConfig::default());
    }

    #[test]
    fn test_empty_salt_rejected() {
        let toml = r#"
            salt = ""
            admin_password = "hunter2"
            jwt_secret = "my-secret"
        "#;

        let result = ServerConfig::from_toml(toml);
        assert!(matches!(result, Err(ConfigError::MissingField(ref f)) if f == "salt"));
    }

    #[test]
    fn test_missing_secret_is_parse_error() {
        let toml = r#"
            salt = "pepper"
            admin_password = "hunter2"
        "#;

        assert!(matches!(ServerConfig::from_toml(toml), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inkwell.toml");
        std::fs::write(&path, "salt = \"pepper\"\nadmin_password = \"pw\"\njwt_secret = \"s\"\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.salt, "pepper");

        let missing = ServerConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::FileRead(_))));
    }

    #[test]
    fn test_invalid_janitor_settings_rejected() {
        let mut config = ServerConfig::default_test_config();
        config.janitor.sweep_interval_minutes = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
