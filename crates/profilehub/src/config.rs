//! Configuration loading

use anyhow::{Context, Result};
use profilehub_auth::HashParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on token lifetime (ten years)
const MAX_TOKEN_EXPIRY_HOURS: i64 = 10 * 365 * 24;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for paths no API route matches
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
    /// Argon2 cost parameters
    #[serde(default)]
    pub password_hashing: HashParams,
}

impl AuthConfig {
    /// Whether the built-in placeholder secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == default_jwt_secret()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_expiry_hours: default_token_expiry_hours(),
            password_hashing: HashParams::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite:./data/profilehub.db".to_string()
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_token_expiry_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a file
    ///
    /// Returns `None` when the file does not exist.
    pub fn load(path: &str) -> Result<Option<Self>> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.validate()?;
        Ok(Some(config))
    }

    fn validate(&self) -> Result<()> {
        let hours = self.auth.token_expiry_hours;
        if hours <= 0 || hours > MAX_TOKEN_EXPIRY_HOURS {
            anyhow::bail!(
                "auth.token_expiry_hours must be between 1 and {}, got {}",
                MAX_TOKEN_EXPIRY_HOURS,
                hours
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        assert!(Config::load("/nonexistent/profilehub.toml").unwrap().is_none());

        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.token_expiry_hours, 24);
        assert!(config.auth.uses_default_secret());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 9090
            static_dir = "frontend"

            [auth]
            jwt_secret = "s3cret"

            [auth.password_hashing]
            memory_kib = 4096
            "#,
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap().unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.static_dir.as_deref(), Some("frontend"));
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert!(!config.auth.uses_default_secret());
        assert_eq!(config.auth.password_hashing.memory_kib, 4096);
        assert_eq!(
            config.auth.password_hashing.iterations,
            HashParams::default().iterations
        );
        assert_eq!(config.database.url, "sqlite:./data/profilehub.db");
    }

    #[test]
    fn test_rejects_non_positive_expiry() {
        let file = write_config(
            r#"
            [auth]
            token_expiry_hours = 0
            "#,
        );
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_rejects_oversized_expiry() {
        let file = write_config(
            r#"
            [auth]
            token_expiry_hours = 9223372036854775807
            "#,
        );
        let err = Config::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("token_expiry_hours"));

        let file = write_config(&format!(
            "[auth]\ntoken_expiry_hours = {}\n",
            MAX_TOKEN_EXPIRY_HOURS
        ));
        assert!(Config::load(file.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_rejects_malformed_file() {
        let file = write_config("[server\nport = ");
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }
}
