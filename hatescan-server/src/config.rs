//! Environment driven server settings.
//!
//! | Variable                    | Default                                             |
//! |-----------------------------|-----------------------------------------------------|
//! | `HATESCAN_BIND_ADDR`        | `0.0.0.0:8000`                                      |
//! | `HATESCAN_VOCAB_PATH`       | `tokenizer.json`                                    |
//! | `HATESCAN_MODEL_URL`        | `http://127.0.0.1:8501/v1/models/hatescan:predict`  |
//! | `HATESCAN_MODEL_TIMEOUT_MS` | `5000`                                              |
//! | `HATESCAN_MAX_LENGTH`       | `50`                                                |
//! | `HATESCAN_TRUNCATION`       | `post`, or `pre` to keep the end of long input      |
//! | `DATABASE_URL`              | unset, predictions are not recorded                 |
//! | `DATABASE_POOL_SIZE`        | `5`                                                 |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use hatescan_types::{EncoderConfig, Truncation, DEFAULT_MAX_LENGTH};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_VOCAB_PATH: &str = "tokenizer.json";
pub const DEFAULT_MODEL_URL: &str = "http://127.0.0.1:8501/v1/models/hatescan:predict";
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_POOL_SIZE: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Postgres connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub vocab_path: PathBuf,
    pub model_url: String,
    pub model_timeout: Duration,
    pub max_length: usize,
    pub truncation: Truncation,
    /// `None` disables prediction logging and the feedback endpoint.
    pub database: Option<DatabaseConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            vocab_path: PathBuf::from(DEFAULT_VOCAB_PATH),
            model_url: DEFAULT_MODEL_URL.to_owned(),
            model_timeout: Duration::from_millis(DEFAULT_MODEL_TIMEOUT_MS),
            max_length: DEFAULT_MAX_LENGTH,
            truncation: Truncation::Post,
            database: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_length: usize = parse_or(&lookup, "HATESCAN_MAX_LENGTH", "a positive integer", defaults.max_length)?;
        if max_length == 0 {
            return Err(ConfigError::InvalidValue {
                name: "HATESCAN_MAX_LENGTH",
                expected: "a positive integer",
                value: "0".to_owned(),
            });
        }

        let truncation = match lookup("HATESCAN_TRUNCATION") {
            None => defaults.truncation,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "post" => Truncation::Post,
                "pre" => Truncation::Pre,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "HATESCAN_TRUNCATION",
                        expected: "`pre` or `post`",
                        value,
                    })
                }
            },
        };

        let timeout_ms: u64 = parse_or(
            &lookup,
            "HATESCAN_MODEL_TIMEOUT_MS",
            "a number of milliseconds",
            DEFAULT_MODEL_TIMEOUT_MS,
        )?;

        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(database_url) => Some(DatabaseConfig {
                database_url,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_POOL_SIZE",
                    "a number of connections",
                    DEFAULT_POOL_SIZE,
                )?,
                connection_timeout: Duration::from_secs(30),
            }),
            None => None,
        };

        Ok(Self {
            bind_addr: lookup("HATESCAN_BIND_ADDR").unwrap_or(defaults.bind_addr),
            vocab_path: lookup("HATESCAN_VOCAB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.vocab_path),
            model_url: lookup("HATESCAN_MODEL_URL").unwrap_or(defaults.model_url),
            model_timeout: Duration::from_millis(timeout_ms),
            max_length,
            truncation,
            database,
        })
    }

    /// Encoder settings for the prediction service.
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            max_length: self.max_length,
            truncation: self.truncation,
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name,
                expected,
                value,
            }),
    }
}

/// Hides the password of a connection URL for logging.
pub fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_owned();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).expect("defaults are valid");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.max_length, 50);
        assert_eq!(config.model_timeout, Duration::from_secs(5));
        assert_eq!(config.truncation, Truncation::Post);
        assert!(config.database.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("HATESCAN_BIND_ADDR", "127.0.0.1:9000"),
            ("HATESCAN_VOCAB_PATH", "/srv/tokenizer.json"),
            ("HATESCAN_MODEL_URL", "http://model:8501/v1/models/m:predict"),
            ("HATESCAN_MODEL_TIMEOUT_MS", "250"),
            ("HATESCAN_MAX_LENGTH", "80"),
            ("HATESCAN_TRUNCATION", "pre"),
            ("DATABASE_URL", "postgres://u:p@db/hatescan"),
            ("DATABASE_POOL_SIZE", "2"),
        ])
        .expect("valid config");

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.vocab_path, PathBuf::from("/srv/tokenizer.json"));
        assert_eq!(config.model_url, "http://model:8501/v1/models/m:predict");
        assert_eq!(config.model_timeout, Duration::from_millis(250));
        assert_eq!(config.max_length, 80);
        assert_eq!(
            config.encoder_config(),
            EncoderConfig {
                max_length: 80,
                truncation: Truncation::Pre,
            }
        );

        let database = config.database.expect("database configured");
        assert_eq!(database.database_url, "postgres://u:p@db/hatescan");
        assert_eq!(database.max_connections, 2);
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = config_from(&[("HATESCAN_MAX_LENGTH", "fifty")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "HATESCAN_MAX_LENGTH", .. }
        ));

        assert!(config_from(&[("HATESCAN_MODEL_TIMEOUT_MS", "-1")]).is_err());
        assert!(config_from(&[("HATESCAN_MAX_LENGTH", "0")]).is_err());
    }

    #[test]
    fn truncation_side() {
        let config = config_from(&[("HATESCAN_TRUNCATION", " Post ")]).expect("valid config");
        assert_eq!(config.truncation, Truncation::Post);

        let err = config_from(&[("HATESCAN_TRUNCATION", "middle")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "HATESCAN_TRUNCATION",
                expected: "`pre` or `post`",
                value: "middle".to_owned(),
            }
        );
    }

    #[test]
    fn pool_size_only_checked_with_database() {
        assert!(config_from(&[("DATABASE_POOL_SIZE", "lots")]).is_ok());
        assert!(config_from(&[
            ("DATABASE_URL", "postgres://db/hatescan"),
            ("DATABASE_POOL_SIZE", "lots"),
        ])
        .is_err());
    }

    #[test]
    fn blank_database_url_disables_store() {
        let config = config_from(&[("DATABASE_URL", "  ")]).expect("valid config");
        assert!(config.database.is_none());
    }

    #[test]
    fn masks_password() {
        assert_eq!(
            mask_database_url("postgres://admin:secret@db:5432/hatescan"),
            "postgres://admin:****@db:5432/hatescan"
        );
        assert_eq!(mask_database_url("postgres://db/hatescan"), "postgres://db/hatescan");
        assert_eq!(mask_database_url("postgres://admin@db"), "postgres://admin@db");
    }
}
