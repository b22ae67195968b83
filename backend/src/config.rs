//! Runtime configuration, read once at startup from the environment.
//!
//! An optional `.env` file next to the binary is loaded first. Recognised keys:
//! - `HERD_HOST` (default `127.0.0.1`)
//! - `HERD_PORT` (default `8080`)
//! - `HERD_DATABASE` (default `herd.sqlite`)
//! - `HERD_MAX_PAYLOAD_MB` (default `10`), limit for JSON bodies and uploads.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub max_payload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: PathBuf::from("herd.sqlite"),
            max_payload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(host) = lookup("HERD_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("HERD_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "HERD_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(path) = lookup("HERD_DATABASE") {
            config.database = PathBuf::from(path);
        }
        if let Some(mb) = lookup("HERD_MAX_PAYLOAD_MB") {
            let mb: usize = mb
                .trim()
                .parse()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "HERD_MAX_PAYLOAD_MB",
                    value: mb.clone(),
                })?;
            config.max_payload_bytes = mb * 1024 * 1024;
        }

        Ok(config)
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
