//! Configuration management for the OCR proxy server

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub recognizer: RecognizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerConfig {
    /// Full URL of the recognizer's `/recognize` endpoint
    pub url: String,
    pub timeout_secs: u64,
}

impl RecognizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            recognizer: RecognizerConfig {
                url: "http://localhost:3001/recognize".to_string(),
                timeout_secs: 30,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// `RECOGNIZER_URL` is required; everything else falls back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("SERVER_PORT") {
            Some(value) => parse_value("SERVER_PORT", value)?,
            None => defaults.server.port,
        };

        let timeout_secs = match lookup("RECOGNIZER_TIMEOUT_SECS") {
            Some(value) => parse_value("RECOGNIZER_TIMEOUT_SECS", value)?,
            None => defaults.recognizer.timeout_secs,
        };

        let url = lookup("RECOGNIZER_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("RECOGNIZER_URL"))?;

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            recognizer: RecognizerConfig { url, timeout_secs },
        })
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}
