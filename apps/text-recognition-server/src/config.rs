//! Configuration management for the text recognition server

use serde::Deserialize;
use std::env;

use crate::error::ConfigError;
use crate::ocr::ProviderKind;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub aws: AwsConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    /// Endpoint override for Textract (e.g. a local emulator)
    pub textract_endpoint: Option<String>,
    /// Endpoint override for Rekognition
    pub rekognition_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Providers in registration order
    pub providers: Vec<ProviderKind>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            aws: AwsConfig {
                region: "eu-central-1".to_string(),
                textract_endpoint: None,
                rekognition_endpoint: None,
            },
            ocr: OcrConfig {
                providers: vec![ProviderKind::Textract, ProviderKind::Rekognition],
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("SERVER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value,
            })?,
            None => defaults.server.port,
        };

        let providers = match lookup("OCR_PROVIDERS") {
            Some(value) => parse_providers(&value)?,
            None => defaults.ocr.providers,
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            aws: AwsConfig {
                region: lookup("AWS_REGION").unwrap_or(defaults.aws.region),
                textract_endpoint: lookup("TEXTRACT_ENDPOINT"),
                rekognition_endpoint: lookup("REKOGNITION_ENDPOINT"),
            },
            ocr: OcrConfig { providers },
        })
    }
}

/// Parse a comma-separated provider list, keeping order and dropping duplicates
fn parse_providers(value: &str) -> Result<Vec<ProviderKind>, ConfigError> {
    let mut providers = Vec::new();
    for name in value.split(',').filter(|s| !s.trim().is_empty()) {
        let kind: ProviderKind = name.parse().map_err(ConfigError::UnknownProvider)?;
        if !providers.contains(&kind) {
            providers.push(kind);
        }
    }

    if providers.is_empty() {
        return Err(ConfigError::NoProviders);
    }
    Ok(providers)
}
