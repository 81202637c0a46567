//! Central module for application-wide configuration settings.
//!
//! This module loads and validates configuration parameters such as the bind
//! address, the token signing secret and algorithm, the login account, and the
//! location and names of the fitted artifacts in the model registry. Values
//! come from `ADMIT_*` environment variables (a `.env` file is read first by
//! the binaries) and fall back to development defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use admit_adapters::LATEST_TAG;
use chrono::Duration;
use thiserror::Error;

use crate::auth::{parse_hmac_algorithm, TokenConfig, DEFAULT_TOKEN_TTL_MINUTES};

pub const DEV_SECRET: &str = "change-me-admission-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: TokenConfig,
    pub username: String,
    pub password: String,
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.token.secret == DEV_SECRET
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub registry_dir: PathBuf,
    pub model_name: String,
    pub scaler_name: String,
    /// A concrete version or `latest`.
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub artifacts: ArtifactConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = get("ADMIT_HOST", "0.0.0.0");
        let host = host.parse::<IpAddr>().map_err(|err| ConfigError::Invalid {
            key: "ADMIT_HOST",
            message: format!("{host:?}: {err}"),
        })?;

        let port = get("ADMIT_PORT", "3000");
        let port = port.parse::<u16>().map_err(|err| ConfigError::Invalid {
            key: "ADMIT_PORT",
            message: format!("{port:?}: {err}"),
        })?;

        let algorithm = get("ADMIT_JWT_ALGORITHM", "HS256");
        let algorithm = parse_hmac_algorithm(&algorithm).ok_or_else(|| ConfigError::Invalid {
            key: "ADMIT_JWT_ALGORITHM",
            message: format!("{algorithm:?} is not one of HS256, HS384, HS512"),
        })?;

        let ttl = get("ADMIT_TOKEN_TTL_MINUTES", &DEFAULT_TOKEN_TTL_MINUTES.to_string());
        let ttl = ttl
            .parse::<i64>()
            .ok()
            .filter(|minutes| (1..=24 * 60).contains(minutes))
            .ok_or_else(|| ConfigError::Invalid {
                key: "ADMIT_TOKEN_TTL_MINUTES",
                message: format!("{ttl:?} is not a number of minutes between 1 and 1440"),
            })?;

        let version = get("ADMIT_ARTIFACT_VERSION", LATEST_TAG);

        Ok(Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                token: TokenConfig {
                    secret: get("ADMIT_JWT_SECRET", DEV_SECRET),
                    algorithm,
                    ttl: Duration::minutes(ttl),
                },
                username: get("ADMIT_USERNAME", "admin"),
                password: get("ADMIT_PASSWORD", "password"),
            },
            artifacts: ArtifactConfig {
                registry_dir: PathBuf::from(get("ADMIT_REGISTRY_DIR", "models/registry")),
                model_name: get("ADMIT_MODEL_NAME", "admission_model"),
                scaler_name: get("ADMIT_SCALER_NAME", "admission_scaler"),
                version,
            },
        })
    }
}
