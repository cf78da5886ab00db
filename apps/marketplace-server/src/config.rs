// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. A `.env`
//! file in the working directory is read first if present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ACCESS_TOKEN_TTL_HOURS` | Access token lifetime | `24` |
//! | `REFRESH_TOKEN_TTL_HOURS` | Refresh token lifetime | `168` |
//! | `SEED_ADMIN_EMAIL` | Bootstrap admin account email | Optional |
//! | `SEED_ADMIN_PASSWORD` | Bootstrap admin account password | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ACCESS_TTL_ENV: &str = "ACCESS_TOKEN_TTL_HOURS";
pub const REFRESH_TTL_ENV: &str = "REFRESH_TOKEN_TTL_HOURS";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Access tokens live for 24 hours unless configured otherwise.
pub const DEFAULT_ACCESS_TTL_HOURS: i64 = 24;
/// Refresh tokens live for 7 days unless configured otherwise.
pub const DEFAULT_REFRESH_TTL_HOURS: i64 = 168;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Startup configuration errors. Any of these aborts the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("{0} environment variable must not be empty")]
    Empty(&'static str),
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to load .env file: {0}")]
    DotEnv(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                value: value.to_string(),
                reason: "expected `json` or `pretty`".to_string(),
            }),
        }
    }
}

/// Token signing configuration handed to the codec at construction.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 secret (never logged)
    pub secret: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Create with the default lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::hours(DEFAULT_ACCESS_TTL_HOURS),
            refresh_ttl: Duration::hours(DEFAULT_REFRESH_TTL_HOURS),
        }
    }

    pub fn with_lifetimes(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Optional admin account created at startup.
#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub log_format: LogFormat,
    pub seed_admin: Option<SeedAdmin>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Reads `.env` first when one exists. Fails when `JWT_SECRET` is unset
    /// or empty; there is no fallback secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        accept_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        if secret.trim().is_empty() {
            return Err(ConfigError::Empty(JWT_SECRET_ENV));
        }

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: HOST_ENV,
                value: host.clone(),
                reason: e.to_string(),
            })?;

        let access_hours = parse_hours(&lookup, ACCESS_TTL_ENV, DEFAULT_ACCESS_TTL_HOURS)?;
        let refresh_hours = parse_hours(&lookup, REFRESH_TTL_ENV, DEFAULT_REFRESH_TTL_HOURS)?;
        if refresh_hours <= access_hours {
            return Err(ConfigError::Invalid {
                name: REFRESH_TTL_ENV,
                value: refresh_hours.to_string(),
                reason: format!("must be longer than {ACCESS_TTL_ENV} ({access_hours})"),
            });
        }

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(&raw)?,
            None => LogFormat::default(),
        };

        let seed_admin = match (lookup(SEED_ADMIN_EMAIL_ENV), lookup(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(SeedAdmin { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(SEED_ADMIN_EMAIL_ENV)),
        };

        Ok(Self {
            bind_addr,
            auth: AuthConfig::new(secret)
                .with_lifetimes(Duration::hours(access_hours), Duration::hours(refresh_hours)),
            log_format,
            seed_admin,
        })
    }
}

/// A missing `.env` file is normal outside local development; a file that
/// exists but does not parse is an error.
fn accept_dotenv<T>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::DotEnv(e.to_string())),
    }
}

fn parse_hours<F>(lookup: &F, name: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(hours) if hours > 0 => Ok(hours),
        Ok(_) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "must be a positive number of hours".to_string(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
