// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup into an
//! [`AppConfig`] and handed to the constructors that need it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH_TOKEN_SECRET` | Base64 HMAC signing secret, at least 32 bytes decoded | Required |
//! | `AUTH_TOKEN_TTL_MS` | Token lifetime in milliseconds, at most 365 days | `86400000` |
//! | `DATA_DIR` | Root directory for JSON storage | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

use base64ct::{Base64, Encoding};
use chrono::Duration;

use crate::storage::paths::DATA_ROOT;

/// Environment variable holding the base64 token signing secret.
pub const TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

/// Environment variable for the token lifetime in milliseconds.
pub const TOKEN_TTL_ENV: &str = "AUTH_TOKEN_TTL_MS";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_MS: i64 = 86_400_000;

/// Longest accepted token lifetime: 365 days.
pub const MAX_TOKEN_TTL_MS: i64 = 31_536_000_000;

/// Shortest accepted signing secret, in decoded bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is not valid base64")]
    InvalidBase64(&'static str),

    #[error("AUTH_TOKEN_SECRET must decode to at least 32 bytes (got {0})")]
    SecretTooShort(usize),

    #[error("{name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Process-wide configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub token_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_b64 = lookup(TOKEN_SECRET_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(TOKEN_SECRET_ENV))?;
        let token_secret = Base64::decode_vec(secret_b64.trim())
            .map_err(|_| ConfigError::InvalidBase64(TOKEN_SECRET_ENV))?;
        if token_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort(token_secret.len()));
        }

        let ttl_ms = match lookup(TOKEN_TTL_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|ms| (1..=MAX_TOKEN_TTL_MS).contains(ms))
                .ok_or(ConfigError::InvalidValue {
                    name: TOKEN_TTL_ENV,
                    value: raw,
                })?,
            None => DEFAULT_TOKEN_TTL_MS,
        };

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value: raw,
            })?,
            None => 8080,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            data_dir: lookup(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DATA_ROOT)),
            token_secret,
            token_ttl: Duration::milliseconds(ttl_ms),
            log_format,
        })
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // 32 bytes of 'k'
    const SECRET_B64: &str = "a2tra2tra2tra2tra2tra2tra2tra2tra2tra2tra2s=";

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[(TOKEN_SECRET_ENV, SECRET_B64)]).unwrap();
        assert_eq!(config.token_secret, vec![b'k'; 32]);
        assert_eq!(config.token_ttl, Duration::hours(24));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn missing_secret_is_fatal() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing(TOKEN_SECRET_ENV));
        assert_eq!(
            load(&[(TOKEN_SECRET_ENV, "  ")]).unwrap_err(),
            ConfigError::Missing(TOKEN_SECRET_ENV)
        );
    }

    #[test]
    fn short_or_garbled_secret_is_rejected() {
        assert_eq!(
            load(&[(TOKEN_SECRET_ENV, "c2hvcnQ=")]).unwrap_err(),
            ConfigError::SecretTooShort(5)
        );
        assert_eq!(
            load(&[(TOKEN_SECRET_ENV, "not base64!")]).unwrap_err(),
            ConfigError::InvalidBase64(TOKEN_SECRET_ENV)
        );
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            (TOKEN_SECRET_ENV, SECRET_B64),
            (TOKEN_TTL_ENV, "60000"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (DATA_DIR_ENV, "/tmp/syncup"),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();

        assert_eq!(config.token_ttl, Duration::seconds(60));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/syncup"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(matches!(
            load(&[(TOKEN_SECRET_ENV, SECRET_B64), (TOKEN_TTL_ENV, "-5")]),
            Err(ConfigError::InvalidValue { name: TOKEN_TTL_ENV, .. })
        ));
        assert!(matches!(
            load(&[(TOKEN_SECRET_ENV, SECRET_B64), (PORT_ENV, "http")]),
            Err(ConfigError::InvalidValue { name: PORT_ENV, .. })
        ));
    }

    #[test]
    fn ttl_bounds() {
        let short = load(&[(TOKEN_SECRET_ENV, SECRET_B64), (TOKEN_TTL_ENV, "500")]).unwrap();
        assert_eq!(short.token_ttl, Duration::milliseconds(500));

        let longest = MAX_TOKEN_TTL_MS.to_string();
        let config = load(&[
            (TOKEN_SECRET_ENV, SECRET_B64),
            (TOKEN_TTL_ENV, longest.as_str()),
        ])
        .unwrap();
        assert_eq!(config.token_ttl, Duration::days(365));

        for raw in ["0", "31536000001", "9223372036854775807"] {
            assert!(
                matches!(
                    load(&[(TOKEN_SECRET_ENV, SECRET_B64), (TOKEN_TTL_ENV, raw)]),
                    Err(ConfigError::InvalidValue { name: TOKEN_TTL_ENV, .. })
                ),
                "ttl {raw}"
            );
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let config = load(&[(TOKEN_SECRET_ENV, SECRET_B64)]).unwrap();
        assert!(format!("{config:?}").contains("<redacted>"));
    }
}
