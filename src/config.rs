// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`AppConfig`] built from
//! them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH0_DOMAIN` | Identity provider domain | Required |
//! | `API_AUDIENCE` | API identifier expected in `aud` | Required |
//! | `AUTH_ISSUER` | Expected `iss` claim | `https://{AUTH0_DOMAIN}/` |
//! | `AUTH_JWKS_URL` | Key-set endpoint | `https://{AUTH0_DOMAIN}/.well-known/jwks.json` |
//! | `AUTH_ALGORITHMS` | Comma-separated signing algorithm allow-list | `RS256` |
//! | `JWKS_CACHE_TTL_SECS` | Key-set cache lifetime | `300` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Deadline for one key-set fetch | `5` |
//! | `AUTH_CLOCK_SKEW_SECS` | Leeway applied to `exp`/`nbf`, at most `300` | `5` |
//! | `JWKS_MIN_REFRESH_SECS` | Minimum key-set age before an unknown `kid` forces a refetch | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `TLS_CERT_PATH` | PEM certificate chain; serve HTTPS when set with `TLS_KEY_PATH` | Unset |
//! | `TLS_KEY_PATH` | PEM private key | Unset |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;
use url::Url;

use crate::auth::{config::MAX_CLOCK_SKEW, AuthConfig};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Identity provider domain, e.g. `agency.eu.auth0.com`.
pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";

/// API identifier registered with the identity provider.
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";

pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";

/// Overrides the key-set endpoint derived from the domain, for
/// self-hosted providers and local testing.
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";

/// Comma-separated, e.g. `RS256,ES256`. `none` is not an algorithm.
pub const AUTH_ALGORITHMS_ENV: &str = "AUTH_ALGORITHMS";

pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const AUTH_CLOCK_SKEW_ENV: &str = "AUTH_CLOCK_SKEW_SECS";
pub const JWKS_MIN_REFRESH_ENV: &str = "JWKS_MIN_REFRESH_SECS";

/// `json` for structured logs, anything else for human-readable output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// PEM files to serve HTTPS with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Process configuration, immutable once loaded.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub log_format: LogFormat,
    pub tls: Option<TlsPaths>,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to read variables. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip = IpAddr::from_str(host.trim())
            .map_err(|e| ConfigError::invalid(HOST_ENV, &host, e))?;
        let port = match get(PORT_ENV) {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid(PORT_ENV, &port, e))?,
            None => DEFAULT_PORT,
        };

        let domain = require(AUTH0_DOMAIN_ENV)?;
        let audience = require(API_AUDIENCE_ENV)?;
        let mut auth = AuthConfig::for_domain(domain.trim(), audience.trim())
            .map_err(|e| ConfigError::invalid(AUTH0_DOMAIN_ENV, &domain, e))?;

        if let Some(issuer) = get(AUTH_ISSUER_ENV) {
            auth = auth.with_issuer(issuer.trim());
        }
        if let Some(url) = get(AUTH_JWKS_URL_ENV) {
            let parsed =
                Url::parse(url.trim()).map_err(|e| ConfigError::invalid(AUTH_JWKS_URL_ENV, &url, e))?;
            auth = auth.with_jwks_url(parsed);
        }
        if let Some(list) = get(AUTH_ALGORITHMS_ENV) {
            auth = auth.with_algorithms(parse_algorithms(&list)?);
        }
        if let Some(ttl) = seconds(&get, JWKS_CACHE_TTL_ENV)? {
            auth = auth.with_cache_ttl(ttl);
        }
        if let Some(timeout) = seconds(&get, JWKS_FETCH_TIMEOUT_ENV)? {
            if timeout.is_zero() {
                return Err(ConfigError::invalid(JWKS_FETCH_TIMEOUT_ENV, "0", "must be positive"));
            }
            auth = auth.with_fetch_timeout(timeout);
        }
        if let Some(skew) = seconds(&get, AUTH_CLOCK_SKEW_ENV)? {
            if skew > MAX_CLOCK_SKEW {
                return Err(ConfigError::invalid(
                    AUTH_CLOCK_SKEW_ENV,
                    &skew.as_secs().to_string(),
                    format!("must be at most {}", MAX_CLOCK_SKEW.as_secs()),
                ));
            }
            auth = auth.with_clock_skew(skew);
        }
        if let Some(interval) = seconds(&get, JWKS_MIN_REFRESH_ENV)? {
            auth = auth.with_min_refresh_interval(interval);
        }

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(format) if format.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            auth,
            log_format,
            tls,
        })
    }
}

fn seconds<G>(get: &G, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::invalid(name, &raw, e))
        })
        .transpose()
}

fn parse_algorithms(list: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = list
        .split(',')
        .map(str::trim)
        .filter(|alg| !alg.is_empty())
        .map(|alg| {
            Algorithm::from_str(alg).map_err(|e| ConfigError::invalid(AUTH_ALGORITHMS_ENV, alg, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::invalid(AUTH_ALGORITHMS_ENV, list, "no algorithms listed"));
    }
    Ok(algorithms)
}
