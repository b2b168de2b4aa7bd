// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Immutable authentication configuration.
//!
//! Built once at startup (see [`crate::config::AppConfig`]) and handed to
//! [`AuthGuard::new`](super::AuthGuard::new). Nothing mutates it afterwards.

use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default deadline for a single key-set fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default clock skew tolerance applied to `exp` and `nbf`.
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(5);

/// Upper bound on the clock skew tolerance.
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(300);

/// Minimum age of the cached key set before an unknown `kid` may force a
/// refetch.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Published key-set endpoint
    pub jwks_url: Url,
    /// Expected `iss` claim
    pub issuer: String,
    /// API identifier that must appear in `aud`
    pub audience: String,
    /// Algorithms a token may be signed with
    pub allowed_algorithms: Vec<Algorithm>,
    /// How long a fetched key set is trusted
    pub cache_ttl: Duration,
    /// Deadline for one key-set fetch
    pub fetch_timeout: Duration,
    /// Allowed clock skew for `exp`/`nbf`, at most [`MAX_CLOCK_SKEW`]
    pub clock_skew: Duration,
    /// Unknown `kid`s seen within this long of the last fetch fail without
    /// refetching
    pub min_refresh_interval: Duration,
}

impl AuthConfig {
    /// Configuration for a hosted provider domain (e.g. `tenant.eu.auth0.com`).
    ///
    /// Derives `https://{domain}/` as the issuer and
    /// `https://{domain}/.well-known/jwks.json` as the key-set endpoint.
    pub fn for_domain(domain: &str, audience: impl Into<String>) -> Result<Self, url::ParseError> {
        let base = Url::parse(&format!("https://{}/", domain.trim_end_matches('/')))?;
        let jwks_url = base.join(".well-known/jwks.json")?;

        Ok(Self {
            jwks_url,
            issuer: base.to_string(),
            audience: audience.into(),
            allowed_algorithms: vec![Algorithm::RS256],
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            clock_skew: DEFAULT_CLOCK_SKEW,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
        })
    }

    /// Override the expected issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Override the key-set endpoint.
    pub fn with_jwks_url(mut self, url: Url) -> Self {
        self.jwks_url = url;
        self
    }

    /// Replace the algorithm allow-list.
    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.allowed_algorithms = algorithms;
        self
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the clock skew tolerance, clamped to [`MAX_CLOCK_SKEW`].
    pub fn with_clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew.min(MAX_CLOCK_SKEW);
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }
}
