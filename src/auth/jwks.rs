// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Cache model
//!
//! - The current key set is an immutable snapshot behind an [`ArcSwapOption`];
//!   reads never take a lock.
//! - A lookup misses when the snapshot is older than the TTL or does not
//!   contain the requested `kid`. A miss triggers one refresh.
//! - An unknown `kid` only forces that refresh once the snapshot is older
//!   than the minimum refresh interval; before then it fails outright, so a
//!   stream of made-up `kid`s cannot turn into a stream of fetches.
//! - Refreshes are single-flight: the fetch runs on its own tokio task and its
//!   result is shared with every waiter. The mutex only guards the slot that
//!   holds the in-flight handle, never the network call.
//! - A waiter whose request is cancelled just drops its handle; the fetch
//!   still completes and populates the cache for everyone else.
//! - Fetch failures are never papered over with stale keys: the caller gets
//!   `KeyResolutionFailed` and the request is denied.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use futures::future::{BoxFuture, FutureExt, Shared};
use jsonwebtoken::jwk::{AlgorithmParameters, EllipticCurve, Jwk, KeyAlgorithm, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use super::config::AuthConfig;
use super::error::AuthError;

/// Key type of a published key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    EllipticCurve,
    Ed25519,
}

impl KeyFamily {
    fn verifies(self, algorithm: Algorithm) -> bool {
        match self {
            KeyFamily::Rsa => matches!(
                algorithm,
                Algorithm::RS256
                    | Algorithm::RS384
                    | Algorithm::RS512
                    | Algorithm::PS256
                    | Algorithm::PS384
                    | Algorithm::PS512
            ),
            KeyFamily::EllipticCurve => matches!(algorithm, Algorithm::ES256 | Algorithm::ES384),
            KeyFamily::Ed25519 => algorithm == Algorithm::EdDSA,
        }
    }
}

/// A provider public key, ready for signature verification.
#[derive(Clone)]
pub struct SigningKey {
    kid: String,
    family: KeyFamily,
    /// `alg` declared by the JWK, if any
    algorithm: Option<Algorithm>,
    decoding_key: DecodingKey,
}

impl SigningKey {
    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn family(&self) -> KeyFamily {
        self.family
    }

    /// Whether this key may verify a signature made with `algorithm`.
    ///
    /// The key type must fit the algorithm, and a JWK that pins an `alg`
    /// only accepts that one.
    pub fn accepts(&self, algorithm: Algorithm) -> bool {
        self.family.verifies(algorithm) && self.algorithm.is_none_or(|pinned| pinned == algorithm)
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("family", &self.family)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// One fetched key set.
struct KeySet {
    keys: HashMap<String, SigningKey>,
    fetched_at: Instant,
    /// Increases by one on every successful fetch.
    generation: u64,
}

impl KeySet {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Wire shape of the key-set document. Entries are parsed one by one so a
/// single unsupported key does not poison the whole set.
#[derive(Deserialize)]
struct KeySetDocument {
    keys: Vec<serde_json::Value>,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<KeySet>, AuthError>>>;

struct Inner {
    jwks_url: Url,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    client: reqwest::Client,
    snapshot: ArcSwapOption<KeySet>,
    in_flight: Mutex<Option<SharedFetch>>,
    generation: AtomicU64,
}

/// Process-wide cache of the identity provider's signing keys.
#[derive(Clone)]
pub struct KeySetCache {
    inner: Arc<Inner>,
}

impl KeySetCache {
    /// Create a cache for the endpoint and limits in `config`.
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .connect_timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                jwks_url: config.jwks_url.clone(),
                cache_ttl: config.cache_ttl,
                min_refresh_interval: config.min_refresh_interval,
                client,
                snapshot: ArcSwapOption::empty(),
                in_flight: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        })
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &Url {
        &self.inner.jwks_url
    }

    /// Resolve the signing key for `kid`.
    ///
    /// Served from the snapshot when it is fresh and knows `kid`; otherwise
    /// at most one refresh is awaited before giving up. A fresh snapshot
    /// younger than the minimum refresh interval is not refetched for an
    /// unknown `kid`.
    pub async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError> {
        let seen = self.inner.snapshot.load_full();
        if let Some(set) = &seen {
            if set.is_fresh(self.inner.cache_ttl) {
                if let Some(key) = set.keys.get(kid) {
                    return Ok(key.clone());
                }
                if set.fetched_at.elapsed() < self.inner.min_refresh_interval {
                    debug!(kid, "Unknown kid, key set refreshed too recently to refetch");
                    return Err(unknown_kid(kid));
                }
                debug!(kid, "Unknown kid, forcing key set refresh");
            }
        }

        let set = self.refresh_after(seen.map(|set| set.generation)).await?;
        set.keys.get(kid).cloned().ok_or_else(|| unknown_kid(kid))
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let current = self.inner.snapshot.load_full().map(|set| set.generation);
        self.refresh_after(current).await.map(|_| ())
    }

    /// Check if JWKS is currently cached and valid.
    pub fn is_cached(&self) -> bool {
        self.inner
            .snapshot
            .load_full()
            .is_some_and(|set| set.is_fresh(self.inner.cache_ttl))
    }

    /// Wait for a key set newer than `seen`, joining or starting the fetch.
    async fn refresh_after(&self, seen: Option<u64>) -> Result<Arc<KeySet>, AuthError> {
        let flight = {
            let mut slot = self.inner.in_flight.lock().await;

            // A fetch finished between our miss and taking the slot.
            if let Some(current) = self.inner.snapshot.load_full() {
                if Some(current.generation) != seen {
                    return Ok(current);
                }
            }

            match slot.as_ref() {
                Some(flight) => flight.clone(),
                None => {
                    let flight = self.start_fetch();
                    *slot = Some(flight.clone());
                    flight
                }
            }
        };

        flight.await
    }

    /// Spawn the fetch so it outlives any single waiter.
    fn start_fetch(&self) -> SharedFetch {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = inner.fetch().await;
            match &result {
                Ok(set) => {
                    info!(
                        keys = set.keys.len(),
                        generation = set.generation,
                        "Key set refreshed"
                    );
                    inner.snapshot.store(Some(Arc::clone(set)));
                }
                Err(e) => warn!(error = %e, url = %inner.jwks_url, "Key set fetch failed"),
            }
            inner.in_flight.lock().await.take();
            result
        });

        async move {
            task.await.unwrap_or_else(|e| {
                Err(AuthError::KeyResolutionFailed(format!(
                    "key set fetch task failed: {e}"
                )))
            })
        }
        .boxed()
        .shared()
    }
}

impl Inner {
    /// Fetch JWKS from the endpoint.
    async fn fetch(&self) -> Result<Arc<KeySet>, AuthError> {
        let response = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(|e| AuthError::KeyResolutionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyResolutionFailed(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let document: KeySetDocument = response
            .json()
            .await
            .map_err(|e| AuthError::KeyResolutionFailed(e.to_string()))?;

        let keys: HashMap<String, SigningKey> = document
            .keys
            .into_iter()
            .filter_map(|value| {
                let jwk: Jwk = serde_json::from_value(value)
                    .inspect_err(|e| debug!(error = %e, "Skipping unparsable JWK"))
                    .ok()?;
                jwk_to_signing_key(&jwk)
            })
            .map(|key| (key.kid.clone(), key))
            .collect();

        if keys.is_empty() {
            return Err(AuthError::KeyResolutionFailed(
                "key set contains no usable signing keys".to_string(),
            ));
        }

        Ok(Arc::new(KeySet {
            keys,
            fetched_at: Instant::now(),
            generation: self.generation.fetch_add(1, Ordering::Relaxed) + 1,
        }))
    }
}

fn unknown_kid(kid: &str) -> AuthError {
    AuthError::KeyResolutionFailed(format!("no key with kid {kid}"))
}

fn signing_algorithm(alg: &KeyAlgorithm) -> Option<Algorithm> {
    match alg {
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    }
}

/// Convert a JWK to a signing key, or `None` if it cannot verify signatures.
pub(crate) fn jwk_to_signing_key(jwk: &Jwk) -> Option<SigningKey> {
    let kid = jwk.common.key_id.clone()?;

    if matches!(&jwk.common.public_key_use, Some(usage) if !matches!(usage, PublicKeyUse::Signature)) {
        debug!(kid, "Skipping non-signature JWK");
        return None;
    }

    let algorithm = match &jwk.common.key_algorithm {
        Some(declared) => Some(signing_algorithm(declared)?),
        None => None,
    };

    let (family, decoding_key) = match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => (
            KeyFamily::Rsa,
            DecodingKey::from_rsa_components(&rsa.n, &rsa.e).ok()?,
        ),
        AlgorithmParameters::EllipticCurve(ec) => (
            KeyFamily::EllipticCurve,
            DecodingKey::from_ec_components(&ec.x, &ec.y).ok()?,
        ),
        AlgorithmParameters::OctetKeyPair(okp) if matches!(okp.curve, EllipticCurve::Ed25519) => (
            KeyFamily::Ed25519,
            DecodingKey::from_ed_components(&okp.x).ok()?,
        ),
        _ => {
            debug!(kid, "Skipping JWK with unsupported key type");
            return None;
        }
    };

    let key = SigningKey {
        kid,
        family,
        algorithm,
        decoding_key,
    };
    key.algorithm
        .is_none_or(|alg| family.verifies(alg))
        .then_some(key)
}
