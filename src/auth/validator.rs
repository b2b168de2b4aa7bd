// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification and claim validation.
//!
//! Checks run in a fixed order and each has its own failure:
//!
//! 1. algorithm allow-list (unsigned and `none` tokens never get further)
//! 2. signature against the resolved key
//! 3. required claims present and well-typed
//! 4. issuer
//! 5. audience
//! 6. `exp` / `nbf` with a small clock-skew allowance
//!
//! The algorithm used to verify comes from the configured allow-list and
//! must fit the resolved key. What the token declares is only a selector.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, Validation};
use serde::Deserialize;

use super::claims::{DecodedClaims, RawClaims};
use super::config::AuthConfig;
use super::jwks::SigningKey;
use super::AuthError;

/// The parts of an unverified header needed to pick a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    pub algorithm: Algorithm,
    pub kid: String,
}

/// A payload whose signature has been verified, claims not yet validated.
#[derive(Debug)]
pub struct VerifiedToken {
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
    #[serde(default)]
    kid: Option<String>,
}

/// Verifies bearer credentials against provider keys and validates claims.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    issuer: String,
    audience: String,
    allowed_algorithms: Vec<Algorithm>,
    /// Clock skew in seconds
    leeway: i64,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            allowed_algorithms: config.allowed_algorithms.clone(),
            leeway: i64::try_from(config.clock_skew.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Parse the unverified header and apply the algorithm allow-list.
    pub fn inspect(&self, credential: &str) -> Result<TokenHeader, AuthError> {
        let mut segments = credential.split('.');
        let (Some(header), Some(_payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::MalformedToken("token must have three segments"));
        };

        let header_bytes = Base64UrlUnpadded::decode_vec(header)
            .map_err(|_| AuthError::MalformedToken("header is not base64url"))?;
        let raw: RawHeader = serde_json::from_slice(&header_bytes)
            .map_err(|_| AuthError::MalformedToken("header is not a JSON object"))?;

        if signature.is_empty() {
            return Err(AuthError::DisallowedAlgorithm);
        }

        // `none` and anything jsonwebtoken does not know fail to parse.
        let algorithm: Algorithm = raw
            .alg
            .parse()
            .map_err(|_| AuthError::DisallowedAlgorithm)?;
        if !self.allowed_algorithms.contains(&algorithm) {
            return Err(AuthError::DisallowedAlgorithm);
        }

        let kid = raw
            .kid
            .filter(|kid| !kid.is_empty())
            .ok_or(AuthError::MalformedToken("header has no kid"))?;

        Ok(TokenHeader { algorithm, kid })
    }

    /// Verify `credential` with `key` and validate its claims against now.
    pub fn validate(&self, credential: &str, key: &SigningKey) -> Result<DecodedClaims, AuthError> {
        self.validate_at(credential, key, Utc::now().timestamp())
    }

    /// Same as [`validate`](Self::validate) with an explicit Unix time.
    pub fn validate_at(
        &self,
        credential: &str,
        key: &SigningKey,
        now: i64,
    ) -> Result<DecodedClaims, AuthError> {
        let verified = self.verify(credential, key)?;
        self.validate_claims(verified, now)
    }

    /// Steps 1 and 2: allow-list and signature.
    pub fn verify(&self, credential: &str, key: &SigningKey) -> Result<VerifiedToken, AuthError> {
        let header = self.inspect(credential)?;

        if !key.accepts(header.algorithm) {
            return Err(AuthError::InvalidSignature);
        }

        // Signature only: every claim check is ours.
        let mut validation = Validation::new(header.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let payload = decode::<serde_json::Value>(credential, key.decoding_key(), &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::Json(_) => AuthError::MalformedClaims,
                ErrorKind::Base64(_) | ErrorKind::Utf8(_) | ErrorKind::InvalidToken => {
                    AuthError::MalformedToken("token segments are not decodable")
                }
                _ => AuthError::InvalidSignature,
            })?
            .claims;

        Ok(VerifiedToken { payload })
    }

    /// Steps 3 to 6 on a payload whose signature already checked out.
    pub fn validate_claims(
        &self,
        verified: VerifiedToken,
        now: i64,
    ) -> Result<DecodedClaims, AuthError> {
        let claims: RawClaims =
            serde_json::from_value(verified.payload).map_err(|_| AuthError::MalformedClaims)?;

        if claims.iss != self.issuer {
            return Err(AuthError::InvalidIssuer);
        }

        if !claims.aud.contains(&self.audience) {
            return Err(AuthError::InvalidAudience);
        }

        if now > claims.exp.saturating_add(self.leeway) {
            return Err(AuthError::Expired);
        }
        if let Some(nbf) = claims.nbf {
            if now.saturating_add(self.leeway) < nbf {
                return Err(AuthError::NotYetValid);
            }
        }

        Ok(DecodedClaims::from_validated(claims))
    }
}
