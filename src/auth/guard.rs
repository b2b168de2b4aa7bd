// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authorization pipeline run before every protected handler.
//!
//! ```text
//! Start → TokenExtracted → KeyResolved → SignatureVerified → ClaimsValidated → Authorized
//!   └──────────┴───────────────┴──────────────┴──────────────────┴──────→ Denied
//! ```
//!
//! Stages run in that order and none is skipped. No claim is looked at
//! before the signature has been verified.

use axum::http::HeaderValue;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::{
    extractor::bearer_token, permissions, AuthConfig, AuthError, AuthFailure, DecodedClaims,
    KeySetCache, TokenValidator,
};

/// Pipeline state, as reached so far for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStage {
    Start,
    TokenExtracted,
    KeyResolved,
    SignatureVerified,
    ClaimsValidated,
    Authorized,
}

/// Outcome of [`AuthGuard::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// The handler runs with these claims.
    Authorized(DecodedClaims),
    /// The handler never runs; this is the response.
    Denied(AuthFailure),
}

/// Authentication and authorization guard.
pub struct AuthGuard {
    keys: KeySetCache,
    validator: TokenValidator,
}

impl AuthGuard {
    /// Build the guard from an immutable configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            keys: KeySetCache::new(config)?,
            validator: TokenValidator::new(config),
        })
    }

    /// The key-set cache, for readiness checks.
    pub fn key_set(&self) -> &KeySetCache {
        &self.keys
    }

    /// Decide whether a request carrying `header` may use a route that
    /// requires `required`.
    #[tracing::instrument(name = "auth", skip_all, fields(permission = required))]
    pub async fn authorize(&self, header: Option<&HeaderValue>, required: &str) -> AuthDecision {
        let mut stage = GuardStage::Start;

        match self.run(header, required, &mut stage).await {
            Ok(claims) => {
                debug!(subject = claims.subject(), "Request authorized");
                AuthDecision::Authorized(claims)
            }
            Err(error) => {
                match &error {
                    AuthError::KeyResolutionFailed(detail) => {
                        warn!(?stage, detail = %detail, "Request denied: signing key unavailable");
                    }
                    AuthError::InsufficientPermission => {
                        info!(?stage, "Request denied: permission not granted");
                    }
                    other => {
                        debug!(?stage, code = other.error_code(), error = %other, "Request denied");
                    }
                }
                AuthDecision::Denied(error.into())
            }
        }
    }

    async fn run(
        &self,
        header: Option<&HeaderValue>,
        required: &str,
        stage: &mut GuardStage,
    ) -> Result<DecodedClaims, AuthError> {
        let credential = bearer_token(header)?;
        *stage = GuardStage::TokenExtracted;

        let token_header = self.validator.inspect(credential)?;
        let key = self.keys.resolve(&token_header.kid).await?;
        *stage = GuardStage::KeyResolved;

        let verified = self.validator.verify(credential, &key)?;
        *stage = GuardStage::SignatureVerified;

        let claims = self
            .validator
            .validate_claims(verified, Utc::now().timestamp())?;
        *stage = GuardStage::ClaimsValidated;

        permissions::check(&claims, required)?;
        *stage = GuardStage::Authorized;

        Ok(claims)
    }
}
