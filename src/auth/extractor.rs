// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction and the axum extractor for protected handlers.
//!
//! Use `Permit<P>` in a handler to require a permission:
//!
//! ```rust,ignore
//! async fn create_movie(
//!     Permit { claims, .. }: Permit<PostMovies>,
//!     State(state): State<AppState>,
//! ) -> impl IntoResponse {
//!     // claims.subject() is the caller
//! }
//! ```
//!
//! The guard runs before the handler body; a denied request never reaches it.

use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
};

use super::{AuthDecision, AuthError, AuthFailure, AuthGuard, DecodedClaims, RequiredPermission};

/// Pull the bearer credential out of an `Authorization` header value.
///
/// Exactly `Bearer <token>`: case-sensitive scheme, a single space, one
/// non-empty token segment with no further whitespace.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedToken("authorization header is not visible ASCII"))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedToken("authorization scheme must be Bearer"))?;

    if token.is_empty() {
        return Err(AuthError::MalformedToken("bearer token is empty"));
    }
    if token.contains(char::is_whitespace) {
        return Err(AuthError::MalformedToken(
            "authorization header must hold exactly one token",
        ));
    }

    Ok(token)
}

/// Extractor for callers holding permission `P`.
pub struct Permit<P: RequiredPermission> {
    pub claims: DecodedClaims,
    _permission: PhantomData<fn() -> P>,
}

impl<S, P> FromRequestParts<S> for Permit<P>
where
    Arc<AuthGuard>: FromRef<S>,
    S: Send + Sync,
    P: RequiredPermission,
{
    type Rejection = AuthFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = Arc::<AuthGuard>::from_ref(state);

        match guard.authorize(parts.headers.get(AUTHORIZATION), P::NAME).await {
            AuthDecision::Authorized(claims) => Ok(Permit {
                claims,
                _permission: PhantomData,
            }),
            AuthDecision::Denied(failure) => Err(failure),
        }
    }
}
