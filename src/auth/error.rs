// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! [`AuthError`] is what each pipeline stage returns internally.
//! [`AuthFailure`] is the only shape that leaves the guard: a status code,
//! a stable machine-readable code and a human description that never carries
//! internal details (fetch errors are logged, not returned).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Authentication error type.
///
/// Every variant terminates the guard pipeline in the `Denied` state.
/// `Clone` is required because key-set fetch results are shared between
/// concurrent waiters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("authorization header is missing")]
    MissingToken,
    /// Header or token structure is malformed
    #[error("malformed token: {0}")]
    MalformedToken(&'static str),
    /// Unsigned token, `none`, or an algorithm outside the allow-list
    #[error("signing algorithm is not allowed")]
    DisallowedAlgorithm,
    /// Key set could not be fetched, was malformed, or has no matching key
    #[error("key resolution failed: {0}")]
    KeyResolutionFailed(String),
    /// Signature does not match the resolved key
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Required claims absent or unparsable
    #[error("token claims are malformed")]
    MalformedClaims,
    /// Issuer does not match the configured provider
    #[error("token issuer is invalid")]
    InvalidIssuer,
    /// Audience does not contain the configured API identifier
    #[error("token audience is invalid")]
    InvalidAudience,
    /// Token expiry is in the past
    #[error("token has expired")]
    Expired,
    /// Token `nbf` is in the future
    #[error("token is not yet valid")]
    NotYetValid,
    /// Authenticated, but the route's permission was not granted
    #[error("insufficient permission")]
    InsufficientPermission,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "authorization_header_missing",
            AuthError::MalformedToken(_)
            | AuthError::DisallowedAlgorithm
            | AuthError::KeyResolutionFailed(_) => "invalid_header",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::MalformedClaims | AuthError::InvalidIssuer | AuthError::InvalidAudience => {
                "invalid_claims"
            }
            AuthError::Expired => "token_expired",
            AuthError::NotYetValid => "token_not_yet_valid",
            AuthError::InsufficientPermission => "unauthorized",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermission => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Client-facing description.
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization header is expected.",
            AuthError::MalformedToken(_) => "Authorization header must be a single bearer token.",
            AuthError::DisallowedAlgorithm => "Token signing algorithm is not accepted.",
            AuthError::KeyResolutionFailed(_) => "Unable to find the appropriate key.",
            AuthError::InvalidSignature => "Token signature is invalid.",
            AuthError::MalformedClaims => "Unable to parse authentication token.",
            AuthError::InvalidIssuer | AuthError::InvalidAudience => {
                "Incorrect claims. Please, check the audience and issuer."
            }
            AuthError::Expired => "Token expired.",
            AuthError::NotYetValid => "Token is not yet valid.",
            AuthError::InsufficientPermission => "Permission not found.",
        }
    }
}

/// The uniform rejection value handed to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub status_code: StatusCode,
    pub error_code: &'static str,
    pub description: &'static str,
}

impl From<AuthError> for AuthFailure {
    fn from(error: AuthError) -> Self {
        Self {
            status_code: error.status_code(),
            error_code: error.error_code(),
            description: error.description(),
        }
    }
}

#[derive(Serialize)]
struct AuthFailureBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let body = Json(AuthFailureBody {
            success: false,
            error: self.status_code.as_u16(),
            message: self.description,
        });
        (self.status_code, body).into_response()
    }
}
