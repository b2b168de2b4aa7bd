// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and per-route permission checks for the
//! Casting Agency API.
//!
//! ## Auth Flow
//!
//! 1. The client obtains an access token from the identity provider (Auth0)
//! 2. The client sends `Authorization: Bearer <access token>`
//! 3. The server:
//!    - Resolves the signing key by `kid` from the cached provider JWKS
//!    - Verifies the signature against an algorithm allow-list
//!    - Validates issuer, audience, expiry and not-before
//!    - Checks the route's permission against the `permissions` claim
//!
//! ## Security
//!
//! - Every resource endpoint requires a permission; only health checks are open
//! - An unreachable provider or an unknown key denies the request
//! - Tokens are never logged
//! - Clock skew tolerance defaults to 5 seconds

pub mod claims;
pub mod config;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod jwks;
pub mod permissions;
pub mod validator;

#[cfg(test)]
pub(crate) mod testutil;

pub use claims::DecodedClaims;
pub use config::AuthConfig;
pub use error::{AuthError, AuthFailure};
pub use extractor::{bearer_token, Permit};
pub use guard::{AuthDecision, AuthGuard, GuardStage};
pub use jwks::{KeyFamily, KeySetCache, SigningKey};
pub use permissions::RequiredPermission;
pub use validator::{TokenHeader, TokenValidator, VerifiedToken};
