// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims.
//!
//! [`RawClaims`] is what the verified payload deserializes into; the
//! validator checks it field by field. [`DecodedClaims`] only comes into
//! existence after every check has passed, and has no public constructor.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub(crate) fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::One(aud) => aud == expected,
            Audience::Many(auds) => auds.iter().any(|aud| aud == expected),
        }
    }

    fn into_vec(self) -> Vec<String> {
        match self {
            Audience::One(aud) => vec![aud],
            Audience::Many(auds) => auds,
        }
    }
}

/// Payload of a signature-verified token, before claim validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    pub(crate) iss: String,
    pub(crate) sub: String,
    pub(crate) aud: Audience,
    pub(crate) exp: i64,
    pub(crate) iat: i64,
    #[serde(default)]
    pub(crate) nbf: Option<i64>,
    /// Absent claim is kept distinct from an empty grant.
    #[serde(default)]
    pub(crate) permissions: Option<Vec<String>>,
}

/// Claims of a verified and validated token.
///
/// Handed to protected handlers by [`Permit`](super::Permit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedClaims {
    issuer: String,
    audience: Vec<String>,
    subject: String,
    expires_at: i64,
    issued_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    not_before: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<BTreeSet<String>>,
}

impl DecodedClaims {
    /// Only called by the validator once every check has passed.
    pub(crate) fn from_validated(raw: RawClaims) -> Self {
        Self {
            issuer: raw.iss,
            audience: raw.aud.into_vec(),
            subject: raw.sub,
            expires_at: raw.exp,
            issued_at: raw.iat,
            not_before: raw.nbf,
            permissions: raw.permissions.map(|p| p.into_iter().collect()),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    /// Caller identity (`sub`).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Expiry as a Unix timestamp.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn not_before(&self) -> Option<i64> {
        self.not_before
    }

    /// Granted permissions, `None` when the token carried no `permissions` claim.
    pub fn permissions(&self) -> Option<&BTreeSet<String>> {
        self.permissions.as_ref()
    }
}

#[cfg(test)]
impl DecodedClaims {
    pub(crate) fn for_tests(subject: &str, permissions: Option<&[&str]>) -> Self {
        Self {
            issuer: "https://issuer.test/".into(),
            audience: vec!["casting".into()],
            subject: subject.into(),
            expires_at: 1_700_003_600,
            issued_at: 1_700_000_000,
            not_before: None,
            permissions: permissions.map(|p| p.iter().map(|s| s.to_string()).collect()),
        }
    }
}
