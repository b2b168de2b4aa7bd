// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Router test harness: a mock identity provider, a signing key and a
//! helper that drives one request through the full router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::testutil::{claims_with, jwks_body, test_config, TestKey};
use crate::auth::AuthGuard;
use crate::state::AppState;
use crate::store::InMemoryStore;

use super::router;

pub struct TestApp {
    pub state: AppState,
    pub key: TestKey,
    _provider: MockServer,
}

impl TestApp {
    pub async fn start() -> Self {
        let provider = MockServer::start().await;
        let key = TestKey::new("signing-key", 7);
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body(&[&key])))
            .mount(&provider)
            .await;

        let guard = AuthGuard::new(&test_config(&provider)).expect("guard");
        Self {
            state: AppState::new(InMemoryStore::new(), guard),
            key,
            _provider: provider,
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// A valid token granting `permissions`.
    pub fn token(&self, permissions: &[&str]) -> String {
        self.key.sign(&claims_with(permissions))
    }

    /// Send one request; returns the status and the JSON body (`Null` if empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
