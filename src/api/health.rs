// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Identity provider signing keys ("ok" or "unavailable").
    pub jwks: String,
}

/// Simple health check response for liveness checks.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Signing keys are usable if cached or if a fetch succeeds now.
async fn check_jwks(state: &AppState) -> &'static str {
    let keys = state.guard.key_set();
    if keys.is_cached() {
        return "ok";
    }
    match keys.refresh().await {
        Ok(()) => "ok",
        Err(_) => "unavailable",
    }
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let jwks = check_jwks(&state).await;
    let all_ok = jwks == "ok";

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            jwks: jwks.to_string(),
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness check handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness check handler.
///
/// Returns 200 only once the identity provider's keys can be loaded.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::api::testing::TestApp;
    use crate::auth::testutil::test_config;
    use crate::auth::AuthGuard;
    use crate::state::AppState;
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn liveness_needs_no_token() {
        let app = TestApp::start().await;
        let (status, body) = app.send(Method::GET, "/health/live", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_loads_keys() {
        let app = TestApp::start().await;
        let (status, body) = app.send(Method::GET, "/health/ready", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "ok", "checks": { "service": "ok", "jwks": "ok" } })
        );
        assert!(app.state.guard.key_set().is_cached());
    }

    #[tokio::test]
    async fn unreachable_provider_is_503() {
        let provider = wiremock::MockServer::start().await;
        let config = test_config(&provider)
            .with_jwks_url("http://127.0.0.1:9/.well-known/jwks.json".parse().unwrap());
        let state = AppState::new(InMemoryStore::new(), AuthGuard::new(&config).unwrap());

        let (status, axum::Json(body)) = super::health(axum::extract::State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.checks.jwks, "unavailable");
    }
}
