// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    api::extract::ApiJson,
    auth::{permissions::PostCasting, Permit},
    error::ApiError,
    models::{CreateCastingRequest, Envelope},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/casting",
    tag = "Casting",
    request_body = CreateCastingRequest,
    security(("bearer" = ["post:casting"])),
    responses(
        (status = 200, description = "Actor cast in movie"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found"),
        (status = 404, description = "Movie or actor does not exist"),
        (status = 422, description = "Actor already cast in this movie")
    )
)]
pub async fn create_casting(
    Permit { claims, .. }: Permit<PostCasting>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCastingRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let mut store = state.store.write().await;
    let casting = store.create_casting(request)?;
    tracing::info!(
        casting_id = casting.id,
        movie_id = casting.movie_id,
        actor_id = casting.actor_id,
        cast_by = claims.subject(),
        "Casting created"
    );
    Ok(Json(Envelope::ok()))
}
