// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    api::extract::{ApiJson, ApiPath},
    auth::{
        permissions::{DeleteActors, GetActors, PatchActors, PostActors},
        Permit,
    },
    error::ApiError,
    models::{Actor, ActorWithCredits, CreateActorRequest, Envelope, UpdateActorRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/actors",
    tag = "Actors",
    security(("bearer" = ["get:actors"])),
    responses(
        (status = 200, description = "All actors with their movies", body = Envelope<Vec<ActorWithCredits>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found")
    )
)]
pub async fn list_actors(
    _: Permit<GetActors>,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<ActorWithCredits>>> {
    let store = state.store.read().await;
    Json(Envelope::data(store.list_actors()))
}

#[utoipa::path(
    post,
    path = "/actors",
    tag = "Actors",
    request_body = CreateActorRequest,
    security(("bearer" = ["post:actors"])),
    responses(
        (status = 200, description = "Actor created", body = Envelope<Actor>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found"),
        (status = 422, description = "Missing or oversized field")
    )
)]
pub async fn create_actor(
    _: Permit<PostActors>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateActorRequest>,
) -> Result<Json<Envelope<Actor>>, ApiError> {
    let mut store = state.store.write().await;
    let actor = store.create_actor(request)?;
    tracing::info!(actor_id = actor.id, "Actor created");
    Ok(Json(Envelope::data(actor)))
}

#[utoipa::path(
    patch,
    path = "/actors/{id}",
    tag = "Actors",
    params(("id" = u64, Path, description = "Actor id")),
    request_body = UpdateActorRequest,
    security(("bearer" = ["patch:actors"])),
    responses(
        (status = 200, description = "Actor updated"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found"),
        (status = 404, description = "No Result Found"),
        (status = 422, description = "Invalid field value")
    )
)]
pub async fn update_actor(
    _: Permit<PatchActors>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(request): ApiJson<UpdateActorRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let mut store = state.store.write().await;
    store.update_actor(id, request)?;
    Ok(Json(Envelope::ok()))
}

#[utoipa::path(
    delete,
    path = "/actors/{id}",
    tag = "Actors",
    params(("id" = u64, Path, description = "Actor id")),
    security(("bearer" = ["delete:actors"])),
    responses(
        (status = 200, description = "Actor and their castings deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found"),
        (status = 404, description = "No Result Found")
    )
)]
pub async fn delete_actor(
    _: Permit<DeleteActors>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let mut store = state.store.write().await;
    store.delete_actor(id)?;
    tracing::info!(actor_id = id, "Actor deleted");
    Ok(Json(Envelope::ok()))
}
