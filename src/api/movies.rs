// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    api::extract::{ApiJson, ApiPath},
    auth::{
        permissions::{DeleteMovies, GetMovies, PatchMovies, PostMovies},
        Permit,
    },
    error::ApiError,
    models::{CreateMovieRequest, Envelope, Movie, MovieWithCast, UpdateMovieRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/movies",
    tag = "Movies",
    security(("bearer" = ["get:movies"])),
    responses(
        (status = 200, description = "All movies with their cast", body = Envelope<Vec<MovieWithCast>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found")
    )
)]
pub async fn list_movies(
    _: Permit<GetMovies>,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<MovieWithCast>>> {
    let store = state.store.read().await;
    Json(Envelope::data(store.list_movies()))
}

#[utoipa::path(
    post,
    path = "/movies",
    tag = "Movies",
    request_body = CreateMovieRequest,
    security(("bearer" = ["post:movies"])),
    responses(
        (status = 200, description = "Movie created", body = Envelope<Movie>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found"),
        (status = 422, description = "Missing title or invalid release date")
    )
)]
pub async fn create_movie(
    _: Permit<PostMovies>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMovieRequest>,
) -> Result<Json<Envelope<Movie>>, ApiError> {
    let mut store = state.store.write().await;
    let movie = store.create_movie(request)?;
    tracing::info!(movie_id = movie.id, "Movie created");
    Ok(Json(Envelope::data(movie)))
}

#[utoipa::path(
    patch,
    path = "/movies/{id}",
    tag = "Movies",
    params(("id" = u64, Path, description = "Movie id")),
    request_body = UpdateMovieRequest,
    security(("bearer" = ["patch:movies"])),
    responses(
        (status = 200, description = "Movie updated"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found"),
        (status = 404, description = "No Result Found"),
        (status = 422, description = "Invalid field value")
    )
)]
pub async fn update_movie(
    _: Permit<PatchMovies>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(request): ApiJson<UpdateMovieRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let mut store = state.store.write().await;
    store.update_movie(id, request)?;
    Ok(Json(Envelope::ok()))
}

#[utoipa::path(
    delete,
    path = "/movies/{id}",
    tag = "Movies",
    params(("id" = u64, Path, description = "Movie id")),
    security(("bearer" = ["delete:movies"])),
    responses(
        (status = 200, description = "Movie and its castings deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Permission not found"),
        (status = 404, description = "No Result Found")
    )
)]
pub async fn delete_movie(
    _: Permit<DeleteMovies>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let mut store = state.store.write().await;
    store.delete_movie(id)?;
    tracing::info!(movie_id = id, "Movie deleted");
    Ok(Json(Envelope::ok()))
}
