// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error,
    models::{
        Actor, ActorWithCredits, CastMember, Casting, CreateActorRequest, CreateCastingRequest,
        CreateMovieRequest, Credit, Movie, MovieWithCast, UpdateActorRequest, UpdateMovieRequest,
    },
    state::AppState,
};

pub mod actors;
pub mod casting;
pub mod extract;
pub mod health;
pub mod movies;

#[cfg(test)]
pub(crate) mod testing;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/movies", get(movies::list_movies).post(movies::create_movie))
        .route(
            "/movies/{id}",
            patch(movies::update_movie).delete(movies::delete_movie),
        )
        .route("/actors", get(actors::list_actors).post(actors::create_actor))
        .route(
            "/actors/{id}",
            patch(actors::update_actor).delete(actors::delete_actor),
        )
        .route("/casting", post(casting::create_casting))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .method_not_allowed_fallback(error::method_not_allowed)
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(error::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        movies::list_movies,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        actors::list_actors,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
        casting::create_casting,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Movie,
            MovieWithCast,
            CastMember,
            CreateMovieRequest,
            UpdateMovieRequest,
            Actor,
            ActorWithCredits,
            Credit,
            CreateActorRequest,
            UpdateActorRequest,
            Casting,
            CreateCastingRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Movies", description = "Movie records"),
        (name = "Actors", description = "Actor records"),
        (name = "Casting", description = "Casting actors in movies"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
struct ApiDoc;
