// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. All types derive
//! `Serialize` and/or `Deserialize`, and `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Movies**: titles with a release date
//! - **Actors**: performers with age and gender
//! - **Castings**: links between a movie and an actor
//!
//! Successful responses are wrapped in [`Envelope`]; failures use the error
//! body in [`crate::error`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Response Envelope
// =============================================================================

/// Success wrapper: `{"success": true, "data": ...}`.
///
/// `data` is omitted for operations that return nothing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}

// =============================================================================
// Movie Models
// =============================================================================

/// A movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    /// Serialized as `YYYY-MM-DD`.
    pub release_date: NaiveDate,
}

/// An actor cast in a listed movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
}

/// A movie together with its cast, as returned by `GET /movies`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MovieWithCast {
    #[serde(flatten)]
    pub movie: Movie,
    pub actors: Vec<CastMember>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub release_date: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

// =============================================================================
// Actor Models
// =============================================================================

/// An actor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

/// A movie a listed actor is cast in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Credit {
    pub id: u64,
    pub title: String,
}

/// An actor together with their movies, as returned by `GET /actors`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ActorWithCredits {
    #[serde(flatten)]
    pub actor: Actor,
    pub movies: Vec<Credit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateActorRequest {
    /// At most 120 characters.
    pub name: Option<String>,
    pub age: Option<u32>,
    /// At most 50 characters.
    pub gender: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

// =============================================================================
// Casting Models
// =============================================================================

/// An actor's role in a movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Casting {
    pub id: u64,
    pub movie_id: u64,
    pub actor_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateCastingRequest {
    /// Movie id.
    pub movie: Option<u64>,
    /// Actor id.
    pub actor: Option<u64>,
}
