// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for movies, actors and castings.
//!
//! Ids are assigned per resource, starting at 1 and never reused. Deleting a
//! movie or an actor removes every casting that references it.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::ApiError;
use crate::models::{
    Actor, ActorWithCredits, CastMember, Casting, CreateActorRequest, CreateCastingRequest,
    CreateMovieRequest, Credit, Movie, MovieWithCast, UpdateActorRequest, UpdateMovieRequest,
};

const MAX_NAME_LEN: usize = 120;
const MAX_GENDER_LEN: usize = 50;

#[derive(Default)]
pub struct InMemoryStore {
    movies: BTreeMap<u64, Movie>,
    actors: BTreeMap<u64, Actor>,
    castings: BTreeMap<u64, Casting>,
    last_movie_id: u64,
    last_actor_id: u64,
    last_casting_id: u64,
}

fn next_id(last: &mut u64) -> u64 {
    *last += 1;
    *last
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Movies
    // -------------------------------------------------------------------------

    pub fn list_movies(&self) -> Vec<MovieWithCast> {
        self.movies
            .values()
            .map(|movie| MovieWithCast {
                movie: movie.clone(),
                actors: self
                    .castings
                    .values()
                    .filter(|casting| casting.movie_id == movie.id)
                    .filter_map(|casting| self.actors.get(&casting.actor_id))
                    .map(|actor| CastMember {
                        id: actor.id,
                        name: actor.name.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn create_movie(&mut self, request: CreateMovieRequest) -> Result<Movie, ApiError> {
        let title = validate_title(request.title.as_deref())?;
        let release_date = validate_release_date(request.release_date.as_deref())?;

        let id = next_id(&mut self.last_movie_id);
        let movie = Movie {
            id,
            title,
            release_date,
        };
        self.movies.insert(id, movie.clone());
        Ok(movie)
    }

    pub fn update_movie(&mut self, id: u64, request: UpdateMovieRequest) -> Result<(), ApiError> {
        let movie = self.movies.get_mut(&id).ok_or_else(ApiError::not_found)?;

        // Validate everything before touching the record.
        let title = request
            .title
            .as_deref()
            .map(|title| validate_title(Some(title)))
            .transpose()?;
        let release_date = request
            .release_date
            .as_deref()
            .map(|date| validate_release_date(Some(date)))
            .transpose()?;

        if let Some(title) = title {
            movie.title = title;
        }
        if let Some(release_date) = release_date {
            movie.release_date = release_date;
        }
        Ok(())
    }

    pub fn delete_movie(&mut self, id: u64) -> Result<(), ApiError> {
        self.movies.remove(&id).ok_or_else(ApiError::not_found)?;
        self.castings.retain(|_, casting| casting.movie_id != id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Actors
    // -------------------------------------------------------------------------

    pub fn list_actors(&self) -> Vec<ActorWithCredits> {
        self.actors
            .values()
            .map(|actor| ActorWithCredits {
                actor: actor.clone(),
                movies: self
                    .castings
                    .values()
                    .filter(|casting| casting.actor_id == actor.id)
                    .filter_map(|casting| self.movies.get(&casting.movie_id))
                    .map(|movie| Credit {
                        id: movie.id,
                        title: movie.title.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn create_actor(&mut self, request: CreateActorRequest) -> Result<Actor, ApiError> {
        let name = validate_name(request.name.as_deref())?;
        let age = request
            .age
            .ok_or_else(|| ApiError::unprocessable("age is required"))?;
        let gender = validate_gender(request.gender.as_deref())?;

        let id = next_id(&mut self.last_actor_id);
        let actor = Actor {
            id,
            name,
            age,
            gender,
        };
        self.actors.insert(id, actor.clone());
        Ok(actor)
    }

    pub fn update_actor(&mut self, id: u64, request: UpdateActorRequest) -> Result<(), ApiError> {
        let actor = self.actors.get_mut(&id).ok_or_else(ApiError::not_found)?;

        let name = request
            .name
            .as_deref()
            .map(|name| validate_name(Some(name)))
            .transpose()?;
        let gender = request
            .gender
            .as_deref()
            .map(|gender| validate_gender(Some(gender)))
            .transpose()?;

        if let Some(name) = name {
            actor.name = name;
        }
        if let Some(age) = request.age {
            actor.age = age;
        }
        if let Some(gender) = gender {
            actor.gender = gender;
        }
        Ok(())
    }

    pub fn delete_actor(&mut self, id: u64) -> Result<(), ApiError> {
        self.actors.remove(&id).ok_or_else(ApiError::not_found)?;
        self.castings.retain(|_, casting| casting.actor_id != id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Castings
    // -------------------------------------------------------------------------

    pub fn create_casting(&mut self, request: CreateCastingRequest) -> Result<Casting, ApiError> {
        let movie_id = request
            .movie
            .filter(|id| self.movies.contains_key(id))
            .ok_or_else(ApiError::not_found)?;
        let actor_id = request
            .actor
            .filter(|id| self.actors.contains_key(id))
            .ok_or_else(ApiError::not_found)?;

        if self
            .castings
            .values()
            .any(|casting| casting.movie_id == movie_id && casting.actor_id == actor_id)
        {
            return Err(ApiError::unprocessable("actor is already cast in this movie"));
        }

        let id = next_id(&mut self.last_casting_id);
        let casting = Casting {
            id,
            movie_id,
            actor_id,
        };
        self.castings.insert(id, casting.clone());
        Ok(casting)
    }

    #[cfg(test)]
    pub fn castings(&self) -> Vec<Casting> {
        self.castings.values().cloned().collect()
    }
}

fn validate_title(title: Option<&str>) -> Result<String, ApiError> {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(ApiError::unprocessable("title is required")),
    }
}

fn validate_release_date(date: Option<&str>) -> Result<NaiveDate, ApiError> {
    let date = date.ok_or_else(|| ApiError::unprocessable("release_date is required"))?;
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::unprocessable("release_date must be a YYYY-MM-DD calendar date"))
}

fn validate_name(name: Option<&str>) -> Result<String, ApiError> {
    match name.map(str::trim) {
        Some(name) if name.is_empty() => Err(ApiError::unprocessable("name is empty")),
        Some(name) if name.chars().count() > MAX_NAME_LEN => {
            Err(ApiError::unprocessable("name is longer than 120 characters"))
        }
        Some(name) => Ok(name.to_string()),
        None => Err(ApiError::unprocessable("name is required")),
    }
}

fn validate_gender(gender: Option<&str>) -> Result<String, ApiError> {
    match gender.map(str::trim) {
        Some(gender) if gender.is_empty() => Err(ApiError::unprocessable("gender is empty")),
        Some(gender) if gender.chars().count() > MAX_GENDER_LEN => {
            Err(ApiError::unprocessable("gender is longer than 50 characters"))
        }
        Some(gender) => Ok(gender.to_string()),
        None => Err(ApiError::unprocessable("gender is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn movie(title: &str, date: &str) -> CreateMovieRequest {
        CreateMovieRequest {
            title: Some(title.into()),
            release_date: Some(date.into()),
        }
    }

    fn actor(name: &str, age: u32, gender: &str) -> CreateActorRequest {
        CreateActorRequest {
            name: Some(name.into()),
            age: Some(age),
            gender: Some(gender.into()),
        }
    }

    fn cast(movie: u64, actor: u64) -> CreateCastingRequest {
        CreateCastingRequest {
            movie: Some(movie),
            actor: Some(actor),
        }
    }

    #[test]
    fn ids_start_at_one_and_are_not_reused() {
        let mut store = InMemoryStore::new();
        let first = store.create_movie(movie("Heat", "1995-12-15")).unwrap();
        assert_eq!(first.id, 1);

        store.delete_movie(first.id).unwrap();
        let second = store.create_movie(movie("Ronin", "1998-09-25")).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn create_movie_rejects_missing_fields_and_bad_dates() {
        let mut store = InMemoryStore::new();

        for request in [
            CreateMovieRequest::default(),
            CreateMovieRequest {
                title: Some("Heat".into()),
                release_date: None,
            },
            movie("   ", "1995-12-15"),
            movie("Heat", "2025-01-32"),
            movie("Heat", "15/12/1995"),
        ] {
            let err = store.create_movie(request).unwrap_err();
            assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        }
        assert!(store.list_movies().is_empty());
    }

    #[test]
    fn update_movie_changes_only_provided_fields() {
        let mut store = InMemoryStore::new();
        let created = store.create_movie(movie("Heat", "1995-12-15")).unwrap();

        store
            .update_movie(
                created.id,
                UpdateMovieRequest {
                    title: Some("Heat (Director's Cut)".into()),
                    release_date: None,
                },
            )
            .unwrap();

        let listed = &store.list_movies()[0].movie;
        assert_eq!(listed.title, "Heat (Director's Cut)");
        assert_eq!(listed.release_date, created.release_date);
    }

    #[test]
    fn invalid_update_leaves_movie_untouched() {
        let mut store = InMemoryStore::new();
        let created = store.create_movie(movie("Heat", "1995-12-15")).unwrap();

        let err = store
            .update_movie(
                created.id,
                UpdateMovieRequest {
                    title: Some("Ronin".into()),
                    release_date: Some("1998-02-30".into()),
                },
            )
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.list_movies()[0].movie, created);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut store = InMemoryStore::new();

        assert_eq!(
            store
                .update_movie(7, UpdateMovieRequest::default())
                .unwrap_err()
                .status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(store.delete_movie(7).unwrap_err().status, StatusCode::NOT_FOUND);
        assert_eq!(
            store
                .update_actor(7, UpdateActorRequest::default())
                .unwrap_err()
                .status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(store.delete_actor(7).unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn create_actor_enforces_lengths() {
        let mut store = InMemoryStore::new();

        let long_name = "a".repeat(121);
        let long_gender = "g".repeat(51);
        for request in [
            CreateActorRequest::default(),
            CreateActorRequest {
                age: None,
                ..actor("Al Pacino", 84, "male")
            },
            actor(&long_name, 30, "female"),
            actor("Ashley Judd", 30, &long_gender),
        ] {
            let err = store.create_actor(request).unwrap_err();
            assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        }

        let at_limit = store
            .create_actor(actor(&"a".repeat(120), 30, &"g".repeat(50)))
            .unwrap();
        assert_eq!(at_limit.id, 1);
    }

    #[test]
    fn update_actor_fields_are_independent() {
        let mut store = InMemoryStore::new();
        let created = store.create_actor(actor("Al Pacino", 84, "male")).unwrap();

        store
            .update_actor(
                created.id,
                UpdateActorRequest {
                    gender: Some("man".into()),
                    ..UpdateActorRequest::default()
                },
            )
            .unwrap();

        let listed = &store.list_actors()[0].actor;
        assert_eq!(listed.gender, "man");
        assert_eq!(listed.age, 84);
        assert_eq!(listed.name, "Al Pacino");
    }

    #[test]
    fn listings_include_cast_and_credits() {
        let mut store = InMemoryStore::new();
        let heat = store.create_movie(movie("Heat", "1995-12-15")).unwrap();
        let ronin = store.create_movie(movie("Ronin", "1998-09-25")).unwrap();
        let deniro = store.create_actor(actor("Robert De Niro", 81, "male")).unwrap();
        store.create_casting(cast(heat.id, deniro.id)).unwrap();
        store.create_casting(cast(ronin.id, deniro.id)).unwrap();

        let movies = store.list_movies();
        assert_eq!(
            movies[0].actors,
            vec![CastMember {
                id: deniro.id,
                name: "Robert De Niro".into()
            }]
        );

        let actors = store.list_actors();
        let titles: Vec<&str> = actors[0].movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Ronin"]);
    }

    #[test]
    fn casting_requires_existing_records_and_rejects_duplicates() {
        let mut store = InMemoryStore::new();
        let heat = store.create_movie(movie("Heat", "1995-12-15")).unwrap();
        let pacino = store.create_actor(actor("Al Pacino", 84, "male")).unwrap();

        assert_eq!(
            store.create_casting(cast(heat.id, 99)).unwrap_err().status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store.create_casting(cast(99, pacino.id)).unwrap_err().status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store
                .create_casting(CreateCastingRequest::default())
                .unwrap_err()
                .status,
            StatusCode::NOT_FOUND
        );

        store.create_casting(cast(heat.id, pacino.id)).unwrap();
        assert_eq!(
            store
                .create_casting(cast(heat.id, pacino.id))
                .unwrap_err()
                .status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn deletes_cascade_to_castings() {
        let mut store = InMemoryStore::new();
        let heat = store.create_movie(movie("Heat", "1995-12-15")).unwrap();
        let ronin = store.create_movie(movie("Ronin", "1998-09-25")).unwrap();
        let deniro = store.create_actor(actor("Robert De Niro", 81, "male")).unwrap();
        let pacino = store.create_actor(actor("Al Pacino", 84, "male")).unwrap();
        store.create_casting(cast(heat.id, deniro.id)).unwrap();
        store.create_casting(cast(heat.id, pacino.id)).unwrap();
        store.create_casting(cast(ronin.id, deniro.id)).unwrap();

        store.delete_movie(heat.id).unwrap();
        assert_eq!(store.castings().len(), 1);

        store.delete_actor(deniro.id).unwrap();
        assert!(store.castings().is_empty());
        assert!(store.list_actors()[0].movies.is_empty());
    }
}
