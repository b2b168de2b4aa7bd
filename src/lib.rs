// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Casting Agency API
//!
//! REST service for movies, actors and castings. Every resource route
//! requires an identity-provider access token carrying the route's
//! permission.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token authentication and permission checks
//! - `config` - Environment configuration
//! - `store` - In-memory record store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
