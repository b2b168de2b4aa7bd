// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route permissions and the permission check.
//!
//! Each protected route names exactly one permission string. Handlers
//! declare it in their signature through a marker type:
//!
//! ```rust,ignore
//! async fn delete_actor(Permit { claims, .. }: Permit<DeleteActors>, ...) { ... }
//! ```

use super::{claims::DecodedClaims, AuthError};

/// A permission string a route requires.
pub trait RequiredPermission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! route_permissions {
    ($($(#[$meta:meta])* $ty:ident => $name:literal,)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $ty;

            impl RequiredPermission for $ty {
                const NAME: &'static str = $name;
            }
        )*

        /// Every permission a route in this service requires.
        pub const ALL_PERMISSIONS: &[&str] = &[$($name),*];
    };
}

route_permissions! {
    /// List movies
    GetMovies => "get:movies",
    /// Create a movie
    PostMovies => "post:movies",
    /// Edit a movie
    PatchMovies => "patch:movies",
    /// Delete a movie
    DeleteMovies => "delete:movies",
    /// List actors
    GetActors => "get:actors",
    /// Create an actor
    PostActors => "post:actors",
    /// Edit an actor
    PatchActors => "patch:actors",
    /// Delete an actor
    DeleteActors => "delete:actors",
    /// Cast an actor in a movie
    PostCasting => "post:casting",
}

/// Check `claims` against the permission a route requires.
///
/// Exact string membership. A token without a `permissions` claim is denied.
pub fn check(claims: &DecodedClaims, required: &str) -> Result<(), AuthError> {
    match claims.permissions() {
        Some(granted) if granted.contains(required) => Ok(()),
        _ => Err(AuthError::InsufficientPermission),
    }
}
