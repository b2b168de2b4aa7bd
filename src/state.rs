// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::RwLock;

use crate::auth::AuthGuard;
use crate::store::InMemoryStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub guard: Arc<AuthGuard>,
}

impl AppState {
    pub fn new(store: InMemoryStore, guard: AuthGuard) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            guard: Arc::new(guard),
        }
    }
}
