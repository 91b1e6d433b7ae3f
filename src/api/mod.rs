// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{auth::middleware::require_jwt, state::AppState};

pub mod claims;
pub mod health;

pub fn router(state: AppState) -> Router {
    // Everything added before route_layer is guarded by the middleware
    let v1_routes = Router::new()
        .route("/claims", get(claims::claims))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt))
        .route("/whoami", get(claims::whoami));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .nest("/v1", v1_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
