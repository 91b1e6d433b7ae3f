// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness response with individual component status.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub service: String,
    /// "ok" when at least one key works with the configured algorithm,
    /// "none" otherwise.
    pub keys: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 503 while no configured key can verify tokens, since every
/// protected request would be rejected.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let authenticator = &state.authenticator;
    let keys_ok = authenticator
        .keys()
        .usable_count(authenticator.context().algorithm)
        > 0;

    let response = ReadyResponse {
        status: if keys_ok { "ok" } else { "degraded" }.to_string(),
        checks: ReadyChecks {
            service: "ok".to_string(),
            keys: if keys_ok { "ok" } else { "none" }.to_string(),
        },
    };

    let status = if keys_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
