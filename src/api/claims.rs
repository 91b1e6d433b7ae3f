// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{ClaimSet, Claims, CurrentClaims};

/// Summary of the caller's identity.
#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub sub: Option<String>,
    pub iss: Option<String>,
    pub aud: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Echo the claims verified by the middleware.
pub async fn claims(CurrentClaims(claims): CurrentClaims) -> Json<ClaimSet> {
    Json(claims)
}

/// Identity of the caller, verified by the extractor.
pub async fn whoami(Claims(claims): Claims) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        sub: claims.subject().map(str::to_string),
        iss: claims.issuer().map(str::to_string),
        aud: claims.audience().into_iter().map(str::to_string).collect(),
        expires_at: claims.expires_at(),
    })
}
