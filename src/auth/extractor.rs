// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for verified claims.
//!
//! Use the `Claims` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Claims(claims): Claims) -> impl IntoResponse {
//!     // claims is a verified ClaimSet
//! }
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::{current_claims, AuthError, Authenticator, ClaimSet};

/// Extractor for verified claims.
///
/// Reuses the claims stored by [`require_jwt`](super::middleware::require_jwt)
/// when the route is behind it; otherwise locates and verifies the token
/// itself and stores the result for later extractors.
///
/// # Example
///
/// ```rust,ignore
/// async fn whoami(Claims(claims): Claims) -> Json<Value> {
///     Json(json!({ "sub": claims.subject() }))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Claims(pub ClaimSet);

impl<S> FromRequestParts<S> for Claims
where
    Arc<Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // First check if middleware already verified the token
        if let Some(claims) = parts.extensions.get::<ClaimSet>().cloned() {
            return Ok(Claims(claims));
        }

        let authenticator = Arc::<Authenticator>::from_ref(state);
        let claims = authenticator.extract_and_verify(&parts.headers)?;
        parts.extensions.insert(claims.clone());

        Ok(Claims(claims))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` if no valid token is present, instead of rejecting.
#[derive(Debug, Clone)]
pub struct OptionalClaims(pub Option<ClaimSet>);

impl<S> FromRequestParts<S> for OptionalClaims
where
    Arc<Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Claims::from_request_parts(parts, state).await {
            Ok(Claims(claims)) => Ok(OptionalClaims(Some(claims))),
            Err(_) => Ok(OptionalClaims(None)),
        }
    }
}

/// Claims already verified for this request, or an empty set.
///
/// Never verifies anything and never rejects.
#[derive(Debug, Clone)]
pub struct CurrentClaims(pub ClaimSet);

impl<S> FromRequestParts<S> for CurrentClaims
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentClaims(current_claims(&parts.extensions)))
    }
}
