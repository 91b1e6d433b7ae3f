// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Guards a whole router subtree: requests without a valid token are answered
//! with `401` before the handler runs. On success the verified [`ClaimSet`]
//! is stored in the request extensions, where the
//! [`Claims`](super::Claims) and [`CurrentClaims`](super::CurrentClaims)
//! extractors pick it up.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), require_jwt))
//!     .with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{Authenticator, ClaimSet};

/// Reject the request unless it carries a valid token.
///
/// Works with any router state that can hand out an `Arc<Authenticator>`
/// through `FromRef`.
pub async fn require_jwt(
    State(authenticator): State<Arc<Authenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticator.extract_and_verify(request.headers()) {
        Ok(claims) => {
            request.extensions_mut().insert::<ClaimSet>(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::info!(
                path = %request.uri().path(),
                code = e.code(),
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}
