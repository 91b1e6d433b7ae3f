// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Covers both token location and token verification failures. Every variant
/// renders as `401 Unauthorized` with a `{code, description}` body. Several
/// variants share a code: clients branch on the code, logs see the variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Header strategy, header absent
    #[error("Authorization header is expected.")]
    HeaderMissing,
    /// Cookie strategy, cookie absent
    #[error("Authorization cookie is expected.")]
    CookieMissing,
    /// Cookie-then-header strategy, neither present
    #[error("Authorization cookie or header is expected.")]
    NoCredentials,
    /// Header does not start with the configured scheme
    #[error("Authorization header must start with {scheme}.")]
    SchemeMismatch { scheme: String },
    /// Header carries the scheme but no token
    #[error("Token not found.")]
    TokenMissing,
    /// Header has extra segments or is not valid text
    #[error("Authorization header must be {scheme} token.")]
    MalformedHeader { scheme: String },
    /// Cookie value is not a single token
    #[error("Authorization cookie must contain a single token.")]
    MalformedCookie,
    /// No candidate key verifies the signature
    #[error("Unable to parse authentication token.")]
    NoMatchingKey,
    /// Token could not be decoded under the matching key
    #[error("Unable to parse authentication token.")]
    MalformedToken,
    /// Expiration claim has passed
    #[error("Token is expired.")]
    TokenExpired,
    /// Audience, issuer or subject mismatch
    #[error("Incorrect claims, please check the issued at, audience or issuer.")]
    InvalidClaims,
    /// A required claim is absent
    #[error("Missing claims, please check the audience.")]
    MissingClaims,
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: &'static str,
    description: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::CookieMissing => "authorization_cookie_missing",
            AuthError::NoCredentials => "no_authorization_error",
            AuthError::SchemeMismatch { .. }
            | AuthError::TokenMissing
            | AuthError::MalformedHeader { .. }
            | AuthError::NoMatchingKey
            | AuthError::MalformedToken => "invalid_header",
            AuthError::MalformedCookie => "invalid_cookie",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::MissingClaims => "invalid_claims",
        }
    }

    /// Human-readable description, as sent to the client.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::InvalidSubject => {
                AuthError::InvalidClaims
            }
            ErrorKind::MissingRequiredClaim(_) => AuthError::MissingClaims,
            _ => AuthError::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            code: self.code(),
            description: self.description(),
        });
        (status, body).into_response()
    }
}
