// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer JWT verification against a list of trusted public keys.
//!
//! ## Auth Flow
//!
//! 1. The client sends `Authorization: Bearer <JWT>` (or the token in a cookie)
//! 2. The locator pulls the raw token out of the request
//! 3. The verifier:
//!    - tries each configured key until one verifies the signature
//!    - re-verifies under that key with expiry, audience and issuer checks
//! 4. The claims are stored in the request extensions for handlers
//!
//! ## Security
//!
//! - Which key matched, and why the others did not, is never reported
//! - Tokens are never logged
//! - Claims are request-scoped; nothing is shared between requests

pub mod claims;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod locator;
pub mod middleware;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::http::HeaderMap;

pub use claims::{current_claims, ClaimSet};
pub use error::AuthError;
pub use extractor::{Claims, CurrentClaims, OptionalClaims};
pub use keys::{CandidateKey, KeySet};
pub use locator::{LocatorConfig, RawToken, TokenLocation};
pub use verifier::VerificationContext;

use crate::config::JwtConfig;

/// Locator settings, candidate keys and claim policy, bundled for the host.
#[derive(Debug, Clone)]
pub struct Authenticator {
    locator: LocatorConfig,
    keys: Arc<KeySet>,
    context: VerificationContext,
}

impl Authenticator {
    pub fn new(locator: LocatorConfig, keys: KeySet, context: VerificationContext) -> Self {
        Self {
            locator,
            keys: Arc::new(keys),
            context,
        }
    }

    /// Build from loaded configuration, logging what will be enforced.
    pub fn from_config(config: JwtConfig) -> Self {
        let JwtConfig {
            locator,
            context,
            keys,
        } = config;

        if keys.is_empty() {
            tracing::warn!("No keys configured; every request will be rejected");
        } else {
            let usable = keys.usable_count(context.algorithm);
            if usable < keys.len() {
                tracing::warn!(
                    configured = keys.len(),
                    usable,
                    algorithm = ?context.algorithm,
                    "Some configured keys cannot be used with the configured algorithm"
                );
            }
        }

        tracing::info!(
            location = %locator.location,
            algorithm = ?context.algorithm,
            keys = keys.len(),
            audience = context.audience.as_deref().unwrap_or("<none>"),
            verify_audience = context.verify_audience,
            "JWT verification configured"
        );

        Self::new(locator, keys, context)
    }

    pub fn locator(&self) -> &LocatorConfig {
        &self.locator
    }

    pub fn context(&self) -> &VerificationContext {
        &self.context
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    /// Locate and verify the request's token.
    pub fn extract_and_verify(&self, headers: &HeaderMap) -> Result<ClaimSet, AuthError> {
        let token = locator::locate(headers, &self.locator)?;
        let claims = verifier::verify(&token, &self.keys, &self.context)?;

        tracing::debug!(
            sub = claims.subject().unwrap_or("<none>"),
            "Bearer token verified"
        );
        Ok(claims)
    }
}
