// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multi-key token verification.
//!
//! Verification runs in two passes:
//!
//! 1. **Key search**: try each candidate key in order with every claim check
//!    disabled. The first key that verifies the signature wins. When none
//!    does, the caller only sees [`AuthError::NoMatchingKey`]; per-key
//!    failures are never reported.
//! 2. **Full validation**: verify again under the winning key with the claim
//!    policy enabled (expiry, not-before, issuer, audience) and classify the
//!    failure precisely.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use super::keys::KeySet;
use super::locator::RawToken;
use super::{AuthError, ClaimSet};

/// Claim policy for one verification call.
#[derive(Debug, Clone)]
pub struct VerificationContext {
    /// Signature algorithm the token must use
    pub algorithm: Algorithm,
    /// Expected audience (`None` means "don't check")
    pub audience: Option<String>,
    /// Audience enforcement switch; `false` skips the check even with an audience set
    pub verify_audience: bool,
    /// Expected issuer (optional)
    pub issuer: Option<String>,
    /// Clock skew tolerance in seconds
    pub leeway: u64,
}

impl Default for VerificationContext {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::RS256,
            audience: None,
            verify_audience: true,
            issuer: None,
            leeway: 0,
        }
    }
}

impl VerificationContext {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Set the expected audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the expected issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// The audience to enforce, if any.
    fn enforced_audience(&self) -> Option<&str> {
        if !self.verify_audience {
            return None;
        }
        self.audience
            .as_deref()
            .map(str::trim)
            .filter(|aud| !aud.is_empty())
    }

    /// Signature-only validation used during key search.
    fn signature_only(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation
    }

    /// Full claim policy used under the winning key.
    fn full_policy(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.required_spec_claims.clear();

        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }

        match self.enforced_audience() {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.set_required_spec_claims(&["aud"]);
            }
            None => validation.validate_aud = false,
        }

        validation
    }
}

/// Find the first candidate key that verifies the token's signature.
///
/// Returns the key's position in the set and the decoded key.
pub fn find_key(
    token: &RawToken,
    keys: &KeySet,
    ctx: &VerificationContext,
) -> Result<(usize, DecodingKey), AuthError> {
    let validation = ctx.signature_only();

    for (index, candidate) in keys.iter().enumerate() {
        let key = match candidate.decoding_key(ctx.algorithm) {
            Ok(key) => key,
            Err(e) => {
                tracing::trace!(index, kind = candidate.kind(), error = %e, "Skipping candidate key");
                continue;
            }
        };

        match decode::<Value>(token.as_str(), &key, &validation) {
            Ok(_) => return Ok((index, key)),
            Err(e) => tracing::trace!(index, error = %e, "Candidate key did not verify token"),
        }
    }

    Err(AuthError::NoMatchingKey)
}

/// Verify a token against an ordered set of candidate keys.
///
/// # Errors
///
/// - [`AuthError::NoMatchingKey`] when no key verifies the signature
///   (including an empty key set)
/// - [`AuthError::TokenExpired`] when `exp` has passed
/// - [`AuthError::InvalidClaims`] on audience or issuer mismatch, or an
///   `iat` that is not a number
/// - [`AuthError::MissingClaims`] when an expected `aud` is absent
/// - [`AuthError::MalformedToken`] for anything else
pub fn verify(
    token: &RawToken,
    keys: &KeySet,
    ctx: &VerificationContext,
) -> Result<ClaimSet, AuthError> {
    if keys.is_empty() {
        tracing::debug!("No verification keys configured");
        return Err(AuthError::NoMatchingKey);
    }

    let (index, key) = find_key(token, keys, ctx).inspect_err(|_| {
        tracing::debug!(candidates = keys.len(), "No candidate key verified the token");
    })?;

    let data = decode::<Map<String, Value>>(token.as_str(), &key, &ctx.full_policy()).map_err(|e| {
        let err = AuthError::from(e);
        tracing::debug!(key_index = index, code = err.code(), "Token rejected by claim policy");
        err
    })?;

    // jsonwebtoken leaves `iat` alone; a present value must still be a timestamp
    if data.claims.get("iat").is_some_and(|iat| !iat.is_number()) {
        tracing::debug!(key_index = index, "Token issued-at claim is not a timestamp");
        return Err(AuthError::InvalidClaims);
    }

    Ok(ClaimSet::new(data.claims))
}
