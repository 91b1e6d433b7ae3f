// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified claim set and its request-scoped storage.

use axum::http::Extensions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims decoded from a verified token.
///
/// Only the verifier constructs one from a token, and only after both the key
/// search and full claim validation have succeeded. It lives in the request's
/// extensions and is dropped with the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Create from a decoded payload.
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Look up a claim by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Subject (`sub`), when it is a string.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Issuer (`iss`), when it is a string.
    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Audience (`aud`) normalised to a list.
    ///
    /// A single string becomes a one-element list; non-string entries are
    /// skipped.
    pub fn audience(&self) -> Vec<&str> {
        match self.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(list)) => list.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Expiration (`exp`) as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.get("exp")?;
        let secs = exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Claims already validated for this request, or an empty set.
///
/// Never verifies anything itself; use it from code that runs behind the
/// [`require_jwt`](super::middleware::require_jwt) guard.
pub fn current_claims(extensions: &Extensions) -> ClaimSet {
    extensions.get::<ClaimSet>().cloned().unwrap_or_default()
}
