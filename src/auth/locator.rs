// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token location: pull the raw bearer token out of a header or a cookie.
//!
//! ## Strategies
//!
//! - `header`: `<scheme> <token>` in a named header
//! - `cookie`: a single token in a named cookie
//! - `cookie-then-header`: a present cookie wins outright, even when it is
//!   malformed. The header is only read when the cookie is absent.

use std::fmt;
use std::str::FromStr;

use axum::http::{header::COOKIE, HeaderMap, HeaderName};

use super::AuthError;

/// Default header carrying the token.
pub const DEFAULT_HEADER_NAME: &str = "Authorization";

/// Default scheme expected in front of the token.
pub const DEFAULT_HEADER_SCHEME: &str = "Bearer";

/// Default cookie carrying the token.
pub const DEFAULT_COOKIE_NAME: &str = "access_token";

/// Where to look for the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenLocation {
    #[default]
    Header,
    Cookie,
    CookieThenHeader,
}

impl FromStr for TokenLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "header" | "headers" => Ok(TokenLocation::Header),
            "cookie" | "cookies" => Ok(TokenLocation::Cookie),
            "cookie-then-header" | "cookie_then_header" => Ok(TokenLocation::CookieThenHeader),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TokenLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenLocation::Header => write!(f, "header"),
            TokenLocation::Cookie => write!(f, "cookie"),
            TokenLocation::CookieThenHeader => write!(f, "cookie-then-header"),
        }
    }
}

/// Raw, still unverified token.
#[derive(Clone, PartialEq, Eq)]
pub struct RawToken(String);

impl RawToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for RawToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawToken(..)")
    }
}

/// Token location settings.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub location: TokenLocation,
    pub header_name: HeaderName,
    pub header_scheme: String,
    pub cookie_name: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            location: TokenLocation::Header,
            header_name: HeaderName::from_static("authorization"),
            header_scheme: DEFAULT_HEADER_SCHEME.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

/// Locate the raw token in the request headers.
pub fn locate(headers: &HeaderMap, config: &LocatorConfig) -> Result<RawToken, AuthError> {
    let result = match config.location {
        TokenLocation::Header => from_header(headers, config),
        TokenLocation::Cookie => from_cookie(headers, config),
        TokenLocation::CookieThenHeader => {
            if find_cookie(headers, &config.cookie_name).is_some() {
                from_cookie(headers, config)
            } else if header_present(headers, config) {
                from_header(headers, config)
            } else {
                Err(AuthError::NoCredentials)
            }
        }
    };

    if let Err(ref e) = result {
        tracing::debug!(
            location = %config.location,
            code = e.code(),
            "Bearer token not located"
        );
    }
    result
}

fn header_present(headers: &HeaderMap, config: &LocatorConfig) -> bool {
    headers
        .get(&config.header_name)
        .is_some_and(|value| !value.is_empty())
}

fn from_header(headers: &HeaderMap, config: &LocatorConfig) -> Result<RawToken, AuthError> {
    let scheme = &config.header_scheme;

    let value = headers
        .get(&config.header_name)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::HeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader { scheme: scheme.clone() })?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        // Whitespace-only header: nothing to compare against the scheme
        [] => Err(AuthError::SchemeMismatch { scheme: scheme.clone() }),
        [first, ..] if *first != scheme.as_str() => {
            Err(AuthError::SchemeMismatch { scheme: scheme.clone() })
        }
        [_] => Err(AuthError::TokenMissing),
        [_, token] => Ok(RawToken::new(*token)),
        _ => Err(AuthError::MalformedHeader { scheme: scheme.clone() }),
    }
}

fn from_cookie(headers: &HeaderMap, config: &LocatorConfig) -> Result<RawToken, AuthError> {
    let value = find_cookie(headers, &config.cookie_name).ok_or(AuthError::CookieMissing)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [token] => Ok(RawToken::new(*token)),
        _ => Err(AuthError::MalformedCookie),
    }
}

/// Find a non-empty cookie value across every `Cookie` header.
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim_start().split_once('='))
        .map(|(key, value)| (key, value.trim_matches('"')))
        .find(|(key, value)| key.trim() == name && !value.is_empty())
        .map(|(_, value)| value)
}
