// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and is read-only afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_TOKEN_LOCATION` | `header`, `cookie` or `cookie-then-header` | `header` |
//! | `JWT_HEADER_NAME` | Header carrying the token | `Authorization` |
//! | `JWT_HEADER_TYPE` | Scheme in front of the token | `Bearer` |
//! | `JWT_COOKIE_NAME` | Cookie carrying the token | `access_token` |
//! | `JWT_ALGORITHM` | Signature algorithm | `RS256` |
//! | `JWT_IDENTITY` | Expected audience claim | Optional |
//! | `JWT_VERIFY_AUDIENCE` | Enforce the audience claim | `true` |
//! | `JWT_ISSUER` | Expected issuer claim | Optional |
//! | `JWT_LEEWAY` | Clock skew tolerance in seconds | `0` |
//! | `JWT_AUTHORIZED_KEYS` | Candidate public keys | Required for any request to pass |
//! | `JWT_AUTHORIZED_KEYS_FILE` | File with more candidate keys | Optional |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderName;
use jsonwebtoken::Algorithm;

use crate::auth::locator::{
    LocatorConfig, TokenLocation, DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME,
    DEFAULT_HEADER_SCHEME,
};
use crate::auth::verifier::VerificationContext;
use crate::auth::KeySet;

pub const TOKEN_LOCATION_ENV: &str = "JWT_TOKEN_LOCATION";
pub const HEADER_NAME_ENV: &str = "JWT_HEADER_NAME";
pub const HEADER_TYPE_ENV: &str = "JWT_HEADER_TYPE";
pub const COOKIE_NAME_ENV: &str = "JWT_COOKIE_NAME";
pub const ALGORITHM_ENV: &str = "JWT_ALGORITHM";
/// Expected audience. Named after the identity this service presents.
pub const AUDIENCE_ENV: &str = "JWT_IDENTITY";
pub const VERIFY_AUDIENCE_ENV: &str = "JWT_VERIFY_AUDIENCE";
pub const ISSUER_ENV: &str = "JWT_ISSUER";
pub const LEEWAY_ENV: &str = "JWT_LEEWAY";

/// Environment variable holding the candidate keys.
///
/// PEM blocks may span several lines. Any other non-blank line is a key of its
/// own (an `ssh-rsa` public key, or a shared secret for `HS*` algorithms).
pub const AUTHORIZED_KEYS_ENV: &str = "JWT_AUTHORIZED_KEYS";

/// Environment variable naming a file with candidate keys, same format as
/// [`AUTHORIZED_KEYS_ENV`]. Its keys are tried after the inline ones.
pub const AUTHORIZED_KEYS_FILE_ENV: &str = "JWT_AUTHORIZED_KEYS_FILE";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::RS256;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_HEADER_NAME cannot be empty")]
    EmptyHeaderName,
    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),
    #[error("unknown token location {0:?} (expected header, cookie or cookie-then-header)")]
    UnknownTokenLocation(String),
    #[error("unknown signature algorithm {0:?}")]
    UnknownAlgorithm(String),
    #[error("{name} must be true or false, got {value:?}")]
    InvalidBool { name: &'static str, value: String },
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("failed to read key file {}: {source}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Token verification configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub locator: LocatorConfig,
    pub context: VerificationContext,
    pub keys: KeySet,
}

impl JwtConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let location = match get(TOKEN_LOCATION_ENV) {
            Some(value) => {
                TokenLocation::from_str(&value).map_err(ConfigError::UnknownTokenLocation)?
            }
            None => TokenLocation::default(),
        };

        let header_name = match lookup(HEADER_NAME_ENV) {
            Some(name) if name.trim().is_empty() => return Err(ConfigError::EmptyHeaderName),
            Some(name) => name,
            None => DEFAULT_HEADER_NAME.to_string(),
        };
        let header_name = HeaderName::from_bytes(header_name.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(header_name.clone()))?;

        let locator = LocatorConfig {
            location,
            header_name,
            header_scheme: get(HEADER_TYPE_ENV)
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_HEADER_SCHEME.to_string()),
            cookie_name: get(COOKIE_NAME_ENV)
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
        };

        let algorithm = match get(ALGORITHM_ENV) {
            Some(value) => Algorithm::from_str(value.trim())
                .map_err(|_| ConfigError::UnknownAlgorithm(value.clone()))?,
            None => DEFAULT_ALGORITHM,
        };

        let context = VerificationContext {
            algorithm,
            audience: get(AUDIENCE_ENV).map(|s| s.trim().to_string()),
            verify_audience: match get(VERIFY_AUDIENCE_ENV) {
                Some(value) => parse_bool(VERIFY_AUDIENCE_ENV, &value)?,
                None => true,
            },
            issuer: get(ISSUER_ENV).map(|s| s.trim().to_string()),
            leeway: match get(LEEWAY_ENV) {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    name: LEEWAY_ENV,
                    value: value.clone(),
                })?,
                None => 0,
            },
        };

        let mut keys = get(AUTHORIZED_KEYS_ENV)
            .map(|text| KeySet::parse(&text))
            .unwrap_or_default();
        if let Some(path) = get(AUTHORIZED_KEYS_FILE_ENV).map(PathBuf::from) {
            let text = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::KeyFile { path, source })?;
            keys.extend(KeySet::parse(&text));
        }

        Ok(Self {
            locator,
            context,
            keys,
        })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}
