// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT Consumer - bearer token verification for Axum services
//!
//! Verifies JWTs issued by any of several trusted parties: the token is
//! located in a header or cookie, the signing key is found among the
//! configured candidates, and the verified claims are handed to handlers
//! through request extensions.
//!
//! ## Modules
//!
//! - `api` - Demo HTTP routes (Axum)
//! - `auth` - Token location, key handling, verification and Axum integration
//! - `config` - Environment configuration
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
