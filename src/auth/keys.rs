// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Candidate verification keys.
//!
//! ## Accepted material
//!
//! - PEM blocks (`PUBLIC KEY`, `RSA PUBLIC KEY`) for the RSA, EC and EdDSA
//!   families
//! - One-line OpenSSH RSA keys (`ssh-rsa AAAA... [comment]`)
//! - One-line shared secrets for the HMAC family
//!
//! Key material is decoded for the configured algorithm on every attempt.
//! Material that does not decode simply never verifies anything.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey};
use ssh_key::PublicKey;

/// Key decoding error.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("{kind} key cannot be used with {algorithm:?}")]
    WrongFamily {
        kind: &'static str,
        algorithm: Algorithm,
    },
    #[error("unsupported OpenSSH key type: {0}")]
    UnsupportedSshKey(String),
    #[error("malformed OpenSSH key")]
    MalformedSshKey,
    #[error("invalid key: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Hmac,
    Rsa,
    Ec,
    Ed,
}

fn family(algorithm: Algorithm) -> Family {
    if matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
        Family::Hmac
    } else if matches!(algorithm, Algorithm::ES256 | Algorithm::ES384) {
        Family::Ec
    } else if algorithm == Algorithm::EdDSA {
        Family::Ed
    } else {
        Family::Rsa
    }
}

#[derive(Clone)]
enum Material {
    Pem(pem::Pem),
    Line(String),
}

/// One configured verification key.
#[derive(Clone)]
pub struct CandidateKey {
    material: Material,
}

impl CandidateKey {
    /// Key from a single PEM block.
    pub fn from_pem(text: &str) -> Result<Self, pem::PemError> {
        Ok(Self {
            material: Material::Pem(pem::parse(text)?),
        })
    }

    /// Key from a one-line entry (OpenSSH key or shared secret).
    pub fn from_line(line: impl Into<String>) -> Self {
        Self {
            material: Material::Line(line.into()),
        }
    }

    /// Short description for logs. Never includes key bytes.
    pub fn kind(&self) -> &'static str {
        match &self.material {
            Material::Pem(_) => "pem",
            Material::Line(line) if line.starts_with("ssh-") => "openssh",
            Material::Line(_) => "secret",
        }
    }

    /// Decode this key for use with `algorithm`.
    pub fn decoding_key(&self, algorithm: Algorithm) -> Result<DecodingKey, KeyError> {
        let wrong_family = || KeyError::WrongFamily {
            kind: self.kind(),
            algorithm,
        };

        match (&self.material, family(algorithm)) {
            (Material::Pem(block), Family::Rsa) => {
                Ok(DecodingKey::from_rsa_pem(pem::encode(block).as_bytes())?)
            }
            (Material::Pem(block), Family::Ec) => {
                Ok(DecodingKey::from_ec_pem(pem::encode(block).as_bytes())?)
            }
            (Material::Pem(block), Family::Ed) => {
                Ok(DecodingKey::from_ed_pem(pem::encode(block).as_bytes())?)
            }
            (Material::Line(line), Family::Rsa) if line.starts_with("ssh-") => {
                let (modulus, exponent) = openssh_rsa_components(line)?;
                Ok(DecodingKey::from_rsa_raw_components(&modulus, &exponent))
            }
            (Material::Line(secret), Family::Hmac) if !secret.starts_with("ssh-") => {
                Ok(DecodingKey::from_secret(secret.as_bytes()))
            }
            _ => Err(wrong_family()),
        }
    }
}

impl fmt::Debug for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateKey")
            .field("kind", &self.kind())
            .finish()
    }
}

/// Ordered set of candidate keys.
///
/// Order only matters in that the key search stops at the first key that
/// verifies the signature.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: Vec<CandidateKey>,
}

impl KeySet {
    pub fn new(keys: Vec<CandidateKey>) -> Self {
        Self { keys }
    }

    /// Parse a key list.
    ///
    /// PEM blocks may span lines; every other non-blank line is one key.
    /// Lines starting with `#` are ignored. A PEM block that fails to parse
    /// is dropped with a warning.
    pub fn parse(text: &str) -> Self {
        let mut keys = Vec::new();
        let mut block: Option<String> = None;

        for line in text.lines().map(str::trim) {
            if let Some(current) = block.as_mut() {
                current.push_str(line);
                current.push('\n');
                if line.starts_with("-----END ") {
                    push_pem(&mut keys, current);
                    block = None;
                }
            } else if line.starts_with("-----BEGIN ") {
                block = Some(format!("{line}\n"));
            } else if !line.is_empty() && !line.starts_with('#') {
                keys.push(CandidateKey::from_line(line));
            }
        }

        if block.is_some() {
            tracing::warn!("Unterminated PEM block in key list, ignoring it");
        }

        Self { keys }
    }

    /// Append all keys from `other`, keeping order.
    pub fn extend(&mut self, other: KeySet) {
        self.keys.extend(other.keys);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys that decode for `algorithm`.
    pub fn usable_count(&self, algorithm: Algorithm) -> usize {
        self.keys
            .iter()
            .filter(|key| key.decoding_key(algorithm).is_ok())
            .count()
    }
}

fn push_pem(keys: &mut Vec<CandidateKey>, text: &str) {
    match CandidateKey::from_pem(text) {
        Ok(key) => keys.push(key),
        Err(e) => tracing::warn!(error = %e, "Ignoring unparseable PEM block in key list"),
    }
}

/// Extract `(modulus, exponent)` from an `ssh-rsa` public key line.
fn openssh_rsa_components(line: &str) -> Result<(Vec<u8>, Vec<u8>), KeyError> {
    let kind = line.split_whitespace().next().unwrap_or_default();
    if kind != "ssh-rsa" {
        return Err(KeyError::UnsupportedSshKey(kind.to_string()));
    }

    let key = PublicKey::from_openssh(line).map_err(|_| KeyError::MalformedSshKey)?;
    let rsa = key.key_data().rsa().ok_or(KeyError::MalformedSshKey)?;

    // Positive mpints, leading sign byte stripped
    let modulus = rsa.n.as_positive_bytes().ok_or(KeyError::MalformedSshKey)?;
    let exponent = rsa.e.as_positive_bytes().ok_or(KeyError::MalformedSshKey)?;

    Ok((modulus.to_vec(), exponent.to_vec()))
}
