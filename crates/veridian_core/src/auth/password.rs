//! Salted password hashing.
//!
//! # Responsibility
//! - Derive the stored credential from a raw password.
//! - Verify a candidate password against a stored credential.
//!
//! # Invariants
//! - Raw passwords never leave this module; only the encoded hash is stored.
//! - Every derived hash uses a fresh random salt.
//! - Malformed stored hashes never verify.
//!
//! Encoded form: `pbkdf2-sha256$<iterations>$<salt b64>$<digest b64>`,
//! where the digest is PBKDF2-HMAC-SHA256 over the password and salt.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::error::Error;
use std::fmt::{Display, Formatter};
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2-sha256";
const ITERATIONS: u32 = 100_000;
const DIGEST_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// Encoded salted password hash as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes `password` with a new random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::derive_with(password, &salt, ITERATIONS)
    }

    fn derive_with(password: &str, salt: &[u8], iterations: u32) -> Self {
        let digest = stretch(password, salt, iterations);
        Self(format!(
            "{SCHEME}${iterations}${}${}",
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(digest)
        ))
    }

    /// Wraps an already-encoded hash after checking its shape.
    pub fn parse(encoded: &str) -> Result<Self, PasswordHashError> {
        decode(encoded)?;
        Ok(Self(encoded.to_string()))
    }

    /// Checks `candidate` against this hash. Comparison is case-sensitive.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parts) = decode(&self.0) else {
            return false;
        };
        let actual = stretch(candidate, &parts.salt, parts.iterations);
        actual[..].ct_eq(&parts.digest[..]).into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Malformed encoded password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    UnsupportedScheme(String),
    InvalidIterations(String),
    InvalidEncoding(&'static str),
}

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedScheme(scheme) => write!(f, "unsupported hash scheme `{scheme}`"),
            Self::InvalidIterations(value) => write!(f, "invalid iteration count `{value}`"),
            Self::InvalidEncoding(part) => write!(f, "invalid {part} encoding"),
        }
    }
}

impl Error for PasswordHashError {}

struct DecodedHash {
    iterations: u32,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

fn decode(encoded: &str) -> Result<DecodedHash, PasswordHashError> {
    let mut parts = encoded.split('$');
    let scheme = parts.next().unwrap_or_default();
    if scheme != SCHEME {
        return Err(PasswordHashError::UnsupportedScheme(scheme.to_string()));
    }

    let iterations_text = parts.next().unwrap_or_default();
    let iterations = iterations_text
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| PasswordHashError::InvalidIterations(iterations_text.to_string()))?;

    let salt = parts
        .next()
        .and_then(|value| STANDARD_NO_PAD.decode(value).ok())
        .filter(|value| !value.is_empty())
        .ok_or(PasswordHashError::InvalidEncoding("salt"))?;
    let digest = parts
        .next()
        .and_then(|value| STANDARD_NO_PAD.decode(value).ok())
        .filter(|value| value.len() == DIGEST_LEN)
        .ok_or(PasswordHashError::InvalidEncoding("digest"))?;

    if parts.next().is_some() {
        return Err(PasswordHashError::InvalidEncoding("trailing segment"));
    }

    Ok(DecodedHash {
        iterations,
        salt,
        digest,
    })
}

fn stretch(password: &str, salt: &[u8], iterations: u32) -> [u8; DIGEST_LEN] {
    let mut digest = [0_u8; DIGEST_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut digest);
    digest
}
