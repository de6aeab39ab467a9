//! Password hashing using Argon2id.
//!
//! Hashes are stored as PHC strings, which carry the algorithm, cost
//! parameters and salt alongside the digest. Verification reads the
//! parameters back out of the stored string, so changing the configured
//! costs never invalidates existing hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),
}

/// Digest length in bytes.
const OUTPUT_LEN: usize = 32;

/// Argon2id cost parameters.
///
/// Defaults follow the OWASP 2024 recommendation: 19 MiB of memory,
/// two passes, one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Argon2Params {
    #[serde(default = "default_memory_cost")]
    pub memory_cost_kib: u32,

    #[serde(default = "default_time_cost")]
    pub time_cost: u32,

    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_cost() -> u32 {
    19456
}
fn default_time_cost() -> u32 {
    2
}
fn default_parallelism() -> u32 {
    1
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_cost_kib: default_memory_cost(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
        }
    }
}

impl Argon2Params {
    /// Builds the Argon2id context for these parameters.
    fn hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(
            self.memory_cost_kib,
            self.time_cost,
            self.parallelism,
            Some(OUTPUT_LEN),
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes a password with explicit cost parameters.
///
/// # Example
/// ```
/// use shared::password::{hash_password_with, Argon2Params};
///
/// let hash = hash_password_with(&Argon2Params::default(), "correct horse battery staple").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
///
/// A fresh random salt is drawn for every call, so hashing the same
/// password twice yields different strings.
pub fn hash_password_with(params: &Argon2Params, password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    params
        .hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash in constant time.
///
/// Returns `Ok(false)` on mismatch and `Err` only when the stored value
/// cannot be parsed or the verifier fails for another reason.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Returns true if the value parses as a PHC-formatted hash.
pub fn is_phc_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}
