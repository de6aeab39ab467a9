//! Password hashing seam for the registration workflow.

use shared::password::{hash_password_with, Argon2Params, PasswordError};

/// One-way password hashing primitive.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;
}

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Argon2Params,
}

impl Argon2PasswordHasher {
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        hash_password_with(&self.params, plaintext)
    }
}
