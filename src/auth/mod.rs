//! Passwords, access tokens and bearer header parsing

pub mod password;
pub mod token;

use thiserror::Error;

pub use password::{hash_password, hash_password_async, verify_password, verify_password_async};
pub use token::{parse_bearer, Claims, TokenService, MAX_EXPIRE_MINUTES};

#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Not authenticated")]
    MissingToken,

    /// Bad token, bad password or unknown user
    #[error("Could not validate credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token encoding failed: {0}")]
    Token(String),
}
